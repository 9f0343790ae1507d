//! Global icsgen configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{IcsError, IcsResult};
use crate::ics::{Encoder, TimezoneTable, ZoneDefinition};
use crate::writer::{IcsWriter, WriterOptions};

static DEFAULT_FILENAME: &str = "event";

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

/// Configuration at ~/.config/icsgen/config.toml, overridable through
/// `ICSGEN_*` environment variables (e.g. `ICSGEN_OUTPUT_DIR`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IcsConfig {
    /// File name (without extension) used when no path is given
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Directory relative destinations resolve against; defaults to the
    /// current directory. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// VTIMEZONE definitions added to the built-in table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timezones: Vec<ZoneDefinition>,
}

impl Default for IcsConfig {
    fn default() -> Self {
        IcsConfig {
            filename: default_filename(),
            output_dir: None,
            timezones: Vec::new(),
        }
    }
}

impl IcsConfig {
    pub fn config_path() -> IcsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IcsError::Config("Could not determine config directory".into()))?
            .join("icsgen");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented template on first use.
    pub fn load() -> IcsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> IcsResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("ICSGEN"))
            .build()
            .map_err(|e| IcsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| IcsError::Config(e.to_string()))
    }

    /// `output_dir` with `~` expanded.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| {
            PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned())
        })
    }

    /// Built-in zones plus the configured ones (configured wins on conflict).
    pub fn timezone_table(&self) -> TimezoneTable {
        let mut table = TimezoneTable::default();
        table.extend(self.timezones.iter().cloned());
        table
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            filename: self.filename.clone(),
            output_dir: self.output_dir(),
        }
    }

    /// A writer using these options and timezone definitions.
    pub fn writer(&self) -> IcsWriter {
        IcsWriter::new(self.writer_options())
            .with_encoder(Encoder::new().with_timezones(self.timezone_table()))
    }

    /// Save the current config to `path` as TOML.
    pub fn save(&self, path: &Path) -> IcsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| IcsError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| IcsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> IcsResult<()> {
        let contents = format!(
            "\
# icsgen configuration

# File name used when no output path is given (\".ics\" is appended):
# filename = \"{DEFAULT_FILENAME}\"

# Directory relative output paths are resolved against:
# output_dir = \"~/calendar\"

# Extra VTIMEZONE definitions:
# [[timezones]]
# tzid = \"Europe/Paris\"
# [timezones.standard]
# start = \"1996-10-27T03:00:00\"
# rule = {{ month = 10, week = -1, weekday = \"Sun\" }}
# offset_from = \"+0200\"
# offset_to = \"+0100\"
# name = \"CET\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                IcsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| IcsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = IcsConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.filename, "event");
        assert!(config.timezones.is_empty());
    }

    #[test]
    fn test_default_template_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icsgen/config.toml");

        IcsConfig::create_default_config(&path).unwrap();
        let config = IcsConfig::load_from(&path).unwrap();

        assert_eq!(config.filename, "event");
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_load_timezones_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
filename = "meeting"

[[timezones]]
tzid = "Europe/Paris"

[timezones.standard]
start = "1996-10-27T03:00:00"
rule = { month = 10, week = -1, weekday = "Sun" }
offset_from = "+0200"
offset_to = "+0100"
name = "CET"

[timezones.daylight]
start = "1981-03-29T02:00:00"
rule = { month = 3, week = -1, weekday = "Sun" }
offset_from = "+0100"
offset_to = "+0200"
name = "CEST"
"#,
        )
        .unwrap();

        let config = IcsConfig::load_from(&path).unwrap();
        let table = config.timezone_table();

        assert_eq!(config.filename, "meeting");
        assert!(table.contains("America/New_York"));
        let lines = table.get("Europe/Paris").unwrap().lines();
        assert!(
            lines.contains(&"RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU".to_string()),
            "{lines:?}"
        );
        assert!(lines.contains(&"TZNAME:CEST".to_string()), "{lines:?}");
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = IcsConfig {
            filename: "standup".to_string(),
            output_dir: Some(dir.path().join("out")),
            timezones: vec![ZoneDefinition::america_new_york()],
        };

        config.save(&path).unwrap();
        let loaded = IcsConfig::load_from(&path).unwrap();

        assert_eq!(loaded.filename, "standup");
        assert_eq!(loaded.output_dir, Some(dir.path().join("out")));
        assert_eq!(loaded.timezones, config.timezones);
    }

    #[test]
    fn test_output_dir_expands_tilde() {
        let config = IcsConfig {
            output_dir: Some(PathBuf::from("~/calendar")),
            ..Default::default()
        };

        let expanded = config.output_dir().unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("calendar"));
    }
}
