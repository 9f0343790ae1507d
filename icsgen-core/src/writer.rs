//! Write encoded events to `.ics` files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{IcsError, IcsResult};
use crate::event::EventAttributes;
use crate::ics::Encoder;

/// Where `IcsWriter` puts files when the caller gives no explicit path.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Base name for the file; ".ics" is appended
    pub filename: String,
    /// Directory relative paths are resolved against (current dir if None)
    pub output_dir: Option<PathBuf>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            filename: "event".to_string(),
            output_dir: None,
        }
    }
}

/// Encodes events and persists them.
#[derive(Clone, Default)]
pub struct IcsWriter {
    options: WriterOptions,
    encoder: Encoder,
}

impl IcsWriter {
    pub fn new(options: WriterOptions) -> Self {
        IcsWriter {
            options,
            encoder: Encoder::default(),
        }
    }

    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn build_event(&self, attributes: Option<&EventAttributes>) -> String {
        self.encoder.encode(attributes)
    }

    /// Resolve the file an event would be written to.
    ///
    /// Whatever extension `filepath` carries is replaced with ".ics";
    /// `None` means `<filename>.ics`.
    pub fn destination(&self, filepath: Option<&Path>) -> IcsResult<PathBuf> {
        let requested = match filepath {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(format!("{}.ics", self.options.filename)),
        };

        let stem = requested.file_stem().ok_or_else(|| {
            IcsError::Config(format!("Invalid destination '{}'", requested.display()))
        })?;
        let mut file_name = stem.to_os_string();
        file_name.push(".ics");

        let base = match self.options.output_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let parent = requested.parent().unwrap_or(Path::new(""));

        Ok(base.join(parent).join(file_name))
    }

    /// Encode `attributes` and write the document to its destination.
    ///
    /// Returns the destination and the written document. Write failures are
    /// returned as-is; nothing is retried.
    pub async fn create_event(
        &self,
        attributes: Option<&EventAttributes>,
        filepath: Option<&Path>,
    ) -> IcsResult<(PathBuf, String)> {
        let document = self.build_event(attributes);
        let destination = self.destination(filepath)?;

        tokio::fs::write(&destination, &document).await?;
        info!(path = %destination.display(), "Wrote event");

        Ok((destination, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FixedClock, FixedUid};
    use chrono::{TimeZone, Utc};

    fn writer_in(dir: &Path) -> IcsWriter {
        IcsWriter::new(WriterOptions {
            output_dir: Some(dir.to_path_buf()),
            ..Default::default()
        })
        .with_encoder(
            Encoder::new()
                .with_uid_source(FixedUid("uid-1".to_string()))
                .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())),
        )
    }

    #[test]
    fn test_destination_defaults_to_filename() {
        let writer = writer_in(Path::new("/srv/cal"));
        assert_eq!(
            writer.destination(None).unwrap(),
            PathBuf::from("/srv/cal/event.ics")
        );
    }

    #[test]
    fn test_destination_replaces_extension() {
        let writer = writer_in(Path::new("/srv/cal"));
        assert_eq!(
            writer.destination(Some(Path::new("out/party.txt"))).unwrap(),
            PathBuf::from("/srv/cal/out/party.ics")
        );
        assert_eq!(
            writer.destination(Some(Path::new("party"))).unwrap(),
            PathBuf::from("/srv/cal/party.ics")
        );
        assert_eq!(
            writer.destination(Some(Path::new("/abs/party.ics"))).unwrap(),
            PathBuf::from("/abs/party.ics")
        );
    }

    #[test]
    fn test_destination_without_output_dir_uses_cwd() {
        let writer = IcsWriter::new(WriterOptions::default());
        let expected = std::env::current_dir().unwrap().join("event.ics");
        assert_eq!(writer.destination(None).unwrap(), expected);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_event_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());
        let attrs = EventAttributes {
            title: Some("Launch".to_string()),
            start: Some("2024-06-01".to_string()),
            ..Default::default()
        };

        let (path, document) = writer
            .create_event(Some(&attrs), Some(Path::new("launch")))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("launch.ics"));
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, document);
        assert!(on_disk.contains("SUMMARY:Launch\r\n"), "{on_disk}");
    }

    #[tokio::test]
    async fn test_create_event_surfaces_write_errors() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());

        let err = writer
            .create_event(None, Some(Path::new("missing/sub/dir/event")))
            .await
            .unwrap_err();

        match err {
            IcsError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected IO error, got {other:?}"),
        }
    }
}
