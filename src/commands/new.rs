use std::path::PathBuf;

use anyhow::{Context, Result};
use icsgen_core::config::IcsConfig;
use owo_colors::OwoColorize;

use crate::args::EventArgs;

pub async fn run(config: &IcsConfig, event: EventArgs, output: Option<PathBuf>) -> Result<()> {
    let attributes = event.into_attributes()?;
    let writer = config.writer();

    let (path, _) = writer
        .create_event(Some(&attributes), output.as_deref())
        .await
        .context("Failed to write event")?;

    let title = attributes.title.as_deref().unwrap_or("Untitled event");
    println!("{}", format!("  Created: {title}").green());
    println!("  {}", path.display().dimmed());

    Ok(())
}
