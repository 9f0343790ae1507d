use std::io::Write;

use anyhow::Result;
use icsgen_core::config::IcsConfig;

use crate::args::EventArgs;

pub fn run(config: &IcsConfig, event: EventArgs) -> Result<()> {
    let attributes = event.into_attributes()?;
    let document = config.writer().build_event(Some(&attributes));

    let mut stdout = std::io::stdout().lock();
    write_document(&mut stdout, &document)?;

    Ok(())
}

/// Write the document byte for byte; no terminator is appended.
fn write_document(out: &mut impl Write, document: &str) -> std::io::Result<()> {
    out.write_all(document.as_bytes())?;
    out.flush()
}
