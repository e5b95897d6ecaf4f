//! Import command for replacing the stored days with a timesheet report.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use hl_core::{DayStore, parse_report_bytes};

use crate::Config;
use crate::state::save_store;

/// Runs the import command.
///
/// The parsed report replaces the stored days wholesale; earlier imports,
/// punches and edits are discarded.
pub fn run<W: Write>(writer: &mut W, source: &Path, config: &Config) -> Result<()> {
    let bytes = read_source(source)?;
    let store = import_bytes(&bytes, writer, config)?;
    save_store(&config.state_path, &store)?;
    Ok(())
}

fn import_bytes<W: Write>(bytes: &[u8], writer: &mut W, config: &Config) -> Result<DayStore> {
    let report = parse_report_bytes(bytes, &config.markers);
    let rejected = report.rejected;
    let store = DayStore::from_report(report);

    writeln!(writer, "Imported {} days ({rejected} rejected)", store.len())?;
    if store.is_empty() {
        writeln!(
            writer,
            "Hint: no day lines found. Check the report has a month anchor and a detail section."
        )?;
    }
    Ok(store)
}

fn read_source(source: &Path) -> Result<Vec<u8>> {
    if source == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("failed to read report from stdin")?;
        return Ok(bytes);
    }
    std::fs::read(source).with_context(|| format!("failed to read {}", source.display()))
}
