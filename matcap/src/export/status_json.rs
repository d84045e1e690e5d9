use std::io::Write;

use crate::control::StatusReport;
use crate::domain::ExportError;

/// Write `report` as pretty-printed JSON to any writer
///
/// # Errors
/// Returns [`ExportError::Json`] if serialization or the write fails
pub fn export_status<W: Write>(report: &StatusReport, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
