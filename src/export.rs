// CSV export of a grouping
// Payload = UTF-8 BOM + "Group,Name" header + one row per member.

use crate::error::ExportError;
use crate::participant::Participant;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Lets spreadsheet apps detect UTF-8
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `Group,Name` CSV text, groups numbered from 1
pub fn groups_to_csv(groups: &[Vec<Participant>]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Group", "Name"])?;

    for (index, group) in groups.iter().enumerate() {
        let label = format!("Group {}", index + 1);
        for member in group {
            wtr.write_record([label.as_str(), member.name.as_str()])?;
        }
    }

    let bytes = wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// BOM-prefixed bytes ready to be written or offered for download
pub fn export_payload(groups: &[Vec<Participant>]) -> Result<Vec<u8>, ExportError> {
    let csv = groups_to_csv(groups)?;
    let mut payload = Vec::with_capacity(UTF8_BOM.len() + csv.len());
    payload.extend_from_slice(UTF8_BOM);
    payload.extend_from_slice(csv.as_bytes());
    Ok(payload)
}

/// `teams_export_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("teams_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export into `dir` and return the file path
pub fn write_export(
    dir: &Path,
    groups: &[Vec<Participant>],
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    if groups.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let path = dir.join(export_file_name(date));
    fs::write(&path, export_payload(groups)?)?;

    info!(file = %path.display(), groups = groups.len(), "exported groups");
    Ok(path)
}
