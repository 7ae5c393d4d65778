//! CSV export of fetched records

use anyhow::Context;
use filings_core::Record;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Column order of the exported file
pub const COLUMNS: [&str; 8] = [
    "Symbol",
    "Company",
    "Subject",
    "Description",
    "Attachment_URL",
    "File_Size",
    "Timestamp",
    "XBRL_Link",
];

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write records as CSV with a header row
pub fn write_csv<W: Write>(writer: W, records: &[Record]) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;

    for record in records {
        let payload = record.payload();
        out.write_record([
            cell(payload.get("Symbol")),
            record.company().unwrap_or_default().to_string(),
            cell(payload.get("Subject")),
            cell(payload.get("Description")),
            cell(payload.get("Attachment_URL")),
            cell(payload.get("File_Size")),
            record.timestamp().unwrap_or_default().to_string(),
            cell(payload.get("XBRL_Link")),
        ])?;
    }

    out.flush()?;
    Ok(())
}

/// Write records to a CSV file, replacing it
pub fn export_csv(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("cannot write {}", path.display()))
}
