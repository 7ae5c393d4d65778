//! Terminal tables

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use filings_core::{CompanyDocument, IngestReport, Record};

const SUBJECT_WIDTH: usize = 60;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub fn records(records: &[Record]) -> Table {
    let mut table = table(vec!["Company", "Symbol", "Subject", "Timestamp", "Size"]);
    for record in records {
        let payload = record.payload();
        table.add_row(vec![
            record.company().unwrap_or("-").to_string(),
            record.symbol().unwrap_or("-").to_string(),
            truncate(payload.get_str("Subject").unwrap_or("-"), SUBJECT_WIDTH),
            record.timestamp().unwrap_or("-").to_string(),
            payload.get_str("File_Size").unwrap_or("-").to_string(),
        ]);
    }
    table
}

pub fn report(report: &IngestReport) -> Table {
    let mut table = table(vec!["Saved", "Duplicates", "Rejected", "Failed companies"]);
    table.add_row(vec![
        report.inserted.to_string(),
        report.duplicates.to_string(),
        report.rejected.to_string(),
        report.errors.len().to_string(),
    ]);
    table
}

pub fn document(doc: &CompanyDocument) -> Table {
    let mut table = table(vec!["Timestamp", "Subject", "Attachment", "Scraped at"]);
    for announcement in &doc.announcements {
        let payload = announcement.payload();
        table.add_row(vec![
            announcement.timestamp().to_string(),
            truncate(payload.get_str("Subject").unwrap_or("-"), SUBJECT_WIDTH),
            payload.get_str("Attachment_URL").unwrap_or("-").to_string(),
            announcement.scraped_at().to_rfc3339(),
        ]);
    }
    table
}

pub fn companies(rows: &[(String, Option<String>, usize)]) -> Table {
    let mut table = table(vec!["Company", "Symbol", "Announcements"]);
    for (company, symbol, count) in rows {
        table.add_row(vec![
            company.clone(),
            symbol.clone().unwrap_or_else(|| "-".to_string()),
            count.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("धन्यवाद नमस्ते", 3).chars().count(), 3);
    }

    #[test]
    fn test_records_table() {
        let rows: Vec<Record> = [json!({
            "sm_name": "Infosys Limited",
            "symbol": "INFY",
            "desc": "Updates",
            "an_dt": "21-Oct-2025 21:41:32",
            "sm_size": "597.28 KB"
        })]
        .into_iter()
        .filter_map(Record::from_value)
        .collect();

        let rendered = records(&rows).to_string();
        assert!(rendered.contains("Infosys Limited"));
        assert!(rendered.contains("597.28 KB"));
    }

    #[test]
    fn test_report_table() {
        let rendered = report(&IngestReport {
            inserted: 3,
            duplicates: 1,
            ..IngestReport::default()
        })
        .to_string();
        assert!(rendered.contains("Duplicates"));
        assert!(rendered.contains('3'));
    }
}
