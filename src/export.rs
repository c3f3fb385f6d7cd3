//! CSV export of feedback entries

use habesha_core::analytics::{display_details, display_location};
use habesha_core::FeedbackEntry;
use serde::Serialize;
use std::io::Write;

/// One flattened CSV row
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    timestamp: String,
    source: &'static str,
    rating: Option<f64>,
    category: Option<&'static str>,
    severity: Option<&'static str>,
    location: &'a str,
    area: Option<&'a str>,
    negative: bool,
    details: &'a str,
}

impl<'a> ExportRow<'a> {
    fn from_entry(entry: &'a FeedbackEntry) -> Self {
        Self {
            id: &entry.id,
            timestamp: entry.timestamp.to_rfc3339(),
            source: entry.source.as_str(),
            rating: entry.overall_rating.or(entry.rating.map(f64::from)),
            category: entry.category.map(|c| c.as_str()),
            severity: entry.severity.map(|s| s.as_str()),
            location: display_location(entry),
            area: entry.feedback_area.as_deref(),
            negative: entry.is_negative,
            details: display_details(entry),
        }
    }
}

/// Write entries as CSV with a header row
pub fn write_csv<W: Write>(entries: &[FeedbackEntry], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for entry in entries {
        writer.serialize(ExportRow::from_entry(entry))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use habesha_core::{Severity, StaffCategory, StaffLog};

    #[test]
    fn test_write_csv() {
        let log = StaffLog {
            category: Some(StaffCategory::Maintenance),
            severity: Some(Severity::High),
            location: Some("Room 12".to_string()),
            details: "AC leaking, \"urgent\"".to_string(),
        };
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let entries = vec![FeedbackEntry::staff("s1", at, &log)];

        let mut out = Vec::new();
        write_csv(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("id,timestamp,source,rating,category,severity,location,area,negative,details")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("s1,2025-03-01T09:30:00+00:00,Staff,,Maintenance,High,Room 12,"));
        assert!(row.ends_with(",true,\"AC leaking, \"\"urgent\"\"\""));
    }

    #[test]
    fn test_empty_export_has_no_rows() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
