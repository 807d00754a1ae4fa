//! Date stamp formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Day-month-year with dots, as printed on the sheet
const STAMP_FORMAT: &str = "%d.%m.%Y";

/// Format a label date for the stamp.
///
/// Accepts ISO dates (`2024-01-15`), ISO date-times with or without an
/// offset, and dates already written as `15.01.2024`. The calendar date as
/// written is used; no time zone conversion takes place. Returns `None` when
/// the text is not a recognizable date.
pub fn format_label_date(date: &str) -> Option<String> {
    parse_label_date(date.trim()).map(|d| d.format(STAMP_FORMAT).to_string())
}

fn parse_label_date(date: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(date, STAMP_FORMAT).ok()
}

/// Suggested attachment name for a sheet generated on `date`
pub fn default_output_filename(date: NaiveDate) -> String {
    format!("labels-{}.pdf", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(format_label_date("2024-01-15").as_deref(), Some("15.01.2024"));
    }

    #[test]
    fn test_iso_datetime() {
        assert_eq!(
            format_label_date("2024-03-05T10:30:00.000Z").as_deref(),
            Some("05.03.2024")
        );
        assert_eq!(
            format_label_date("2024-03-05T10:30:00").as_deref(),
            Some("05.03.2024")
        );
    }

    #[test]
    fn test_already_formatted() {
        assert_eq!(format_label_date(" 01.12.2023 ").as_deref(), Some("01.12.2023"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(format_label_date("next tuesday"), None);
        assert_eq!(format_label_date("2024-13-01"), None);
    }

    #[test]
    fn test_output_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(default_output_filename(date), "labels-2024-01-15.pdf");
    }
}
