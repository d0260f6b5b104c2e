//! Human-readable date formatting for resurface confirmations.
//!
//! The ordinal rule lives here and nowhere else — the dashboard shows the
//! same "March 3rd" form in the pause confirmation and the paused-item
//! list, and both go through `format_resurface_date`.

use chrono::{DateTime, Datelike, Utc};

/// Ordinal suffix for a day of the month.
///
/// 1/21/31 → "st", 2/22 → "nd", 3/23 → "rd", everything else (including
/// 11–13) → "th".
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Format a timestamp as "March 3rd" — month name plus ordinal day.
///
/// Locale-independent on purpose: the source of truth is the fixed suffix
/// table above, not the viewer's locale.
pub fn format_resurface_date(ts: DateTime<Utc>) -> String {
    let day = ts.day();
    format!("{} {}{}", ts.format("%B"), day, ordinal_suffix(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn suffix_table() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(30), "th");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn formats_month_and_ordinal_day() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        assert_eq!(format_resurface_date(ts), "March 3rd");

        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(format_resurface_date(ts), "December 31st");

        let ts = Utc.with_ymd_and_hms(2025, 11, 11, 0, 0, 0).unwrap();
        assert_eq!(format_resurface_date(ts), "November 11th");
    }
}
