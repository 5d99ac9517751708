//! Date handling: spreadsheet serial dates, date text and month labels

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display pattern for manufacture dates
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%A, %B %d, %Y",
    "%m/%d/%y",
    "%d-%b-%y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Convert a 1900-system serial number to a calendar date.
///
/// Serial 1 is 1900-01-01. Serial 60 is the phantom 1900-02-29 and has no
/// calendar date; see [`format_serial_date`].
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial >= 2_958_466.0 {
        return None;
    }
    let days = serial.floor() as u64;
    let base = match days {
        1..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    base.checked_add_days(Days::new(days))
}

/// Render a serial date as `MM/DD/YYYY`, or `None` if it is out of range
pub fn format_serial_date(serial: f64) -> Option<String> {
    if serial.floor() == 60.0 {
        return Some("02/29/1900".to_string());
    }
    serial_to_date(serial).map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
}

/// Parse free-form date text.
///
/// Accepts ISO, US numeric and spelled-out month forms, optionally with a
/// time of day, plus RFC 3339 and RFC 2822 timestamps.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    let date = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .chain(
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date()),
        )
        // "%Y" happily reads "24" as year 24; leave two-digit years to "%y"
        .find(|d| (1000..=9999).contains(&d.year()));
    if date.is_some() {
        return date;
    }

    // Year-month only ("2024-05")
    NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d")
        .ok()
        .filter(|d| (1000..=9999).contains(&d.year()))
}

/// How month columns are labelled in the sales report
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MonthFormat {
    /// Abbreviated month only ("May"); the same month of different years merges
    Short,
    /// Full month and year ("May 2024")
    #[default]
    Long,
}

/// Canonical month bucket.
///
/// Orders chronologically: by year (when kept), then by month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: Option<i32>,
    month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate, format: MonthFormat) -> Self {
        let year = match format {
            MonthFormat::Short => None,
            MonthFormat::Long => Some(date.year()),
        };
        Self {
            year,
            month: date.month(),
        }
    }

    /// Display label, e.g. "May" or "May 2024"
    pub fn label(&self) -> String {
        let first = NaiveDate::from_ymd_opt(self.year.unwrap_or(2000), self.month, 1);
        match (first, self.year) {
            (Some(d), Some(_)) => d.format("%B %Y").to_string(),
            (Some(d), None) => d.format("%b").to_string(),
            (None, _) => format!("{:02}", self.month),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
