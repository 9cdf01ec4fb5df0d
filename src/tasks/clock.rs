//! Time source and display formats for task timestamps.

use crate::core::settings::{AppSettings, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Write as _;
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock(Mutex<DateTime<Local>>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(Mutex::new(at))
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// strftime patterns used for `createdAt` and `createdDate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    time: String,
    date: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME_FORMAT.to_string(),
            date: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DateFormats {
    /// Invalid patterns fall back to the defaults.
    pub fn new(time: &str, date: &str) -> Self {
        let sample = Local::now();
        Self {
            time: validated(time, DEFAULT_TIME_FORMAT, |out| {
                write!(out, "{}", sample.format(time))
            }),
            date: validated(date, DEFAULT_DATE_FORMAT, |out| {
                write!(out, "{}", sample.date_naive().format(date))
            }),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(&settings.time_format, &settings.date_format)
    }

    pub fn format_time(&self, at: &DateTime<Local>) -> String {
        at.format(&self.time).to_string()
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date).to_string()
    }

    pub fn parse_date(&self, label: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(label, &self.date).ok()
    }
}

/// A pattern is usable when it parses and every field it names exists on the
/// value it formats (a `NaiveDate` has no hour, for instance).
fn validated<F>(pattern: &str, fallback: &str, render: F) -> String
where
    F: FnOnce(&mut String) -> std::fmt::Result,
{
    let invalid = pattern.is_empty()
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
        || render(&mut String::new()).is_err();
    if invalid {
        tracing::warn!(
            target: "system",
            pattern = pattern,
            fallback = fallback,
            "Invalid date/time format, using fallback"
        );
        fallback.to_string()
    } else {
        pattern.to_string()
    }
}
