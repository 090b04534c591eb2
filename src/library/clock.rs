//! Current-date provider used to stamp successful refreshes

use chrono::{DateTime, Local, TimeZone};

#[cfg(test)]
use mockall::automock;

/// Display format of refresh dates, e.g. "Sep 11 09:10"
const DATE_FORMAT: &str = "%b %d %H:%M";

#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    /// Returns the current time as a human-readable string
    fn current_date(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_date(&self) -> String {
        format_date(&Local::now())
    }
}

fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(DATE_FORMAT).to_string()
}
