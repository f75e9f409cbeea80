//! Calendar-day keys and the clock that produces them.
//!
//! A [`DateKey`] has day granularity in the device's local timezone, so every
//! call within one calendar day yields the same key and calls on either side
//! of midnight yield different keys.

use std::fmt;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day identifier, e.g. `2024-05-30`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }

    /// Parse a stored key. Returns `None` for anything that is not a valid
    /// `YYYY-MM-DD` date.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .ok()
            .map(Self::from_date)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn today_key(&self) -> DateKey {
        DateKey::from_date(self.today())
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable day. Used to simulate day rollover.
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap_or_else(|e| e.into_inner()) = date;
    }

    /// Move the clock forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        let mut date = self.date.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = date.checked_add_days(chrono::Days::new(days)) {
            *date = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
