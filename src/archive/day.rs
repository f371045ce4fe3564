//! Calendar days and day ranges

use crate::{CrawlerError, Result};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// chrono format of a canonical day string
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Returns true if `value` looks like `DDDD-DD-DD`
///
/// This is only a shape check: `2020-13-45` passes it. Calendar validity
/// is checked when the day is turned into a date.
pub fn matches_day_pattern(value: &str) -> bool {
    DAY_PATTERN.is_match(value)
}

static DAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to compile day regex"));

/// A single archive day in canonical `YYYY-MM-DD` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Day(String);

impl Day {
    /// Accepts any string matching the day pattern
    ///
    /// # Errors
    ///
    /// `CrawlerError::DayFormat` if the shape is wrong. Month and day ranges
    /// are not checked here.
    pub fn parse(value: &str) -> Result<Self> {
        if !matches_day_pattern(value) {
            return Err(CrawlerError::DayFormat {
                day: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DAY_FORMAT).to_string())
    }

    /// Today in local time
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to a calendar date, failing on impossible dates
    pub fn to_date(&self) -> Result<NaiveDate> {
        parse_date(&self.0)
    }

    /// The following calendar day, rolling over months and years
    pub fn next(&self) -> Result<Self> {
        let date = self.to_date()?;
        let next = date.succ_opt().ok_or_else(|| CrawlerError::DayFormat {
            day: self.0.clone(),
        })?;
        Ok(Self::from_date(next))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT).map_err(|source| CrawlerError::DateParse {
        value: value.to_string(),
        source,
    })
}

/// Half-open range of days `[start, end)`
///
/// The range itself is just two bounds; every call to [`DateRange::iter`]
/// starts a fresh lazy walk from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Parses both bounds as calendar dates
    ///
    /// # Errors
    ///
    /// `CrawlerError::DateParse` if either bound is not a real date.
    pub fn new(start: &str, end: &str) -> Result<Self> {
        Ok(Self::from_dates(parse_date(start)?, parse_date(end)?))
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days in the range (zero when `end <= start`)
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days().max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<Day> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<Day> {
        if self.is_empty() {
            return None;
        }
        self.end.pred_opt().map(Day::from_date)
    }

    pub fn iter(&self) -> Days {
        Days {
            next: self.start,
            end: self.end,
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = Day;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Lazy walk over a [`DateRange`]
#[derive(Debug, Clone)]
pub struct Days {
    next: NaiveDate,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        self.next = current.succ_opt().unwrap_or(self.end);
        Some(Day::from_date(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).num_days().max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}
