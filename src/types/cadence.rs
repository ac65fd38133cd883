//! Defines the resampling cadence applied to raw buoy records, and how a
//! timestamp is assigned to a cadence bucket.

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The time bucket resolution that raw observations are averaged into.
///
/// Buckets are labeled the same way pandas labels its `H`, `D`, `W` and `M`
/// resampling rules:
///
/// * `Hourly`: the start of the hour.
/// * `Daily`: midnight of the calendar day.
/// * `Weekly`: midnight of the Sunday that closes the week (Monday to Sunday).
/// * `Monthly`: midnight of the last day of the month.
///
/// # Examples
///
/// ```
/// use buoydata::Cadence;
/// use chrono::NaiveDate;
///
/// let t = NaiveDate::from_ymd_opt(2020, 3, 4).unwrap().and_hms_opt(13, 50, 0).unwrap();
/// assert_eq!(Cadence::Daily.bucket(t), NaiveDate::from_ymd_opt(2020, 3, 4).unwrap().and_hms_opt(0, 0, 0).unwrap());
/// assert_eq!("W".parse::<Cadence>().unwrap(), Cadence::Weekly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cadence {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown cadence '{0}', expected one of H, D, W, M")]
pub struct ParseCadenceError(pub String);

impl Cadence {
    pub(crate) fn alias(&self) -> &'static str {
        match self {
            Cadence::Hourly => "H",
            Cadence::Daily => "D",
            Cadence::Weekly => "W",
            Cadence::Monthly => "M",
        }
    }

    /// Returns the label of the bucket `timestamp` falls into.
    pub fn bucket(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let date = timestamp.date();
        match self {
            Cadence::Hourly => date.and_time(
                chrono::NaiveTime::from_hms_opt(timestamp.hour(), 0, 0).unwrap_or_default(),
            ),
            Cadence::Daily => midnight(date),
            Cadence::Weekly => {
                let to_sunday = 6 - date.weekday().num_days_from_monday();
                midnight(date + Days::new(u64::from(to_sunday)))
            }
            Cadence::Monthly => midnight(last_day_of_month(date)),
        }
    }

    /// Returns the label of the bucket following `label`.
    ///
    /// `label` must itself be a bucket label produced by [`Cadence::bucket`].
    pub fn next(&self, label: NaiveDateTime) -> NaiveDateTime {
        match self {
            Cadence::Hourly => label + Duration::hours(1),
            Cadence::Daily => label + Duration::days(1),
            Cadence::Weekly => label + Duration::days(7),
            Cadence::Monthly => {
                let first_of_next = label.date() + Days::new(1);
                midnight(last_day_of_month(first_of_next))
            }
        }
    }

    /// All bucket labels from the bucket of `first` to the bucket of `last`, inclusive.
    pub fn labels_between(&self, first: NaiveDateTime, last: NaiveDateTime) -> Vec<NaiveDateTime> {
        let end = self.bucket(last);
        let mut label = self.bucket(first);
        let mut labels = Vec::new();
        while label <= end {
            labels.push(label);
            label = self.next(label);
        }
        labels
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    (first + Months::new(1)) - Days::new(1)
}

impl FromStr for Cadence {
    type Err = ParseCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" | "hourly" => Ok(Cadence::Hourly),
            "D" | "d" | "daily" => Ok(Cadence::Daily),
            "W" | "w" | "weekly" => Ok(Cadence::Weekly),
            "M" | "monthly" => Ok(Cadence::Monthly),
            other => Err(ParseCadenceError(other.to_string())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias())
    }
}
