use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::engine::{Bar, BarBuilder, Series};
use crate::errors::{Error, Result};

/// Chart periods a minute series can be resampled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// One minute.
    OneMinute,
    /// Five minutes.
    FiveMinutes,
    /// Fifteen minutes.
    FifteenMinutes,
    /// Thirty minutes.
    ThirtyMinutes,
    /// One hour.
    OneHour,
    /// Four hours.
    FourHours,
    /// One calendar day.
    OneDay,
}

impl Period {
    /// Every supported period, shortest first.
    pub const ALL: [Period; 7] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    /// Length of the period in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::FiveMinutes => 5,
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::OneHour => 60,
            Self::FourHours => 240,
            Self::OneDay => 1440,
        }
    }

    /// Short label, as accepted by [`FromStr`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.label() == s)
            .ok_or(Error::UnknownPeriod(s))
    }
}

/// Trait for merging bars that fall into the same time bucket.
pub trait Aggregation {
    /// Returns the start of the bucket `timestamp` belongs to.
    fn bucket(&self, timestamp: NaiveDateTime) -> NaiveDateTime;

    /// Aggregates a set of bars into a single bar stamped with the bucket start.
    fn aggregate(&self, bars: &[Bar]) -> Result<Bar> {
        let first_bar = bars.first().ok_or(Error::BarDataEmpty)?;
        let last_bar = bars.last().ok_or(Error::BarDataEmpty)?;

        let high = bars.iter().map(Bar::high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(Bar::low).fold(f64::INFINITY, f64::min);

        BarBuilder::builder()
            .timestamp(self.bucket(first_bar.timestamp()))
            .open(first_bar.open())
            .high(high)
            .low(low)
            .close(last_bar.close())
            .build()
    }

    /// Resamples a series, merging consecutive bars of the same bucket.
    ///
    /// A trailing bucket that is not complete is still emitted.
    fn resample(&self, series: &Series) -> Result<Series> {
        let bars = series
            .chunk_by(|a, b| self.bucket(a.timestamp()) == self.bucket(b.timestamp()))
            .map(|group| self.aggregate(group))
            .collect::<Result<Series>>()?;

        tracing::info!(from = series.len(), to = bars.len(), "resampled kline series");
        Ok(bars)
    }
}

/// Buckets are aligned on midnight: a 5m bar covers `09:30..09:35`, a 1h bar `09:00..10:00`.
impl Aggregation for Period {
    fn bucket(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let minute_of_day = timestamp.hour() * 60 + timestamp.minute();
        let start = minute_of_day - minute_of_day % self.minutes();
        let time = NaiveTime::from_hms_opt(start / 60, start % 60, 0).unwrap_or_default();
        timestamp.date().and_time(time)
    }
}
