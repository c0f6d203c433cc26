use std::ops::Deref;

use chrono::NaiveDateTime;

use crate::errors::{Error, Result};
use crate::utils::round2;

/// One synthetic candlestick over a one-minute interval.
///
/// A bar always satisfies `low <= min(open, close)` and `high >= max(open, close)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    timestamp: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Bar {
    /// Builds a bar from raw walk prices, rounding each one to 2 decimals.
    ///
    /// Rounding is monotonic, so the ordering of already clamped prices survives it.
    pub(crate) fn rounded(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(close),
        }
    }

    /// Returns the bar open time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the open price.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Returns the highest price.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns the lowest price.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the close price.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Whether the bar closed strictly above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Absolute distance between open and close.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Wick above the body.
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.close.max(self.open)
    }

    /// Wick below the body.
    pub fn lower_shadow(&self) -> f64 {
        self.close.min(self.open) - self.low
    }

    /// Distance between high and low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Builder for [`Bar`] that checks the candlestick ordering on `build`.
#[derive(Debug, Default)]
pub struct BarBuilder {
    timestamp: Option<NaiveDateTime>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
}

impl BarBuilder {
    /// Starts an empty builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the bar open time.
    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the open price.
    pub fn open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Sets the highest price.
    pub fn high(mut self, high: f64) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets the lowest price.
    pub fn low(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    /// Sets the close price.
    pub fn close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }

    /// Builds the bar.
    ///
    /// ### Returns
    /// The bar, or `MissingField` when a field was never set, or
    /// `InvalidPriceOrder` when a price is not finite or the prices do not form a candlestick.
    pub fn build(self) -> Result<Bar> {
        let timestamp = self.timestamp.ok_or(Error::MissingField("timestamp"))?;
        let open = self.open.ok_or(Error::MissingField("open"))?;
        let high = self.high.ok_or(Error::MissingField("high"))?;
        let low = self.low.ok_or(Error::MissingField("low"))?;
        let close = self.close.ok_or(Error::MissingField("close"))?;

        let finite = [open, high, low, close].iter().all(|price| price.is_finite());
        if !finite || !(low <= open.min(close) && high >= open.max(close)) {
            return Err(Error::InvalidPriceOrder { open, high, low, close });
        }

        Ok(Bar {
            timestamp,
            open,
            high,
            low,
            close,
        })
    }
}

/// Bars of one invocation, ordered by timestamp ascending.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<Bar>);

impl Series {
    /// Returns the underlying bars.
    pub fn into_inner(self) -> Vec<Bar> {
        self.0
    }

    /// Timestamp of the first bar, if any.
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.0.first().map(Bar::timestamp)
    }

    /// Timestamp of the last bar, if any.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.0.last().map(Bar::timestamp)
    }
}

impl Deref for Series {
    type Target = [Bar];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Bar>> for Series {
    fn from(bars: Vec<Bar>) -> Self {
        Self(bars)
    }
}

impl FromIterator<Bar> for Series {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Series {
    type Item = Bar;
    type IntoIter = std::vec::IntoIter<Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
fn ts(hour: u32, minute: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 8)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[cfg(test)]
#[test]
fn build_valid_bar() {
    let bar = BarBuilder::builder()
        .timestamp(ts(9, 30))
        .open(100.0)
        .high(101.5)
        .low(99.2)
        .close(101.0)
        .build()
        .unwrap();

    assert_eq!(bar.timestamp(), ts(9, 30));
    assert!(bar.is_bullish());
    assert_eq!(bar.body(), 1.0);
    assert_eq!(bar.upper_shadow(), 0.5);
    assert!((bar.lower_shadow() - 0.8).abs() < 1e-9);
    assert!((bar.range() - 2.3).abs() < 1e-9);
}

#[cfg(test)]
#[test]
fn build_flat_bar() {
    let bar = BarBuilder::builder()
        .timestamp(ts(9, 30))
        .open(100.0)
        .high(100.0)
        .low(100.0)
        .close(100.0)
        .build()
        .unwrap();

    assert!(!bar.is_bullish());
    assert_eq!(bar.range(), 0.0);
}

#[cfg(test)]
#[test]
fn build_rejects_high_below_close() {
    let result = BarBuilder::builder()
        .timestamp(ts(9, 30))
        .open(100.0)
        .high(100.5)
        .low(99.0)
        .close(101.0)
        .build();

    assert!(matches!(result, Err(Error::InvalidPriceOrder { high, .. }) if high == 100.5));
}

#[cfg(test)]
#[test]
fn build_rejects_low_above_open() {
    let result = BarBuilder::builder()
        .timestamp(ts(9, 30))
        .open(100.0)
        .high(102.0)
        .low(100.5)
        .close(101.0)
        .build();

    assert!(matches!(result, Err(Error::InvalidPriceOrder { .. })));
}

#[cfg(test)]
#[test]
fn build_rejects_nan() {
    let result = BarBuilder::builder()
        .timestamp(ts(9, 30))
        .open(f64::NAN)
        .high(102.0)
        .low(99.0)
        .close(101.0)
        .build();

    assert!(matches!(result, Err(Error::InvalidPriceOrder { .. })));
}

#[cfg(test)]
#[test]
fn build_rejects_non_finite_prices() {
    let valid = [100.0, 102.0, 99.0, 101.0];
    for position in 0..4 {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut prices = valid;
            prices[position] = bad;
            let [open, high, low, close] = prices;
            let result = BarBuilder::builder()
                .timestamp(ts(9, 30))
                .open(open)
                .high(high)
                .low(low)
                .close(close)
                .build();
            assert!(matches!(result, Err(Error::InvalidPriceOrder { .. })), "{prices:?}");
        }
    }
}

#[cfg(test)]
#[test]
fn build_missing_field() {
    let result = BarBuilder::builder().timestamp(ts(9, 30)).open(1.0).high(1.0).low(1.0).build();
    assert!(matches!(result, Err(Error::MissingField("close"))));

    let result = BarBuilder::builder().open(1.0).build();
    assert!(matches!(result, Err(Error::MissingField("timestamp"))));
}

#[cfg(test)]
#[test]
fn rounded_bar() {
    let bar = Bar::rounded(ts(9, 30), 100.004, 100.456, 99.994, 100.125_1);
    assert_eq!(bar.open(), 100.0);
    assert_eq!(bar.high(), 100.46);
    assert_eq!(bar.low(), 99.99);
    assert_eq!(bar.close(), 100.13);
}

#[cfg(test)]
#[test]
fn series_accessors() {
    let empty = Series::default();
    assert!(empty.is_empty());
    assert_eq!(empty.first_timestamp(), None);

    let series: Series = (0..3)
        .map(|i| Bar::rounded(ts(9, 30 + i), 100.0, 100.0, 100.0, 100.0))
        .collect();

    assert_eq!(series.len(), 3);
    assert_eq!(series.first_timestamp(), Some(ts(9, 30)));
    assert_eq!(series.last_timestamp(), Some(ts(9, 32)));
    assert_eq!((&series).into_iter().count(), 3);
    assert_eq!(series.into_inner().len(), 3);
}
