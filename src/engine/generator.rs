use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::engine::{Bar, Series};
use crate::errors::{Error, Result};

/// Default price of the first bar open.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;
/// Default half-width of the per-bar return distribution.
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Largest price the walk can reach; twice the widest wick above it is still finite.
pub const MAX_PRICE: f64 = f64::MAX / 4.0;

/// Share of the wick range allowed on the side the bar moved towards.
const WIDE_WICK: f64 = 0.5;
/// Share of the wick range allowed on the opposite side.
const NARROW_WICK: f64 = 0.3;

/// Parameters of the random walk.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    base_price: f64,
    volatility: f64,
    anchor: NaiveDateTime,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            volatility: DEFAULT_VOLATILITY,
            anchor: session_open(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a validated configuration anchored today at 09:30:00.
    ///
    /// ### Arguments
    /// * `base_price` - Open price of the first bar, positive and at most [`MAX_PRICE`].
    /// * `volatility` - Fractional bound of each bar return, finite and in `[0, 1)`.
    ///
    /// ### Returns
    /// The configuration, or `InvalidArgument`.
    pub fn new(base_price: f64, volatility: f64) -> Result<Self> {
        if !(base_price > 0.0 && base_price <= MAX_PRICE) {
            return Err(Error::InvalidArgument(format!(
                "base price must be in (0, {MAX_PRICE:e}] (got: {base_price})"
            )));
        }

        if !volatility.is_finite() || !(0.0..1.0).contains(&volatility) {
            return Err(Error::InvalidArgument(format!(
                "volatility must be in [0, 1) (got: {volatility})"
            )));
        }

        Ok(Self {
            base_price,
            volatility,
            anchor: session_open(),
        })
    }

    /// Overrides the timestamp of the first bar.
    pub fn with_anchor(mut self, anchor: NaiveDateTime) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns the first bar open price.
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Returns the per-bar return bound.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the first bar timestamp.
    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }
}

/// Today at 09:30:00 local time.
fn session_open() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default())
}

/// Running state of the walk: where the next bar starts.
#[derive(Debug, Clone, Copy)]
struct Walk {
    time: NaiveDateTime,
    price: f64,
}

impl Walk {
    /// Draws one bar and returns it with the state for the following minute.
    ///
    /// The next walk carries the unrounded close; rounding happens only on the emitted bar.
    /// The close saturates at [`MAX_PRICE`] so every sampled range stays finite.
    fn step<R: Rng + ?Sized>(self, volatility: f64, rng: &mut R) -> (Bar, Walk) {
        let open = self.price;
        let change_rate = rng.random_range(-volatility..=volatility);
        let close = (open * (1.0 + change_rate)).min(MAX_PRICE);

        let range = (close - open).abs() * rng.random_range(1.0..=2.0);
        let (up, down) = if close > open {
            (WIDE_WICK, NARROW_WICK)
        } else {
            (NARROW_WICK, WIDE_WICK)
        };
        let high = open.max(close) + rng.random_range(0.0..=range * up);
        let low = open.min(close) - rng.random_range(0.0..=range * down);

        let high = high.max(open).max(close);
        let low = low.min(open).min(close);

        let bar = Bar::rounded(self.time, open, high, low, close);
        let next = Walk {
            time: self.time + Duration::minutes(1),
            price: close,
        };
        (bar, next)
    }
}

/// Random-walk kline generator with an injectable random source.
#[derive(Debug, Clone)]
pub struct KlineGenerator<R> {
    config: GeneratorConfig,
    rng: R,
}

impl KlineGenerator<ThreadRng> {
    /// Creates a generator backed by the thread-local RNG: every run yields fresh noise.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_rng(config, rand::rng())
    }
}

impl KlineGenerator<StdRng> {
    /// Creates a reproducible generator from a fixed seed.
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> KlineGenerator<R> {
    /// Creates a generator over any random source.
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates `n` consecutive one-minute bars.
    ///
    /// Bar `i` opens at the unrounded close of bar `i - 1` (or the base price) and is
    /// stamped `anchor + i minutes`.
    ///
    /// ### Example
    /// ```rust
    /// use kline_gen::prelude::*;
    ///
    /// let mut generator = KlineGenerator::seeded(GeneratorConfig::default(), 7);
    /// let series = generator.generate(5);
    ///
    /// assert_eq!(series.len(), 5);
    /// assert_eq!(series[0].open(), 100.0);
    /// assert!(series.iter().all(|b| b.low() <= b.open().min(b.close())));
    /// ```
    pub fn generate(&mut self, n: usize) -> Series {
        let volatility = self.config.volatility;
        let rng = &mut self.rng;
        let start = Walk {
            time: self.config.anchor,
            price: self.config.base_price,
        };

        let series: Series = (0..n)
            .scan(start, |walk, _| {
                let (bar, next) = walk.step(volatility, &mut *rng);
                *walk = next;
                Some(bar)
            })
            .collect();

        tracing::debug!(
            bars = series.len(),
            base_price = self.config.base_price,
            volatility,
            "generated kline series"
        );
        series
    }
}

/// Generates `n` bars with the default configuration and a fresh random source.
pub fn generate_default(n: usize) -> Series {
    KlineGenerator::new(GeneratorConfig::default()).generate(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn generator(base_price: f64, volatility: f64, seed: u64) -> KlineGenerator<StdRng> {
        let config = GeneratorConfig::new(base_price, volatility).unwrap().with_anchor(anchor());
        KlineGenerator::seeded(config, seed)
    }

    #[test]
    fn default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.base_price(), 100.0);
        assert_eq!(config.volatility(), 0.02);
        assert_eq!(config.anchor().time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.anchor().date(), Local::now().date_naive());
    }

    #[test]
    fn reject_invalid_base_price() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e308, MAX_PRICE * 1.5] {
            assert!(matches!(GeneratorConfig::new(price, 0.02), Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn reject_invalid_volatility() {
        for volatility in [-0.01, 1.0, 1.5, f64::NAN] {
            assert!(matches!(GeneratorConfig::new(100.0, volatility), Err(Error::InvalidArgument(_))));
        }
        assert!(GeneratorConfig::new(100.0, 0.0).is_ok());
    }

    #[test]
    fn largest_base_price_stays_finite() {
        assert!(GeneratorConfig::new(MAX_PRICE, 0.9).is_ok());

        let series = generator(MAX_PRICE, 0.99, 9).generate(500);
        assert_eq!(series.len(), 500);
        for bar in series.iter() {
            assert!(bar.high().is_finite() && bar.low().is_finite(), "{bar:?}");
            assert!(bar.high() <= MAX_PRICE * 2.0, "{bar:?}");
            assert!(bar.low() <= bar.open().min(bar.close()), "{bar:?}");
            assert!(bar.high() >= bar.open().max(bar.close()), "{bar:?}");
        }
        for pair in series.windows(2) {
            assert_eq!(pair[1].open(), pair[0].close());
        }
    }

    #[test]
    fn count() {
        let mut generator = generator(100.0, 0.02, 1);
        assert_eq!(generator.generate(0).len(), 0);
        assert_eq!(generator.generate(1).len(), 1);
        assert_eq!(generator.generate(10_000).len(), 10_000);
    }

    #[test]
    fn candlestick_ordering() {
        let series = generator(100.0, 0.02, 2).generate(5_000);
        for bar in series.iter() {
            assert!(bar.low() <= bar.open().min(bar.close()), "{bar:?}");
            assert!(bar.high() >= bar.open().max(bar.close()), "{bar:?}");
        }
    }

    #[test]
    fn continuity() {
        let series = generator(100.0, 0.02, 3).generate(2_000);
        assert_eq!(series[0].open(), 100.0);
        for pair in series.windows(2) {
            assert_eq!(pair[1].open(), pair[0].close());
        }
    }

    #[test]
    fn monotonic_timestamps() {
        let series = generator(100.0, 0.02, 4).generate(120);
        assert_eq!(series.first_timestamp(), Some(anchor()));
        for pair in series.windows(2) {
            assert_eq!(pair[1].timestamp() - pair[0].timestamp(), Duration::minutes(1));
        }
        assert_eq!(series.last_timestamp(), Some(anchor() + Duration::minutes(119)));
    }

    #[test]
    fn bounded_volatility() {
        let volatility = 0.02;
        let series = generator(100.0, volatility, 5).generate(5_000);
        for bar in series.iter() {
            // both prices carry up to half a cent of rounding error
            let tolerance = 0.02 / bar.open();
            assert!((bar.close() / bar.open() - 1.0).abs() <= volatility + tolerance, "{bar:?}");
        }
    }

    #[test]
    fn zero_volatility_collapses_range() {
        let series = generator(100.0, 0.0, 6).generate(1);
        assert_eq!(series.len(), 1);
        let bar = &series[0];
        assert_eq!(bar.open(), 100.0);
        assert_eq!(bar.high(), 100.0);
        assert_eq!(bar.low(), 100.0);
        assert_eq!(bar.close(), 100.0);
        assert_eq!(bar.timestamp(), anchor());
    }

    #[test]
    fn five_bars() {
        let series = generator(100.0, 0.02, 7).generate(5);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].open(), 100.0);
        assert_eq!(series[4].timestamp(), anchor() + Duration::minutes(4));
        assert!(series.iter().all(|b| b.low() <= b.open().min(b.close()) && b.high() >= b.open().max(b.close())));
    }

    #[test]
    fn same_seed_same_series() {
        let a = generator(250.0, 0.05, 42).generate(500);
        let b = generator(250.0, 0.05, 42).generate(500);
        let c = generator(250.0, 0.05, 43).generate(500);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn wicks_lean_with_direction() {
        // upper wick of a bullish bar is bounded by half the widened range, lower by 30%
        let series = generator(100.0, 0.02, 8).generate(5_000);
        for bar in series.iter().filter(|b| b.is_bullish()) {
            let bound = bar.body() * 2.0 * WIDE_WICK + 0.03;
            assert!(bar.upper_shadow() <= bound, "{bar:?}");
            let bound = bar.body() * 2.0 * NARROW_WICK + 0.03;
            assert!(bar.lower_shadow() <= bound, "{bar:?}");
        }
    }

    #[test]
    fn default_entry_point() {
        let series = generate_default(3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].open(), DEFAULT_BASE_PRICE);
    }
}
