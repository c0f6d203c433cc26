//! # kline-gen: synthetic candlestick data
//!
//! **kline-gen** produces minute-resolution candlestick ("kline") bars from a bounded random walk
//! and writes them to CSV. It is meant for fixtures: charting front-ends, strategy backtests and
//! anything else that needs plausible OHLC data without real market feeds.
//!
//! ## Core Components
//! | Component   | Description                                                                                     |
//! |-------------|-------------------------------------------------------------------------------------------------|
//! | **`Bar`** | One candlestick: timestamp, open, high, low and close rounded to 2 decimals.                       |
//! | **`Series`** | Bars of one generation, one minute apart, in ascending order.                                  |
//! | **`KlineGenerator`** | Random-walk generator over an injectable RNG (seeded or thread-local).                  |
//! | **`Period`** | Resamples minute bars into 5m, 15m, 30m, 1h, 4h or 1d bars.                                   |
//! | **`storage`** | CSV writer and reader, console table, JSON *(feature `serde`)*.                              |
//! | **`Draw`** | Candlestick charts to SVG or PNG *(feature `draws`)*.                                           |
//!
//! ## The walk
//! Each bar opens at the previous (unrounded) close, starting from `base_price`:
//! - the return is drawn uniformly from `[-volatility, +volatility]`;
//! - the wick budget is `|close - open| * U[1, 2]`, with up to half of it above and 30% below
//!   a bullish bar, and the reverse for bearish or flat bars;
//! - prices are clamped so that `low <= open, close <= high`, then rounded to 2 decimals.
//!
//! ## Getting Started
//! ```rust
//! use kline_gen::prelude::*;
//!
//! let config = GeneratorConfig::new(100.0, 0.02).unwrap();
//! let series = KlineGenerator::seeded(config, 42).generate(60);
//!
//! let mut csv = Vec::new();
//! write_csv(&series, &ColumnLabels::english(), &mut csv).unwrap();
//! assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 61);
//!
//! let hourly = Period::OneHour.resample(&series).unwrap();
//! assert!(hourly.len() <= 2);
//! ```
//!
//! ## Error Handling
//! Every fallible operation returns [`errors::Result`]. Invalid generator parameters are
//! rejected up front with `Error::InvalidArgument`; file failures surface as `Error::IoError`
//! or `Error::CsvError`.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Command-line flow shared by the binary.
pub mod app;

/// Command-line configuration.
pub mod config;

/// Bars, series, generation and resampling.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Logging setup for binaries.
pub mod logging;

/// CSV, console and JSON input/output.
pub mod storage;

/// Utility functions and helpers.
mod utils;

/// Draw graphics with a lot of backends: png, svg, etc.
#[cfg(feature = "draws")]
pub mod draws;

pub use utils::TIMESTAMP_FORMAT;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::storage::*;

    #[cfg(feature = "draws")]
    pub use crate::draws::*;
}
