//! Core kline components.
//!
//! This module provides the fundamental types for synthetic market data:
//! - `Bar`: one minute candlestick, built through `BarBuilder`.
//! - `Series`: the ordered bars of one generation.
//! - `KlineGenerator`: random-walk generator with an injectable random source.
//! - `Period` / `Aggregation`: resampling minute bars into coarser periods.

mod aggregate;
mod bar;
mod generator;

pub use aggregate::*;
pub use bar::*;
pub use generator::*;
