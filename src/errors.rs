/// Result type of the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, reading or writing kline data.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A generator or command-line argument is out of its accepted range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required field was not set on the bar builder.
    #[error("Missing bar field: {0}")]
    MissingField(&'static str),

    /// The prices break the candlestick ordering `low <= open, close <= high`.
    #[error("Invalid price order (open: {open}, high: {high}, low: {low}, close: {close})")]
    InvalidPriceOrder {
        /// Open price.
        open: f64,
        /// High price.
        high: f64,
        /// Low price.
        low: f64,
        /// Close price.
        close: f64,
    },

    /// The timestamp could not be parsed with any supported format.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The period label is not one of `1m, 5m, 15m, 30m, 1h, 4h, 1d`.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// The bar data provided is empty.
    #[error("Bar data is empty: at least one bar is required")]
    BarDataEmpty,

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization/deserialization error occurred.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The plotting backend failed.
    #[cfg(feature = "draws")]
    #[error("Plotters error: {0}")]
    Plotters(String),
}
