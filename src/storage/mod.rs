//! Output and input of kline series: CSV files, console tables and JSON.

mod console;
mod csv_file;
#[cfg(feature = "serde")]
mod json_file;

pub use console::*;
pub use csv_file::*;
#[cfg(feature = "serde")]
pub use json_file::*;

/// Default CSV file name.
pub const DEFAULT_OUTPUT: &str = "kline_data.csv";

/// Column labels used for headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    /// Timestamp column.
    pub time: String,
    /// Open price column.
    pub open: String,
    /// High price column.
    pub high: String,
    /// Low price column.
    pub low: String,
    /// Close price column.
    pub close: String,
}

impl ColumnLabels {
    /// `time, open, high, low, close`.
    pub fn english() -> Self {
        Self::from_array(["time", "open", "high", "low", "close"])
    }

    /// `时间, 开盘, 最高, 最低, 收盘`, as used by Chinese charting tools.
    pub fn chinese() -> Self {
        Self::from_array(["时间", "开盘", "最高", "最低", "收盘"])
    }

    fn from_array([time, open, high, low, close]: [&str; 5]) -> Self {
        Self {
            time: time.to_string(),
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
        }
    }

    /// Labels in column order.
    pub fn as_array(&self) -> [&str; 5] {
        [&self.time, &self.open, &self.high, &self.low, &self.close]
    }
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self::english()
    }
}

impl std::str::FromStr for ColumnLabels {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> crate::errors::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::english()),
            "zh" | "cn" | "chinese" => Ok(Self::chinese()),
            other => Err(crate::errors::Error::InvalidArgument(format!(
                "unknown label language: {other} (expected en or zh)"
            ))),
        }
    }
}

/// Formats a price with exactly 2 fractional digits.
fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
#[test]
fn labels_from_str() {
    assert_eq!("en".parse::<ColumnLabels>().unwrap(), ColumnLabels::english());
    assert_eq!("ZH".parse::<ColumnLabels>().unwrap(), ColumnLabels::chinese());
    assert!("fr".parse::<ColumnLabels>().is_err());
    assert_eq!(ColumnLabels::chinese().as_array()[4], "收盘");
}

#[cfg(test)]
#[test]
fn price_format() {
    assert_eq!(format_price(100.5), "100.50");
    assert_eq!(format_price(100.0), "100.00");
    assert_eq!(format_price(99.99), "99.99");
}
