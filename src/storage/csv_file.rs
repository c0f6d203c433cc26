use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};

use super::{ColumnLabels, format_price};
use crate::engine::{BarBuilder, Series};
use crate::errors::Result;
use crate::utils::{format_timestamp, parse_timestamp};

/// Number of columns of a kline row: time, open, high, low, close.
const COLUMNS: usize = 5;

/// Writes a header row followed by one `time,open,high,low,close` row per bar.
pub fn write_csv<W: Write>(series: &Series, labels: &ColumnLabels, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(labels.as_array())?;

    for bar in series.iter() {
        writer.write_record([
            format_timestamp(&bar.timestamp()),
            format_price(bar.open()),
            format_price(bar.high()),
            format_price(bar.low()),
            format_price(bar.close()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Saves `series` to `path` with English labels, truncating any existing file.
///
/// ### Example
/// ```rust,no_run
/// use kline_gen::prelude::*;
///
/// let series = generate_default(10_000);
/// save(&series, "kline_data.csv").unwrap();
/// ```
pub fn save(series: &Series, path: impl AsRef<Path>) -> Result<()> {
    save_with_labels(series, &ColumnLabels::default(), path)
}

/// Saves `series` to `path` with the given header labels.
pub fn save_with_labels(series: &Series, labels: &ColumnLabels, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(series, labels, file)?;
    tracing::info!(path = %path.display(), rows = series.len(), "kline data saved");
    Ok(())
}

/// Reads a kline CSV whatever its header labels.
///
/// Fields are trimmed and unquoted, blank lines are ignored and rows with fewer than
/// five fields are skipped. Every row must still form a valid candlestick.
pub fn read_csv<R: Read>(reader: R) -> Result<Series> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < COLUMNS {
            tracing::warn!(
                line = record.position().map(|p| p.line()),
                fields = record.len(),
                "skipping short kline row"
            );
            continue;
        }

        let row: StringRecord = record.iter().take(COLUMNS).collect();
        let (time, open, high, low, close): (String, f64, f64, f64, f64) = row.deserialize(None)?;
        let bar = BarBuilder::builder()
            .timestamp(parse_timestamp(&time)?)
            .open(open)
            .high(high)
            .low(low)
            .close(close)
            .build()?;
        bars.push(bar);
    }

    Ok(Series::from(bars))
}

/// Loads a kline CSV from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Series> {
    let path = path.as_ref();
    let series = read_csv(File::open(path)?)?;
    tracing::info!(path = %path.display(), rows = series.len(), "kline data loaded");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GeneratorConfig, KlineGenerator};
    use crate::errors::Error;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap().and_hms_opt(9, minute, 0).unwrap()
    }

    fn sample() -> Series {
        let bars = vec![
            BarBuilder::builder().timestamp(at(30)).open(100.0).high(101.5).low(99.2).close(101.0).build().unwrap(),
            BarBuilder::builder().timestamp(at(31)).open(101.0).high(101.1).low(100.25).close(100.5).build().unwrap(),
        ];
        Series::from(bars)
    }

    fn generated(n: usize) -> Series {
        let config = GeneratorConfig::default().with_anchor(at(30));
        KlineGenerator::seeded(config, 11).generate(n)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kline-gen-{}-{name}", std::process::id()))
    }

    #[test]
    fn write_english() {
        let mut out = Vec::new();
        write_csv(&sample(), &ColumnLabels::english(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "time,open,high,low,close\n\
             2024-03-08 09:30:00,100.00,101.50,99.20,101.00\n\
             2024-03-08 09:31:00,101.00,101.10,100.25,100.50\n"
        );
    }

    #[test]
    fn write_chinese_header() {
        let mut out = Vec::new();
        write_csv(&Series::default(), &ColumnLabels::chinese(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "时间,开盘,最高,最低,收盘\n");
    }

    #[test]
    fn save_three_rows() {
        let path = temp_path("three.csv");
        save(&generated(3), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time,open,high,low,close");
        assert!(lines[1].starts_with("2024-03-08 09:30:00,100.00,"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_overwrites() {
        let path = temp_path("overwrite.csv");
        save(&generated(50), &path).unwrap();
        save(&generated(2), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_load_round_trip() {
        let path = temp_path("round-trip.csv");
        let series = generated(500);
        save_with_labels(&series, &ColumnLabels::chinese(), &path).unwrap();
        assert_eq!(load(&path).unwrap(), series);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_into_missing_directory() {
        let path = temp_path("missing-dir").join("out.csv");
        assert!(matches!(save(&sample(), path), Err(Error::IoError(_))));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(load(temp_path("does-not-exist.csv")), Err(Error::IoError(_))));
    }

    #[test]
    fn read_tolerates_quotes_blank_lines_and_short_rows() {
        let input = "时间,开盘,最高,最低,收盘\n\
                     \"2024-03-08 09:30:00\",100.00, 101.50 ,99.20,101.00\n\
                     \n\
                     2024-03-08 09:31:00,101.00\n\
                     2024/03/08 09:32:00,101.00,101.10,100.25,100.50,extra\n";
        let series = read_csv(input.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].high(), 101.5);
        assert_eq!(series[1].timestamp(), at(32));
        assert_eq!(series[1].close(), 100.5);
    }

    #[test]
    fn read_header_only() {
        assert!(read_csv("time,open,high,low,close\n".as_bytes()).unwrap().is_empty());
        assert!(read_csv("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn read_bad_timestamp() {
        let input = "time,open,high,low,close\nsoon,1,1,1,1\n";
        assert!(matches!(read_csv(input.as_bytes()), Err(Error::InvalidTimestamp(s)) if s == "soon"));
    }

    #[test]
    fn read_bad_price() {
        let input = "time,open,high,low,close\n2024-03-08 09:30:00,abc,1,1,1\n";
        assert!(matches!(read_csv(input.as_bytes()), Err(Error::CsvError(_))));
    }

    #[test]
    fn read_broken_candle() {
        let input = "time,open,high,low,close\n2024-03-08 09:30:00,100,99,98,100\n";
        assert!(matches!(read_csv(input.as_bytes()), Err(Error::InvalidPriceOrder { .. })));
    }

    #[test]
    fn read_rejects_non_finite_prices() {
        for price in ["NaN", "inf", "-inf"] {
            let input = format!("time,open,high,low,close\n2024-03-08 09:30:00,{price},102,99,101\n");
            assert!(
                matches!(read_csv(input.as_bytes()), Err(Error::InvalidPriceOrder { .. })),
                "{price}"
            );
        }
    }
}
