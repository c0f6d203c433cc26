use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::engine::{BarBuilder, Series};
use crate::errors::Result;

/// Row layout of a saved bar, checked through [`BarBuilder`] on load.
#[derive(serde::Deserialize)]
struct JsonBar {
    timestamp: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// Saves `series` as a JSON array of bars.
pub fn save_json(series: &Series, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, series)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = series.len(), "kline data saved");
    Ok(())
}

/// Reads a JSON array of bars from `path`.
///
/// ### Returns
/// The series, or `InvalidPriceOrder` for a bar that is not a valid candlestick.
pub fn load_json(path: impl AsRef<Path>) -> Result<Series> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<JsonBar> = serde_json::from_reader(reader)?;

    rows.into_iter()
        .map(|row| {
            BarBuilder::builder()
                .timestamp(row.timestamp)
                .open(row.open)
                .high(row.high)
                .low(row.low)
                .close(row.close)
                .build()
        })
        .collect()
}

#[cfg(test)]
fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("kline-gen-{}-{name}", std::process::id()))
}

#[cfg(test)]
#[test]
fn json_round_trip() {
    use crate::engine::{GeneratorConfig, KlineGenerator};

    let path = temp_path("series.json");
    let series = KlineGenerator::seeded(GeneratorConfig::default(), 5).generate(100);

    save_json(&series, &path).unwrap();
    assert_eq!(load_json(&path).unwrap(), series);

    std::fs::remove_file(path).unwrap();
}

#[cfg(test)]
#[test]
fn json_rejects_broken_candle() {
    use crate::errors::Error;

    let path = temp_path("broken.json");
    std::fs::write(
        &path,
        r#"[{"timestamp":"2024-03-08T09:30:00","open":100.0,"high":99.0,"low":98.0,"close":100.0}]"#,
    )
    .unwrap();

    let result = load_json(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(Error::InvalidPriceOrder { high, .. }) if high == 99.0));
}

#[cfg(test)]
#[test]
fn json_missing_field() {
    use crate::errors::Error;

    let path = temp_path("short.json");
    std::fs::write(&path, r#"[{"timestamp":"2024-03-08T09:30:00","open":100.0}]"#).unwrap();

    let result = load_json(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(Error::JsonError(_))));
}
