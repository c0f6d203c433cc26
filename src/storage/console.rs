use std::io::{self, Write};

use super::{ColumnLabels, format_price};
use crate::engine::Series;
use crate::errors::Result;
use crate::utils::format_timestamp;

/// Width of the rule printed under the header.
const RULE_WIDTH: usize = 60;

/// Writes `series` as a tab-separated table: header, rule, one line per bar.
pub fn write_table<W: Write>(series: &Series, labels: &ColumnLabels, mut writer: W) -> Result<()> {
    // the timestamp column is three tabs wide
    writeln!(
        writer,
        "{}\t\t\t{}\t{}\t{}\t{}",
        labels.time, labels.open, labels.high, labels.low, labels.close
    )?;
    writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

    for bar in series.iter() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            format_timestamp(&bar.timestamp()),
            format_price(bar.open()),
            format_price(bar.high()),
            format_price(bar.low()),
            format_price(bar.close()),
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Prints `series` to standard output with English labels.
pub fn print(series: &Series) -> Result<()> {
    print_with_labels(series, &ColumnLabels::default())
}

/// Prints `series` to standard output with the given labels.
pub fn print_with_labels(series: &Series, labels: &ColumnLabels) -> Result<()> {
    let stdout = io::stdout();
    write_table(series, labels, stdout.lock())
}
