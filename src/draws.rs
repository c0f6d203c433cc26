//! Module for visualizing kline series as candlestick charts.

use std::path::{Path, PathBuf};

use crate::engine::{Bar, Series};
use crate::errors::{Error, Result};

use chrono::{DateTime, Duration, Utc};
use plotters::backend::{BitMapBackend, DrawingBackend, SVGBackend};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::WHITE;

/// Aspect ratio for the generated charts.
const ASPECT_RATIO: f64 = 0.5625;
/// Size of the X-axis labels.
const X_LABEL_SIZE: i32 = 20;
/// Size of the Y-axis labels.
const Y_LABEL_SIZE: i32 = 20;
/// Bars beyond this width stop widening the picture.
const MAX_WIDTH: u32 = 4096;

/// Output formats for the generated charts with output filename.
#[derive(Debug, Clone)]
pub enum DrawOutput {
    /// Save to the output SVG file.
    Svg(PathBuf),
    /// Save to the output PNG file.
    Png(PathBuf),
}

impl DrawOutput {
    /// Picks the backend from the file extension: `.png` renders a bitmap, anything else SVG.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            Self::Png(path.to_path_buf())
        } else {
            Self::Svg(path.to_path_buf())
        }
    }
}

impl Default for DrawOutput {
    fn default() -> Self {
        Self::Svg(PathBuf::from("kline_chart.svg"))
    }
}

/// Configuration options for chart generation.
#[derive(Debug, Default)]
pub struct DrawOptions {
    /// Chart title.
    title: Option<String>,
    /// Output format and path.
    output: DrawOutput,
}

impl DrawOptions {
    /// Sets the chart title.
    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Sets the output format and path.
    pub fn draw_output(mut self, output: DrawOutput) -> Self {
        self.output = output;
        self
    }
}

/// Chart drawing utility for kline series.
#[derive(Default)]
pub struct Draw<'d> {
    /// Reference to the series to draw.
    series: Option<&'d Series>,
    /// Drawing options.
    options: DrawOptions,
}

impl<'d> Draw<'d> {
    /// Creates a new `Draw` instance with the given series.
    pub fn with_series(series: &'d Series) -> Self {
        Self {
            series: Some(series),
            options: DrawOptions::default(),
        }
    }

    /// Sets the drawing options.
    pub fn with_options(mut self, options: DrawOptions) -> Self {
        self.options = options;
        self
    }

    /// Generates and saves the chart based on the configured options.
    pub fn plot(&self) -> Result<()> {
        let bars = self.series.ok_or(Error::BarDataEmpty)?;
        if bars.is_empty() {
            return Err(Error::BarDataEmpty);
        }

        let title = self.options.title.as_deref().unwrap_or("Kline Chart");
        let bar_count = u32::try_from(bars.len()).unwrap_or(u32::MAX);
        let width = 1280.max(bar_count.saturating_mul(10)).min(MAX_WIDTH);
        let height = ((width as f64 * ASPECT_RATIO) as u32).min(900);

        match &self.options.output {
            DrawOutput::Svg(path) => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                root.fill(&WHITE).map_err(|e| Error::Plotters(e.to_string()))?;
                self.draw_chart(&root, bars, title)?;
                tracing::info!(path = %path.display(), bars = bars.len(), "chart saved");
            }
            DrawOutput::Png(path) => {
                let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
                root.fill(&WHITE).map_err(|e| Error::Plotters(e.to_string()))?;
                self.draw_chart(&root, bars, title)?;
                tracing::info!(path = %path.display(), bars = bars.len(), "chart saved");
            }
        }
        Ok(())
    }

    /// Draws the price chart (candlesticks) and presents it.
    fn draw_chart<DB: DrawingBackend>(
        &self,
        drawing_area: &DrawingArea<DB, Shift>,
        bars: &[Bar],
        title: &str,
    ) -> Result<()> {
        let min_price = bars.iter().map(Bar::low).fold(f64::INFINITY, f64::min);
        let max_price = bars.iter().map(Bar::high).fold(f64::NEG_INFINITY, f64::max);
        let first_time = utc(bars.first().ok_or(Error::BarDataEmpty)?);
        let last_time = utc(bars.last().ok_or(Error::BarDataEmpty)?) + Duration::minutes(1);
        // a flat series still needs a visible price axis
        let price_padding = ((max_price - min_price) * 0.1).max(0.01);

        let area = drawing_area.margin(10, 10, 70, 70);
        let mut chart = ChartBuilder::on(&area)
            .caption(title, ("sans-serif", 30).into_font())
            .x_label_area_size(X_LABEL_SIZE)
            .y_label_area_size(Y_LABEL_SIZE)
            .right_y_label_area_size(Y_LABEL_SIZE)
            .build_cartesian_2d(
                first_time..last_time,
                min_price - price_padding..max_price + price_padding,
            )
            .map_err(|e| Error::Plotters(e.to_string()))?;

        chart
            .configure_mesh()
            .y_desc("Price")
            .y_label_style(("sans-serif", Y_LABEL_SIZE))
            .y_labels(5)
            .x_desc("Time")
            .x_label_style(("sans-serif", X_LABEL_SIZE))
            .x_labels((bars.len() / 15).max(2))
            .draw()
            .map_err(|e| Error::Plotters(e.to_string()))?;

        let bar_width = {
            let total_width = area.dim_in_pixel().0 as f64;
            let available_width = total_width - (X_LABEL_SIZE * 2) as f64;
            (available_width / bars.len() as f64).clamp(1.0, 15.0) as u32
        };

        chart
            .draw_series(bars.iter().map(|bar| {
                let color = if bar.is_bullish() { GREEN.filled() } else { RED.filled() };
                CandleStick::new(
                    utc(bar),
                    bar.open(),
                    bar.high(),
                    bar.low(),
                    bar.close(),
                    color,
                    color,
                    bar_width,
                )
            }))
            .map_err(|e| Error::Plotters(e.to_string()))?;

        drawing_area.present().map_err(|e| Error::Plotters(e.to_string()))
    }
}

/// Bar timestamps are wall-clock times; the chart treats them as UTC.
fn utc(bar: &Bar) -> DateTime<Utc> {
    bar.timestamp().and_utc()
}
