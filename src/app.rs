use crate::config::Config;
use crate::engine::{Aggregation, KlineGenerator, Series};
use crate::errors::Result;
use crate::storage::{print_with_labels, save_with_labels};

#[cfg(feature = "draws")]
use crate::draws::{Draw, DrawOptions, DrawOutput};
#[cfg(feature = "serde")]
use crate::storage::save_json;

/// Runs one command-line invocation: generate, resample if asked, save, then the optional outputs.
///
/// ### Returns
/// The series that was written to `config.output`.
pub fn run(config: &Config) -> Result<Series> {
    let generator_config = config.generator_config()?;
    let series = match config.seed {
        Some(seed) => KlineGenerator::seeded(generator_config, seed).generate(config.count),
        None => KlineGenerator::new(generator_config).generate(config.count),
    };

    let series = match config.period {
        Some(period) => period.resample(&series)?,
        None => series,
    };

    save_with_labels(&series, &config.labels, &config.output)?;

    if config.print {
        print_with_labels(&series, &config.labels)?;
    }

    #[cfg(feature = "serde")]
    if let Some(path) = &config.json {
        save_json(&series, path)?;
    }

    #[cfg(feature = "draws")]
    if let Some(path) = &config.chart {
        let options = DrawOptions::default()
            .title(format!("{} bars", series.len()))
            .draw_output(DrawOutput::from_path(path));
        Draw::with_series(&series).with_options(options).plot()?;
    }

    Ok(series)
}
