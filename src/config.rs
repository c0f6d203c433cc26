use std::path::PathBuf;
use std::str::FromStr;

use crate::engine::{DEFAULT_BASE_PRICE, DEFAULT_VOLATILITY, GeneratorConfig, Period};
use crate::errors::{Error, Result};
use crate::storage::{ColumnLabels, DEFAULT_OUTPUT};

/// Number of bars generated when `--count` is not given.
pub const DEFAULT_COUNT: usize = 10_000;

/// Options of the `kline-gen` command line.
///
/// Running without arguments generates 10 000 bars from 100.00 with a 2% volatility
/// and writes them to `kline_data.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of bars to generate.
    pub count: usize,
    /// Open price of the first bar.
    pub base_price: f64,
    /// Per-bar return bound.
    pub volatility: f64,
    /// Fixed seed for a reproducible series.
    pub seed: Option<u64>,
    /// CSV destination.
    pub output: PathBuf,
    /// Period to resample the minute bars into before output.
    pub period: Option<Period>,
    /// Header labels.
    pub labels: ColumnLabels,
    /// Also print the table to stdout.
    pub print: bool,
    /// Chart destination, `.svg` or `.png`.
    #[cfg(feature = "draws")]
    pub chart: Option<PathBuf>,
    /// JSON destination.
    #[cfg(feature = "serde")]
    pub json: Option<PathBuf>,
    /// Show usage and exit.
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            base_price: DEFAULT_BASE_PRICE,
            volatility: DEFAULT_VOLATILITY,
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            period: None,
            labels: ColumnLabels::default(),
            print: false,
            #[cfg(feature = "draws")]
            chart: None,
            #[cfg(feature = "serde")]
            json: None,
            help: false,
        }
    }
}

impl Config {
    /// Parses command-line arguments, program name excluded.
    ///
    /// Both `--flag value` and `--flag=value` are accepted.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String> {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| Error::InvalidArgument(format!("{name} expects a value")))
            };

            match flag.as_str() {
                "-n" | "--count" => config.count = parse_count(&value("--count")?)?,
                "--base-price" => config.base_price = parse_number("--base-price", &value("--base-price")?)?,
                "--volatility" => config.volatility = parse_number("--volatility", &value("--volatility")?)?,
                "--seed" => config.seed = Some(parse_number("--seed", &value("--seed")?)?),
                "-o" | "--output" => config.output = PathBuf::from(value("--output")?),
                "--period" => config.period = Some(value("--period")?.parse()?),
                "--labels" => config.labels = value("--labels")?.parse()?,
                "--print" => config.print = true,
                #[cfg(feature = "draws")]
                "--chart" => config.chart = Some(PathBuf::from(value("--chart")?)),
                #[cfg(feature = "serde")]
                "--json" => config.json = Some(PathBuf::from(value("--json")?)),
                "-h" | "--help" => config.help = true,
                other => return Err(Error::InvalidArgument(format!("unknown option: {other}"))),
            }
        }

        Ok(config)
    }

    /// Validates the walk parameters into a generator configuration.
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        GeneratorConfig::new(self.base_price, self.volatility)
    }

    /// Usage text.
    pub fn help() -> String {
        let mut text = String::from(
            "usage: kline-gen [OPTIONS]\n\
             \n\
             Generate synthetic one-minute kline bars and save them as CSV.\n\
             \n\
             options:\n  \
             -n, --count <N>          number of bars (default 10000, negative means none)\n  \
             --base-price <P>         first open price (default 100)\n  \
             --volatility <V>         per-bar return bound in [0, 1) (default 0.02)\n  \
             --seed <SEED>            fixed seed for a reproducible series\n  \
             -o, --output <PATH>      CSV output (default kline_data.csv)\n  \
             --period <P>             resample into 1m|5m|15m|30m|1h|4h|1d\n  \
             --labels <en|zh>         header language (default en)\n  \
             --print                  also print the table to stdout\n",
        );
        if cfg!(feature = "draws") {
            text.push_str("  --chart <PATH>           draw a candlestick chart (.svg or .png)\n");
        }
        if cfg!(feature = "serde") {
            text.push_str("  --json <PATH>            also save the series as JSON\n");
        }
        text.push_str("  -h, --help               show this help\n");
        text
    }
}

/// Bar counts at or below zero produce an empty series.
fn parse_count(value: &str) -> Result<usize> {
    let count: i64 = parse_number("--count", value)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{name}: not a number: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.count, 10_000);
        assert_eq!(config.base_price, 100.0);
        assert_eq!(config.volatility, 0.02);
        assert_eq!(config.output, PathBuf::from("kline_data.csv"));
        assert!(config.seed.is_none());
        assert!(!config.print);
    }

    #[test]
    fn all_options() {
        let config = parse(&[
            "-n", "500", "--base-price", "42.5", "--volatility=0.05", "--seed", "7", "-o", "out.csv", "--period",
            "5m", "--labels", "zh", "--print",
        ])
        .unwrap();

        assert_eq!(config.count, 500);
        assert_eq!(config.base_price, 42.5);
        assert_eq!(config.volatility, 0.05);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.period, Some(Period::FiveMinutes));
        assert_eq!(config.labels, ColumnLabels::chinese());
        assert!(config.print);
    }

    #[test]
    fn negative_count_is_empty() {
        assert_eq!(parse(&["--count", "-3"]).unwrap().count, 0);
        assert_eq!(parse(&["--count=0"]).unwrap().count, 0);
    }

    #[test]
    fn bad_values() {
        assert!(matches!(parse(&["--count", "many"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse(&["--seed", "-1"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse(&["--period", "2w"]), Err(Error::UnknownPeriod(_))));
        assert!(matches!(parse(&["--output"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse(&["--verbose"]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn generator_config_is_validated() {
        assert!(parse(&[]).unwrap().generator_config().is_ok());
        let config = parse(&["--volatility", "2"]).unwrap();
        assert!(matches!(config.generator_config(), Err(Error::InvalidArgument(_))));
        let config = parse(&["--base-price", "-5"]).unwrap();
        assert!(matches!(config.generator_config(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn help() {
        assert!(parse(&["--help"]).unwrap().help);
        assert!(Config::help().starts_with("usage: kline-gen"));
    }
}
