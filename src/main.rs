use kline_gen::app::run;
use kline_gen::config::Config;
use kline_gen::logging::init_logging;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_args(std::env::args().skip(1))?;
    if config.help {
        print!("{}", Config::help());
        return Ok(());
    }

    run(&config)?;
    println!("K-line data saved to {}", config.output.display());

    Ok(())
}
