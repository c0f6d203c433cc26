use kline_gen::prelude::*;

fn main() -> Result<()> {
    let series = KlineGenerator::seeded(GeneratorConfig::default(), 7).generate(390);

    for period in [Period::FiveMinutes, Period::ThirtyMinutes, Period::OneHour] {
        let bars = period.resample(&series)?;
        println!("=== {period}: {} bars ===", bars.len());
        print(&bars)?;
    }

    Ok(())
}
