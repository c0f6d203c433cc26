use kline_gen::prelude::*;

fn main() -> Result<()> {
    let config = GeneratorConfig::new(100.0, 0.01)?;
    let series = KlineGenerator::seeded(config, 2024).generate(240);

    let options = DrawOptions::default()
        .title("4 hours of synthetic minute bars")
        .draw_output(DrawOutput::from_path("kline_chart.svg"));
    Draw::with_series(&series).with_options(options).plot()?;

    let quarter_hours = Period::FifteenMinutes.resample(&series)?;
    let options = DrawOptions::default()
        .title("Same walk, 15m bars")
        .draw_output(DrawOutput::from_path("kline_chart_15m.png"));
    Draw::with_series(&quarter_hours).with_options(options).plot()
}
