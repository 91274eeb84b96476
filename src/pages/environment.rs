use crate::figures::{bar_chart, pie_chart, plot_div};
use crate::pages::RenderCtx;
use crate::stats::{count_by, mean_by};

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let weather_pairs: Vec<(String, f64)> = count_by(rows, |r| r.weather.as_str())
        .into_iter()
        .map(|(k, v)| (k, v as f64))
        .collect();

    let road_pairs: Vec<(String, f64)> = count_by(rows, |r| r.road_condition.as_str())
        .into_iter()
        .map(|(k, v)| (k, v as f64))
        .collect();

    let fine_by_weather = mean_by(rows, |r| r.weather.as_str(), |r| r.fine_amount);

    format!(
        "<section data-page=\"environment\">\n<h1>Environment Analysis</h1>\n{}\n{}\n{}\n</section>",
        plot_div(
            "fig-weather",
            &pie_chart(&weather_pairs, "Violations by Weather Condition")
        ),
        plot_div(
            "fig-road",
            &bar_chart(&road_pairs, "Violations by Road Condition", "Count")
        ),
        plot_div(
            "fig-fine-weather",
            &bar_chart(&fine_by_weather, "Average Fine by Weather", "Mean Fine")
        ),
    )
}
