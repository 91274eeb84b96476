use crate::figures::{bar_chart, histogram, line_chart, plot_div};
use crate::pages::RenderCtx;
use crate::stats::count_by_key;
use chrono::Datelike;

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let monthly = count_by_key(rows, |r| r.date.map(|d| d.format("%Y-%m").to_string()));
    let monthly_pairs: Vec<(String, f64)> = monthly
        .iter()
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();

    // Weekday keys are prefixed with the ISO number so BTreeMap ordering
    // yields Monday..Sunday, then the prefix is stripped for display.
    let weekday = count_by_key(rows, |r| {
        r.date.map(|d| {
            format!(
                "{} {}",
                d.weekday().number_from_monday(),
                d.format("%A")
            )
        })
    });
    let weekday_pairs: Vec<(String, f64)> = weekday
        .iter()
        .map(|(k, v)| {
            let name = k.split_once(' ').map(|(_, n)| n).unwrap_or(k.as_str());
            (name.to_string(), *v as f64)
        })
        .collect();

    let hours: Vec<f64> = rows.iter().filter_map(|r| r.hour.map(|h| h as f64)).collect();

    format!(
        "<section data-page=\"time-trend\">\n<h1>Time Trend Analysis</h1>\n{}\n{}\n{}\n</section>",
        plot_div(
            "fig-monthly-trend",
            &line_chart(&monthly_pairs, "Violations per Month", "Count")
        ),
        plot_div(
            "fig-weekday",
            &bar_chart(&weekday_pairs, "Violations by Day of Week", "Count")
        ),
        plot_div(
            "fig-hourly",
            &histogram(&hours, "Violations by Hour of Day", "Hour")
        ),
    )
}
