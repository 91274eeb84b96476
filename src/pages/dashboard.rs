use crate::figures::{bar_chart, line_chart, plot_div};
use crate::layout::metrics_row;
use crate::pages::RenderCtx;
use crate::stats::{aggregate_by_location, count_by, count_by_key};
use crate::types::{Aggregation, Metric};
use crate::util::{format_int, format_number};

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let by_type = count_by(rows, |r| r.violation_type.as_str());
    let type_pairs: Vec<(String, f64)> = by_type
        .iter()
        .take(12)
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();

    let mut fine_by_location =
        aggregate_by_location(rows, Metric::FineAmount, Aggregation::Sum);
    fine_by_location.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    let location_pairs: Vec<(String, f64)> = fine_by_location
        .iter()
        .take(12)
        .map(|s| (s.location.clone(), s.value))
        .collect();

    let monthly = count_by_key(rows, |r| r.date.map(|d| d.format("%Y-%m").to_string()));
    let monthly_pairs: Vec<(String, f64)> = monthly
        .iter()
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();

    let total_fines: f64 = rows.iter().filter_map(|r| r.fine_amount).sum();
    let top_type = by_type
        .first()
        .map(|(k, _)| k.clone())
        .unwrap_or_else(|| "—".to_string());

    let metrics = metrics_row(&[
        ("Violations", format_int(rows.len() as i64)),
        ("Fines Issued", format!("₹{}", format_number(total_fines, 0))),
        ("Most Common", top_type),
    ]);

    format!(
        "<section data-page=\"dashboard\">\n<h1>Dashboard</h1>\n{}\n{}\n{}\n{}\n</section>",
        metrics,
        plot_div(
            "fig-violation-types",
            &bar_chart(&type_pairs, "Violations by Type", "Count")
        ),
        plot_div(
            "fig-fines-by-location",
            &bar_chart(&location_pairs, "Total Fines by Location", "Fine Amount")
        ),
        plot_div(
            "fig-monthly-violations",
            &line_chart(&monthly_pairs, "Monthly Violations", "Count")
        ),
    )
}
