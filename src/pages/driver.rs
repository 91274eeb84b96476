use crate::figures::{bar_chart, histogram, pie_chart, plot_div};
use crate::pages::RenderCtx;
use crate::stats::{count_by, mean_by};
use crate::types::ViolationRecord;

fn age_band(record: &ViolationRecord) -> &str {
    match record.driver_age {
        Some(a) if a < 25 => "18-24",
        Some(a) if a < 35 => "25-34",
        Some(a) if a < 45 => "35-44",
        Some(a) if a < 60 => "45-59",
        Some(_) => "60+",
        None => "Unknown",
    }
}

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let ages: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.driver_age.map(|a| a as f64))
        .collect();

    let gender_pairs: Vec<(String, f64)> = count_by(rows, |r| r.driver_gender.as_str())
        .into_iter()
        .map(|(k, v)| (k, v as f64))
        .collect();

    let points_by_band = mean_by(rows, age_band, |r| r.penalty_points);

    format!(
        "<section data-page=\"driver-behaviour\">\n<h1>Driver Behaviour Analysis</h1>\n{}\n{}\n{}\n</section>",
        plot_div(
            "fig-driver-age",
            &histogram(&ages, "Driver Age Distribution", "Age")
        ),
        plot_div(
            "fig-driver-gender",
            &pie_chart(&gender_pairs, "Violations by Driver Gender")
        ),
        plot_div(
            "fig-driver-points",
            &bar_chart(
                &points_by_band,
                "Average Penalty Points by Age Band",
                "Mean Points"
            )
        ),
    )
}
