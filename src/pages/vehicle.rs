use crate::figures::{bar_chart, pie_chart, plot_div};
use crate::pages::RenderCtx;
use crate::stats::{count_by, mean_by};

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let vehicle_pairs: Vec<(String, f64)> = count_by(rows, |r| r.vehicle_type.as_str())
        .into_iter()
        .map(|(k, v)| (k, v as f64))
        .collect();

    let fine_by_vehicle = mean_by(rows, |r| r.vehicle_type.as_str(), |r| r.fine_amount);
    let points_by_vehicle = mean_by(rows, |r| r.vehicle_type.as_str(), |r| r.penalty_points);

    format!(
        "<section data-page=\"vehicle\">\n<h1>Vehicle Analysis</h1>\n{}\n{}\n{}\n</section>",
        plot_div(
            "fig-vehicle-share",
            &pie_chart(&vehicle_pairs, "Violations by Vehicle Type")
        ),
        plot_div(
            "fig-vehicle-fines",
            &bar_chart(&fine_by_vehicle, "Average Fine by Vehicle Type", "Mean Fine")
        ),
        plot_div(
            "fig-vehicle-points",
            &bar_chart(
                &points_by_vehicle,
                "Average Penalty Points by Vehicle Type",
                "Mean Points"
            )
        ),
    )
}
