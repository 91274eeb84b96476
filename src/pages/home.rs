use crate::layout::{card, data_table, metrics_row};
use crate::pages::RenderCtx;
use crate::util::{format_int, format_number};
use std::collections::BTreeSet;

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;
    let total_fines: f64 = rows.iter().filter_map(|r| r.fine_amount).sum();
    let locations: BTreeSet<&str> = rows.iter().map(|r| r.location.as_str()).collect();
    let dates: Vec<_> = rows.iter().filter_map(|r| r.date).collect();
    let coverage = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => format!("{} to {}", min, max),
        _ => "no dated records".to_string(),
    };

    let metrics = metrics_row(&[
        ("Total Violations", format_int(rows.len() as i64)),
        ("Total Fines", format!("₹{}", format_number(total_fines, 0))),
        ("Locations", format_int(locations.len() as i64)),
        ("Date Coverage", coverage),
    ]);

    let preview: Vec<Vec<String>> = rows
        .iter()
        .take(10)
        .map(|r| {
            vec![
                r.location.clone(),
                r.date.map(|d| d.to_string()).unwrap_or_default(),
                r.violation_type.clone(),
                r.fine_amount
                    .map(|f| format_number(f, 0))
                    .unwrap_or_default(),
                r.vehicle_type.clone(),
                r.payment_method.clone(),
            ]
        })
        .collect();

    format!(
        "<section data-page=\"home\">\n<h1>Traffic Violation Dashboard</h1>\n\
         <p>Explore recorded traffic violations across India: trends over time, \
         environmental context, vehicle classes, driver behaviour, payments and geography. \
         Pick a page from the sidebar to start.</p>\n{}\n{}\n</section>",
        metrics,
        card(
            "dataset-preview",
            "Dataset Preview",
            &data_table(
                &["Location", "Date", "Violation", "Fine", "Vehicle", "Payment"],
                &preview
            )
        )
    )
}
