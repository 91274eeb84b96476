use crate::layout::{data_table, metrics_row};
use crate::pages::RenderCtx;
use crate::stats::{aggregate_by_location, count_by};
use crate::types::{Aggregation, Metric};
use crate::util::{format_int, format_number};

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let mut by_location = aggregate_by_location(rows, Metric::FineAmount, Aggregation::Count);
    by_location.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    let fine_totals = aggregate_by_location(rows, Metric::FineAmount, Aggregation::Sum);

    let location_rows: Vec<Vec<String>> = by_location
        .iter()
        .take(15)
        .map(|s| {
            let fines = fine_totals
                .iter()
                .find(|f| f.location == s.location)
                .map(|f| f.value)
                .unwrap_or(0.0);
            vec![
                s.location.clone(),
                format_int(s.value as i64),
                format_number(fines, 0),
            ]
        })
        .collect();

    let type_rows: Vec<Vec<String>> = count_by(rows, |r| r.violation_type.as_str())
        .into_iter()
        .take(15)
        .map(|(k, v)| vec![k, format_int(v as i64)])
        .collect();

    let total_fines: f64 = rows.iter().filter_map(|r| r.fine_amount).sum();
    let metrics = metrics_row(&[
        ("Records", format_int(rows.len() as i64)),
        ("Total Fines", format!("₹{}", format_number(total_fines, 0))),
        ("Locations Covered", format_int(by_location.len() as i64)),
    ]);

    format!(
        "<section data-page=\"report\">\n<h1>Report</h1>\n{}\n\
         <h2>Violations by Location</h2>\n{}\n\
         <p><a href=\"/report/locations.csv\">Download the full location summary (CSV)</a></p>\n\
         <h2>Violations by Type</h2>\n{}\n</section>",
        metrics,
        data_table(&["Location", "Violations", "Total Fines"], &location_rows),
        data_table(&["Violation Type", "Count"], &type_rows),
    )
}
