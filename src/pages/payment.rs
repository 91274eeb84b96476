use crate::figures::{bar_chart, pie_chart, plot_div};
use crate::layout::metrics_row;
use crate::pages::RenderCtx;
use crate::stats::count_by;
use crate::util::format_number;

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    let method_pairs: Vec<(String, f64)> = count_by(rows, |r| r.payment_method.as_str())
        .into_iter()
        .map(|(k, v)| (k, v as f64))
        .collect();

    let paid = rows.iter().filter(|r| r.fine_paid == Some(true)).count();
    let unpaid = rows.iter().filter(|r| r.fine_paid == Some(false)).count();
    let unresolved = rows.len() - paid - unpaid;
    let status_pairs = vec![
        ("Paid".to_string(), paid as f64),
        ("Unpaid".to_string(), unpaid as f64),
        ("Unrecorded".to_string(), unresolved as f64),
    ];

    let collected: f64 = rows
        .iter()
        .filter(|r| r.fine_paid == Some(true))
        .filter_map(|r| r.fine_amount)
        .sum();
    let outstanding: f64 = rows
        .iter()
        .filter(|r| r.fine_paid == Some(false))
        .filter_map(|r| r.fine_amount)
        .sum();

    let metrics = metrics_row(&[
        ("Collected", format!("₹{}", format_number(collected, 0))),
        ("Outstanding", format!("₹{}", format_number(outstanding, 0))),
    ]);

    format!(
        "<section data-page=\"payment\">\n<h1>Payment Analysis</h1>\n{}\n{}\n{}\n</section>",
        metrics,
        plot_div(
            "fig-payment-method",
            &pie_chart(&method_pairs, "Payment Methods")
        ),
        plot_div(
            "fig-payment-status",
            &bar_chart(&status_pairs, "Fine Payment Status", "Count")
        ),
    )
}
