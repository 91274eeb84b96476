//! The map page: choropleths over the boundary snapshot plus the eight
//! drill-down sections with their nav cards.

use crate::figures::{
    add_state_labels, bar_chart, create_choropleth_map, create_globe_choropleth, histogram,
    plot_div, MapOptions,
};
use crate::layout::{data_table, metrics_row};
use crate::pages::RenderCtx;
use crate::stats::{aggregate_by_location, count_by, count_by_key};
use crate::types::{Aggregation, Metric};
use crate::util::{escape_html, format_int, format_number};
use std::fmt::Write;

const SECTIONS: [(&str, &str); 8] = [
    ("🚦", "Violation Type Intelligence"),
    ("🚗", "Vehicle Class Hotspots"),
    ("👤", "Driver Demographics Map"),
    ("☁️", "Weather-Violation Nexus"),
    ("🗺️", "State-Level Risk Matrix"),
    ("🛣️", "Infrastructure Danger Zones"),
    ("⏰", "Peak Hour Violation Peaks"),
    ("💰", "Fine Severity Distribution"),
];

/// Colorbar label for the selected aggregation over the fine metric.
fn color_label(agg: Aggregation) -> String {
    let metric = Metric::FineAmount;
    match agg {
        Aggregation::Count => "Violations".to_string(),
        Aggregation::Sum => format!("Total {}", metric.label()),
        Aggregation::Mean => format!("Mean {}", metric.label()),
        Aggregation::Max => format!("Max {}", metric.label()),
    }
}

pub fn render(ctx: &RenderCtx<'_>) -> String {
    let rows = &ctx.table.rows;

    // Headline metrics always describe raw counts, whatever colors the map.
    let mut counts = aggregate_by_location(rows, Metric::FineAmount, Aggregation::Count);
    counts.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    let hottest = counts
        .first()
        .map(|s| s.location.clone())
        .unwrap_or_else(|| "—".to_string());
    let metrics = metrics_row(&[
        ("Total Violations", format_int(rows.len() as i64)),
        ("Hottest State", hottest),
        ("Active States", format_int(counts.len() as i64)),
    ]);

    let agg = ctx.map_aggregation;
    let label = color_label(agg);
    let mut by_state = aggregate_by_location(rows, Metric::FineAmount, agg);
    by_state.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = String::new();
    let _ = write!(
        out,
        "<section data-page=\"map\">\n<h1>Map Visualisation</h1>\n{}\n{}\n{}\n",
        metrics,
        agg_switcher(agg),
        date_filter_form(ctx),
    );

    // India choropleth, degraded with a warning when the local file is gone.
    match &ctx.geo.india {
        Some(india) => {
            let mut fig = create_choropleth_map(
                &by_state,
                india,
                &format!("{} by State", label),
                &MapOptions::india(label.clone()),
            );
            add_state_labels(&mut fig, &by_state, 0.0, 0.0);
            out.push_str(&plot_div("fig-india-map", &fig));
        }
        None => {
            out.push_str(
                "<div class=\"warning-note\">India state boundaries unavailable \
                 (india_states.geojson not found). Download it from \
                 https://github.com/udit-001/india-maps-data to enable the state map.</div>\n",
            );
        }
    }

    // Globe choropleth over the fetched world boundaries.
    match &ctx.geo.world {
        Some(world) => {
            let fig = create_globe_choropleth(
                &by_state,
                world,
                "Global View",
                &MapOptions::world(label.clone()),
            );
            out.push_str(&plot_div("fig-globe-map", &fig));
        }
        None => {
            let reason = ctx
                .geo
                .world_error
                .as_deref()
                .unwrap_or("world boundaries not loaded");
            let _ = write!(
                out,
                "<div class=\"error-note\">Globe view unavailable: {}</div>\n",
                escape_html(reason)
            );
        }
    }

    out.push_str("<hr>\n<h2>Filter by Section (click a card to jump)</h2>\n");
    out.push_str(&nav_cards());

    for (i, section) in section_bodies(ctx).into_iter().enumerate() {
        let (_, title) = SECTIONS[i];
        let _ = write!(
            out,
            "<details class=\"section\" id=\"exp{n}\"><summary>{n}. {title}</summary>\n{body}</details>\n",
            n = i + 1,
            title = escape_html(title),
            body = section,
        );
    }

    out.push_str("</section>");
    out
}

/// Inclusive date-range filter over the records feeding this page. Submits
/// back to the map page; the server applies the filter before rendering.
fn date_filter_form(ctx: &RenderCtx<'_>) -> String {
    let (from, to) = match ctx.date_range {
        Some((start, end)) => (start.to_string(), end.to_string()),
        None => (String::new(), String::new()),
    };
    let note = match ctx.date_range {
        Some((start, end)) => format!(
            "<p>Showing violations from {} to {} (inclusive).</p>",
            start, end
        ),
        None => String::new(),
    };
    format!(
        "<form method=\"get\" action=\"/page/map\" class=\"card-container\">\
         <label>From <input type=\"date\" name=\"from\" value=\"{}\"></label> \
         <label>To <input type=\"date\" name=\"to\" value=\"{}\"></label> \
         <button type=\"submit\">Apply</button> <a href=\"/page/map\">Reset</a>{}</form>\n",
        from, to, note
    )
}

/// Links switching the map coloring between the four aggregation modes.
fn agg_switcher(current: Aggregation) -> String {
    let modes = [
        (Aggregation::Count, "count", "Violation Count"),
        (Aggregation::Sum, "sum", "Total Fines"),
        (Aggregation::Mean, "mean", "Mean Fine"),
        (Aggregation::Max, "max", "Max Fine"),
    ];
    let mut out = String::from("<div class=\"nav-cards\">");
    for (mode, slug, title) in modes {
        let marker = if mode == current { " ▸ " } else { "" };
        let _ = write!(
            out,
            "<a href=\"/page/map?agg={}\">{}{}</a>",
            slug, marker, title
        );
    }
    out.push_str("</div>\n");
    out
}

fn nav_cards() -> String {
    let mut out = String::from("<div class=\"nav-cards\">");
    for (i, (icon, title)) in SECTIONS.iter().enumerate() {
        let _ = write!(
            out,
            "<a href=\"#exp{}\">{} {}</a>",
            i + 1,
            icon,
            escape_html(title)
        );
    }
    out.push_str("</div>\n");
    out
}

fn counts_section(
    fig_id: &str,
    chart_title: &str,
    counts: Vec<(String, usize)>,
    column: &str,
) -> String {
    let pairs: Vec<(String, f64)> = counts
        .iter()
        .take(10)
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();
    let table_rows: Vec<Vec<String>> = counts
        .iter()
        .take(10)
        .map(|(k, v)| vec![k.clone(), format_int(*v as i64)])
        .collect();
    format!(
        "{}\n{}",
        plot_div(fig_id, &bar_chart(&pairs, chart_title, "Count")),
        data_table(&[column, "Violations"], &table_rows)
    )
}

fn section_bodies(ctx: &RenderCtx<'_>) -> Vec<String> {
    let rows = &ctx.table.rows;

    let risk = {
        let mut stats = aggregate_by_location(rows, Metric::PenaltyPoints, Aggregation::Mean);
        stats.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
        let pairs: Vec<(String, f64)> = stats
            .iter()
            .take(10)
            .map(|s| (s.location.clone(), s.value))
            .collect();
        let table_rows: Vec<Vec<String>> = stats
            .iter()
            .take(10)
            .map(|s| vec![s.location.clone(), format_number(s.value, 2)])
            .collect();
        format!(
            "{}\n{}",
            plot_div(
                "fig-state-risk",
                &bar_chart(&pairs, "Mean Penalty Points by State", "Mean Points")
            ),
            data_table(&["State", "Mean Penalty Points"], &table_rows)
        )
    };

    let peak_hours = {
        let hour_counts = count_by_key(rows, |r| r.hour.map(|h| format!("{:02}:00", h)));
        let pairs: Vec<(String, f64)> = hour_counts
            .iter()
            .map(|(k, v)| (k.clone(), *v as f64))
            .collect();
        let table_rows: Vec<Vec<String>> = hour_counts
            .iter()
            .map(|(k, v)| vec![k.clone(), format_int(*v as i64)])
            .collect();
        format!(
            "{}\n{}",
            plot_div(
                "fig-peak-hours",
                &bar_chart(&pairs, "Violations by Hour", "Count")
            ),
            data_table(&["Hour", "Violations"], &table_rows)
        )
    };

    let fine_severity = {
        let fines: Vec<f64> = rows.iter().filter_map(|r| r.fine_amount).collect();
        let total: f64 = fines.iter().sum();
        let mean = crate::stats::mean(fines.iter().copied());
        format!(
            "{}\n{}",
            plot_div(
                "fig-fine-severity",
                &histogram(&fines, "Fine Amount Distribution", "Fine Amount")
            ),
            data_table(
                &["Statistic", "Value"],
                &[
                    vec!["Total fines".to_string(), format_number(total, 0)],
                    vec!["Mean fine".to_string(), format_number(mean, 2)],
                    vec!["Fined violations".to_string(), format_int(fines.len() as i64)],
                ]
            )
        )
    };

    vec![
        counts_section(
            "fig-sec-types",
            "Top Violation Types",
            count_by(rows, |r| r.violation_type.as_str()),
            "Violation Type",
        ),
        counts_section(
            "fig-sec-vehicles",
            "Violations by Vehicle Class",
            count_by(rows, |r| r.vehicle_type.as_str()),
            "Vehicle Type",
        ),
        counts_section(
            "fig-sec-gender",
            "Violations by Driver Gender",
            count_by(rows, |r| r.driver_gender.as_str()),
            "Gender",
        ),
        counts_section(
            "fig-sec-weather",
            "Violations by Weather",
            count_by(rows, |r| r.weather.as_str()),
            "Weather",
        ),
        risk,
        counts_section(
            "fig-sec-road",
            "Violations by Road Condition",
            count_by(rows, |r| r.road_condition.as_str()),
            "Road Condition",
        ),
        peak_hours,
        fine_severity,
    ]
}
