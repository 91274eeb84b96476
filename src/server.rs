use crate::config::AppConfig;
use crate::geo::{GeoSnapshot, GeoStore};
use crate::layout;
use crate::pages::{Page, RenderCtx};
use crate::stats::{aggregate_by_location, filter_by_date};
use crate::theme;
use crate::types::{Aggregation, Metric, ViolationTable};
use anyhow::Result;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

pub struct AppState {
    pub config: AppConfig,
    pub table: ViolationTable,
    pub geo: GeoStore,
}

pub async fn start_server(config: AppConfig, table: ViolationTable) -> Result<()> {
    let geo = GeoStore::new(&config)?;
    let port = config.server.port;
    let state = Arc::new(AppState { config, table, geo });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, "starting dashboard server");

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/page/{slug}", get(page_handler))
        .route("/styles/main.css", get(styles_handler))
        .route("/report/locations.csv", get(report_csv_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index_handler() -> Redirect {
    Redirect::temporary("/page/home")
}

async fn page_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(page) = Page::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, "no such page").into_response();
    };

    // Only the map page pays for boundary data.
    let geo = if page == Page::MapVisualisation {
        state.geo.load(&state.config).await
    } else {
        GeoSnapshot::empty()
    };

    let map_aggregation = params
        .get("agg")
        .map(|s| Aggregation::parse(s))
        .unwrap_or(Aggregation::Count);

    let date_range = parse_date_range(&params);
    let filtered;
    let table = match date_range {
        Some((start, end)) => {
            filtered = filter_by_date(&state.table, start, end);
            &filtered
        }
        None => &state.table,
    };

    let ctx = RenderCtx {
        table,
        geo,
        map_aggregation,
        date_range,
    };
    let body = page.render(&ctx);
    Html(layout::page_shell(page, &body)).into_response()
}

/// An inclusive date range is only applied when both bounds parse.
fn parse_date_range(params: &HashMap<String, String>) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(params.get("from")?, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(params.get("to")?, "%Y-%m-%d").ok()?;
    Some((start, end))
}

async fn styles_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        theme::stylesheet(&state.config),
    )
        .into_response()
}

async fn report_csv_handler(State(state): State<Arc<AppState>>) -> Response {
    match location_summary_csv(&state.table) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"locations.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to build location summary CSV");
            (StatusCode::INTERNAL_SERVER_ERROR, "export failed").into_response()
        }
    }
}

#[derive(Serialize)]
struct LocationSummaryRow {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Violations")]
    violations: u64,
    #[serde(rename = "Total_Fines")]
    total_fines: f64,
}

/// The Report page's downloadable export: one row per location with its
/// violation count and fine total.
fn location_summary_csv(table: &ViolationTable) -> Result<Vec<u8>> {
    let counts = aggregate_by_location(&table.rows, Metric::FineAmount, Aggregation::Count);
    let sums = aggregate_by_location(&table.rows, Metric::FineAmount, Aggregation::Sum);

    let mut wtr = csv::Writer::from_writer(Vec::new());
    for (count, sum) in counts.iter().zip(sums.iter()) {
        wtr.serialize(LocationSummaryRow {
            location: count.location.clone(),
            violations: count.value as u64,
            total_fines: sum.value,
        })?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViolationRecord;
    use chrono::NaiveDate;

    fn table() -> ViolationTable {
        let mk = |location: &str, fine: f64| ViolationRecord {
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1),
            hour: None,
            violation_type: "Speeding".to_string(),
            fine_amount: Some(fine),
            vehicle_type: "Car".to_string(),
            driver_age: None,
            driver_gender: "Unknown".to_string(),
            penalty_points: None,
            weather: "Clear".to_string(),
            road_condition: "Dry".to_string(),
            payment_method: "Cash".to_string(),
            fine_paid: None,
        };
        ViolationTable {
            columns: vec!["Location".to_string(), "Fine_Amount".to_string()],
            rows: vec![mk("Delhi", 500.0), mk("Delhi", 250.0), mk("Punjab", 100.0)],
        }
    }

    #[test]
    fn date_range_needs_both_valid_bounds() {
        let mut params = HashMap::new();
        assert_eq!(parse_date_range(&params), None);

        params.insert("from".to_string(), "2023-01-01".to_string());
        assert_eq!(parse_date_range(&params), None);

        params.insert("to".to_string(), "2023-03-31".to_string());
        assert_eq!(
            parse_date_range(&params),
            Some((
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()
            ))
        );

        params.insert("to".to_string(), "31/03/2023".to_string());
        assert_eq!(parse_date_range(&params), None);
    }

    #[test]
    fn location_summary_csv_has_counts_and_totals() {
        let bytes = location_summary_csv(&table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Location,Violations,Total_Fines"));
        assert_eq!(lines.next(), Some("Delhi,2,750.0"));
        assert_eq!(lines.next(), Some("Punjab,1,100.0"));
    }
}
