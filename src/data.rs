use crate::config::AppConfig;
use crate::types::{RawRow, ViolationRecord, ViolationTable};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;

/// Diagnostics from one CSV load, surfaced by `inspect` and logged by `serve`.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

/// Read the configured dataset into memory. Called exactly once at startup;
/// the resulting table is immutable for the process lifetime.
///
/// A missing or structurally malformed file is fatal. Individual rows that
/// fail to deserialize are skipped and counted in the report; within a row,
/// unparseable numeric/date cells simply become `None`.
pub fn load_table(config: &AppConfig) -> Result<(ViolationTable, LoadReport)> {
    let file = File::open(&config.input.data_csv)
        .with_context(|| format!("Failed to open data CSV: {:?}", config.input.data_csv))?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);

    let columns: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        rows.push(clean_row(raw));
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: rows.len(),
        parse_errors,
    };

    Ok((ViolationTable { columns, rows }, report))
}

fn clean_row(raw: RawRow) -> ViolationRecord {
    ViolationRecord {
        location: clean_category(raw.location, "Unknown"),
        date: parse_date_safe(raw.date.as_deref()),
        hour: parse_hour_safe(raw.time.as_deref()),
        violation_type: clean_category(raw.violation_type, "Unspecified"),
        fine_amount: parse_f64_safe(raw.fine_amount.as_deref()),
        vehicle_type: clean_category(raw.vehicle_type, "Unknown"),
        driver_age: parse_u32_safe(raw.driver_age.as_deref()),
        driver_gender: clean_category(raw.driver_gender, "Unknown"),
        penalty_points: parse_f64_safe(raw.penalty_points.as_deref()),
        weather: clean_category(raw.weather_condition, "Unknown"),
        road_condition: clean_category(raw.road_condition, "Unknown"),
        payment_method: clean_category(raw.payment_method, "Unknown"),
        fine_paid: parse_bool_safe(raw.fine_paid.as_deref()),
    }
}

fn clean_category(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback.to_string(),
    }
}

/// Forgiving float parse: trims, strips thousands separators, rejects text.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Ages sometimes arrive as "34.0"; accept the float form too.
    s.parse::<u32>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as u32))
}

/// Dates are expected as `YYYY-MM-DD`; anything else becomes `None`, the
/// equivalent of a coerced NaT in the source data.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Extract the hour from a `HH:MM` or `HH:MM:SS` time string.
pub fn parse_hour_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    let hour_part = s.split(':').next()?;
    match hour_part.parse::<u32>() {
        Ok(h) if h < 24 => Some(h),
        _ => None,
    }
}

fn parse_bool_safe(s: Option<&str>) -> Option<bool> {
    match s?.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "y" | "1" => Some(true),
        "no" | "false" | "n" | "0" => Some(false),
        _ => None,
    }
}
