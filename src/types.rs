use chrono::NaiveDate;
use serde::Deserialize;

/// One CSV row exactly as it appears in the dataset. Every field is optional
/// text; cleaning into typed values happens in `data::load_table`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Time")]
    pub time: Option<String>,
    #[serde(rename = "Violation_Type")]
    pub violation_type: Option<String>,
    #[serde(rename = "Fine_Amount")]
    pub fine_amount: Option<String>,
    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "Driver_Age")]
    pub driver_age: Option<String>,
    #[serde(rename = "Driver_Gender")]
    pub driver_gender: Option<String>,
    #[serde(rename = "Penalty_Points")]
    pub penalty_points: Option<String>,
    #[serde(rename = "Weather_Condition")]
    pub weather_condition: Option<String>,
    #[serde(rename = "Road_Condition")]
    pub road_condition: Option<String>,
    #[serde(rename = "Payment_Method")]
    pub payment_method: Option<String>,
    #[serde(rename = "Fine_Paid")]
    pub fine_paid: Option<String>,
}

/// A cleaned violation record. Categorical fields default to "Unknown" rather
/// than carrying `Option`; numeric and date fields stay optional because the
/// source data genuinely has holes in them.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRecord {
    pub location: String,
    pub date: Option<NaiveDate>,
    pub hour: Option<u32>,
    pub violation_type: String,
    pub fine_amount: Option<f64>,
    pub vehicle_type: String,
    pub driver_age: Option<u32>,
    pub driver_gender: String,
    pub penalty_points: Option<f64>,
    pub weather: String,
    pub road_condition: String,
    pub payment_method: String,
    pub fine_paid: Option<bool>,
}

/// The loaded dataset: cleaned rows plus the header names that were actually
/// present in the CSV. The header set lets filters distinguish "column absent
/// from the file" from "value missing in a row".
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationTable {
    pub columns: Vec<String>,
    pub rows: Vec<ViolationRecord>,
}

impl ViolationTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// One location plus an aggregated metric value, the row shape every map
/// figure consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationStat {
    pub location: String,
    pub value: f64,
}

/// Numeric column an aggregation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    FineAmount,
    PenaltyPoints,
}

impl Metric {
    pub fn value(&self, record: &ViolationRecord) -> Option<f64> {
        match self {
            Metric::FineAmount => record.fine_amount,
            Metric::PenaltyPoints => record.penalty_points,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::FineAmount => "Fine Amount",
            Metric::PenaltyPoints => "Penalty Points",
        }
    }
}

/// Aggregation modes supported by `stats::aggregate_by_location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Count,
    Max,
}

impl Aggregation {
    /// Parse a mode name. Anything unrecognized falls back to `Sum`, matching
    /// the historical behavior, but logs a warning so typos are visible.
    pub fn parse(s: &str) -> Aggregation {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Aggregation::Sum,
            "mean" => Aggregation::Mean,
            "count" => Aggregation::Count,
            "max" => Aggregation::Max,
            other => {
                tracing::warn!(mode = other, "unknown aggregation mode, falling back to sum");
                Aggregation::Sum
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_parse_known_modes() {
        assert_eq!(Aggregation::parse("sum"), Aggregation::Sum);
        assert_eq!(Aggregation::parse("Mean"), Aggregation::Mean);
        assert_eq!(Aggregation::parse("COUNT"), Aggregation::Count);
        assert_eq!(Aggregation::parse("max"), Aggregation::Max);
    }

    #[test]
    fn aggregation_parse_unknown_falls_back_to_sum() {
        assert_eq!(Aggregation::parse("median"), Aggregation::Sum);
        assert_eq!(Aggregation::parse(""), Aggregation::Sum);
    }

    #[test]
    fn has_column_checks_loaded_headers() {
        let table = ViolationTable {
            columns: vec!["Location".to_string(), "Fine_Amount".to_string()],
            rows: Vec::new(),
        };
        assert!(table.has_column("Location"));
        assert!(!table.has_column("Date"));
    }
}
