//! Group-by and filtering helpers shared by the page renderers and the map
//! utilities.

use crate::types::{Aggregation, LocationStat, Metric, ViolationRecord, ViolationTable};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Aggregate a metric per location. Rows whose metric cell is missing are
/// ignored for Sum/Mean/Max; Count counts every row for the location.
/// Results come back sorted by location name for deterministic output.
pub fn aggregate_by_location(
    rows: &[ViolationRecord],
    metric: Metric,
    aggregation: Aggregation,
) -> Vec<LocationStat> {
    let mut groups: BTreeMap<&str, (f64, f64, usize, usize)> = BTreeMap::new();
    // (sum, max, values-present, row-count) per location
    for record in rows {
        let entry = groups
            .entry(record.location.as_str())
            .or_insert((0.0, f64::MIN, 0, 0));
        entry.3 += 1;
        if let Some(v) = metric.value(record) {
            entry.0 += v;
            entry.1 = entry.1.max(v);
            entry.2 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(location, (sum, max, present, count))| {
            let value = match aggregation {
                Aggregation::Sum => sum,
                Aggregation::Mean => {
                    if present > 0 {
                        sum / present as f64
                    } else {
                        0.0
                    }
                }
                Aggregation::Count => count as f64,
                Aggregation::Max => {
                    if present > 0 {
                        max
                    } else {
                        0.0
                    }
                }
            };
            LocationStat {
                location: location.to_string(),
                value,
            }
        })
        .collect()
}

/// Inclusive date-range filter. If the CSV never had a `Date` column the
/// table passes through unchanged; otherwise rows with missing or
/// unparseable dates are excluded, since they cannot satisfy either bound.
pub fn filter_by_date(table: &ViolationTable, start: NaiveDate, end: NaiveDate) -> ViolationTable {
    if !table.has_column("Date") {
        return table.clone();
    }
    let rows = table
        .rows
        .iter()
        .filter(|r| matches!(r.date, Some(d) if d >= start && d <= end))
        .cloned()
        .collect();
    ViolationTable {
        columns: table.columns.clone(),
        rows,
    }
}

/// Count rows per category, descending by count then name. The extractor
/// returns the category cell for one record.
pub fn count_by<F>(rows: &[ViolationRecord], extract: F) -> Vec<(String, usize)>
where
    F: Fn(&ViolationRecord) -> &str,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in rows {
        *counts.entry(extract(record)).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Mean of a numeric field per category, skipping rows where the field is
/// missing. Sorted descending by mean.
pub fn mean_by<F, G>(rows: &[ViolationRecord], extract: F, value: G) -> Vec<(String, f64)>
where
    F: Fn(&ViolationRecord) -> &str,
    G: Fn(&ViolationRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in rows {
        if let Some(v) = value(record) {
            let entry = groups.entry(extract(record)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    let mut out: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect();
    out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Count rows per derived key (month, weekday, hour band...), sorted by key.
/// Rows where the key cannot be derived are skipped.
pub fn count_by_key<F>(rows: &[ViolationRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&ViolationRecord) -> Option<String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in rows {
        if let Some(k) = key(record) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViolationRecord;

    fn record(location: &str, fine: Option<f64>, date: Option<NaiveDate>) -> ViolationRecord {
        ViolationRecord {
            location: location.to_string(),
            date,
            hour: None,
            violation_type: "Speeding".to_string(),
            fine_amount: fine,
            vehicle_type: "Car".to_string(),
            driver_age: None,
            driver_gender: "Unknown".to_string(),
            penalty_points: None,
            weather: "Clear".to_string(),
            road_condition: "Dry".to_string(),
            payment_method: "Online".to_string(),
            fine_paid: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn sample_rows() -> Vec<ViolationRecord> {
        vec![
            record("A", Some(10.0), None),
            record("A", Some(5.0), None),
            record("B", Some(7.0), None),
        ]
    }

    #[test]
    fn aggregate_sum_by_location() {
        let stats = aggregate_by_location(&sample_rows(), Metric::FineAmount, Aggregation::Sum);
        assert_eq!(
            stats,
            vec![
                LocationStat { location: "A".to_string(), value: 15.0 },
                LocationStat { location: "B".to_string(), value: 7.0 },
            ]
        );
    }

    #[test]
    fn aggregate_count_by_location() {
        let stats = aggregate_by_location(&sample_rows(), Metric::FineAmount, Aggregation::Count);
        assert_eq!(stats[0].value, 2.0);
        assert_eq!(stats[1].value, 1.0);
    }

    #[test]
    fn aggregate_mean_and_max() {
        let stats = aggregate_by_location(&sample_rows(), Metric::FineAmount, Aggregation::Mean);
        assert_eq!(stats[0].value, 7.5);
        let stats = aggregate_by_location(&sample_rows(), Metric::FineAmount, Aggregation::Max);
        assert_eq!(stats[0].value, 10.0);
        assert_eq!(stats[1].value, 7.0);
    }

    #[test]
    fn aggregate_skips_missing_metric_cells() {
        let rows = vec![record("A", Some(10.0), None), record("A", None, None)];
        let sum = aggregate_by_location(&rows, Metric::FineAmount, Aggregation::Sum);
        assert_eq!(sum[0].value, 10.0);
        let count = aggregate_by_location(&rows, Metric::FineAmount, Aggregation::Count);
        assert_eq!(count[0].value, 2.0);
        let mean = aggregate_by_location(&rows, Metric::FineAmount, Aggregation::Mean);
        assert_eq!(mean[0].value, 10.0);
    }

    #[test]
    fn filter_by_date_is_inclusive() {
        let table = ViolationTable {
            columns: vec!["Location".to_string(), "Date".to_string()],
            rows: vec![
                record("A", None, Some(day(1))),
                record("B", None, Some(day(2))),
                record("C", None, Some(day(4))),
            ],
        };
        let filtered = filter_by_date(&table, day(1), day(3));
        let locations: Vec<&str> = filtered.rows.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["A", "B"]);
    }

    #[test]
    fn filter_by_date_without_date_column_is_identity() {
        let table = ViolationTable {
            columns: vec!["Location".to_string()],
            rows: vec![record("A", None, None), record("B", None, Some(day(9)))],
        };
        let filtered = filter_by_date(&table, day(1), day(3));
        assert_eq!(filtered, table);
    }

    #[test]
    fn filter_by_date_drops_unparsed_dates() {
        let table = ViolationTable {
            columns: vec!["Date".to_string()],
            rows: vec![record("A", None, Some(day(2))), record("B", None, None)],
        };
        let filtered = filter_by_date(&table, day(1), day(3));
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0].location, "A");
    }

    #[test]
    fn count_by_orders_descending() {
        let rows = sample_rows();
        let counts = count_by(&rows, |r| r.location.as_str());
        assert_eq!(counts, vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    }

    #[test]
    fn count_by_key_sorts_by_key_and_skips_none() {
        let rows = vec![
            record("A", None, Some(day(2))),
            record("B", None, Some(day(1))),
            record("C", None, None),
        ];
        let counts = count_by_key(&rows, |r| r.date.map(|d| d.format("%Y-%m-%d").to_string()));
        assert_eq!(
            counts,
            vec![("2023-01-01".to_string(), 1), ("2023-01-02".to_string(), 1)]
        );
    }

    #[test]
    fn mean_by_skips_missing_values() {
        let rows = vec![
            record("A", Some(10.0), None),
            record("A", None, None),
            record("B", Some(4.0), None),
        ];
        let means = mean_by(&rows, |r| r.location.as_str(), |r| r.fine_amount);
        assert_eq!(means[0], ("A".to_string(), 10.0));
        assert_eq!(means[1], ("B".to_string(), 4.0));
    }
}
