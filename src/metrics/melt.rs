use serde_json::Value;

use super::SourceKind;
use super::table::{MetricTable, TableError};

/// One (epoch, type, metric, value) row of a long-format table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub epoch: i64,
    pub source: SourceKind,
    pub metric: String,
    /// `None` where the wide table had no value.
    pub value: Option<Value>,
}

/// Unpivot exactly `metrics` from `table`.
///
/// Rows come out metric-major: every table row for the first metric, then
/// every row for the next one.
pub fn melt(table: &MetricTable, metrics: &[String]) -> Result<Vec<LongRecord>, TableError> {
    if let Some(unknown) = metrics.iter().find(|metric| !table.has_metric(metric)) {
        return Err(TableError::UnknownMetric(unknown.clone()));
    }
    let mut long = Vec::with_capacity(table.len() * metrics.len());
    for metric in metrics {
        for row in table.rows() {
            long.push(LongRecord {
                epoch: row.epoch,
                source: row.source,
                metric: metric.clone(),
                value: row.value(metric).cloned(),
            });
        }
    }
    Ok(long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::parse_metric_log;
    use serde_json::json;

    fn combined(train: &str, test: &str) -> MetricTable {
        let load = |json: &str, source| {
            MetricTable::from_log(parse_metric_log(json.as_bytes()).unwrap(), source).unwrap()
        };
        MetricTable::union([
            load(train, SourceKind::Training),
            load(test, SourceKind::Testing),
        ])
    }

    #[test]
    fn melts_selected_metric_for_both_sources() {
        let table = combined(r#"{"0": {"loss": 1.0}}"#, r#"{"0": {"loss": 0.9}}"#);
        let long = melt(&table, &["loss".to_string()]).unwrap();
        assert_eq!(
            long,
            vec![
                LongRecord {
                    epoch: 0,
                    source: SourceKind::Training,
                    metric: "loss".into(),
                    value: Some(json!(1.0)),
                },
                LongRecord {
                    epoch: 0,
                    source: SourceKind::Testing,
                    metric: "loss".into(),
                    value: Some(json!(0.9)),
                },
            ]
        );
    }

    #[test]
    fn only_chosen_columns_are_unpivoted() {
        let table = combined(
            r#"{"0": {"loss": 1.0, "acc": 0.2}, "1": {"loss": 0.8, "acc": 0.4}}"#,
            r#"{"0": {"loss": 0.9, "acc": 0.3}}"#,
        );
        let long = melt(&table, &["acc".to_string()]).unwrap();
        assert_eq!(long.len(), 3);
        assert!(long.iter().all(|row| row.metric == "acc"));
    }

    #[test]
    fn rows_are_metric_major() {
        let table = combined(r#"{"0": {"loss": 1.0, "acc": 0.2}}"#, r#"{"0": {"loss": 0.9}}"#);
        let long = melt(&table, &["acc".to_string(), "loss".to_string()]).unwrap();
        let order: Vec<_> = long
            .iter()
            .map(|row| (row.metric.as_str(), row.source))
            .collect();
        assert_eq!(
            order,
            [
                ("acc", SourceKind::Training),
                ("acc", SourceKind::Testing),
                ("loss", SourceKind::Training),
                ("loss", SourceKind::Testing),
            ]
        );
        assert_eq!(long[1].value, None);
    }

    #[test]
    fn unknown_metric_is_an_error() {
        let table = combined(r#"{"0": {"loss": 1.0}}"#, r#"{}"#);
        let err = melt(&table, &["f1".to_string()]).unwrap_err();
        assert_eq!(err, TableError::UnknownMetric("f1".into()));
    }
}
