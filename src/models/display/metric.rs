//! Metric display model

use serde::Serialize;
use tabled::Tabled;

use crate::metrics::Metric;
use crate::output::formatters::{format_local, format_value};

/// Row for `metrics <NAME>`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MetricDisplay {
    #[tabled(rename = "ITERATION")]
    pub iteration: String,

    #[tabled(rename = "METRIC")]
    pub kind: String,

    #[tabled(rename = "VALUE")]
    pub value: String,

    #[tabled(rename = "COMPUTED")]
    pub computed_at: String,
}

impl From<&Metric> for MetricDisplay {
    fn from(metric: &Metric) -> Self {
        Self {
            iteration: metric
                .iteration_title
                .clone()
                .unwrap_or_else(|| metric.iteration_id.clone()),
            kind: metric.kind.to_string(),
            value: format_value(metric.value, &metric.unit),
            computed_at: format_local(metric.computed_at),
        }
    }
}
