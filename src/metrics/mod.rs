//! Delivery metrics computed from cached iteration payloads

pub mod calculator;
pub mod service;
pub mod store;

use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use service::MetricsService;
pub use store::MetricsStore;

/// Metric families supported by `sprintlens metrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Sum of closed issue weights
    Velocity,
    /// Hours from "In progress" to closed
    CycleTime,
    /// Hours from MR opened to merged
    LeadTime,
    /// Successful pipelines per day
    DeploymentFrequency,
    /// Mean hours to close an incident
    Mttr,
    /// Incidents per successful deployment, as a percentage
    ChangeFailureRate,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Velocity => "velocity",
            MetricKind::CycleTime => "cycle-time",
            MetricKind::LeadTime => "lead-time",
            MetricKind::DeploymentFrequency => "deployment-frequency",
            MetricKind::Mttr => "mttr",
            MetricKind::ChangeFailureRate => "change-failure-rate",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Velocity => "points",
            MetricKind::CycleTime | MetricKind::LeadTime | MetricKind::Mttr => "hours",
            MetricKind::DeploymentFrequency => "deployments/day",
            MetricKind::ChangeFailureRate => "percent",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computed metric value for one iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// `<kind>:<iteration id>`; recomputing replaces the stored value
    pub id: String,
    pub kind: MetricKind,
    pub iteration_id: String,
    #[serde(default)]
    pub iteration_title: Option<String>,
    pub value: f64,
    pub unit: String,
    pub computed_at: DateTime<Utc>,
}

impl Metric {
    pub fn new(kind: MetricKind, iteration_id: &str, value: f64) -> Self {
        Self {
            id: format!("{}:{}", kind, iteration_id),
            kind,
            iteration_id: iteration_id.to_string(),
            iteration_title: None,
            value,
            unit: kind.unit().to_string(),
            computed_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.iteration_title = Some(title.into());
        self
    }
}
