//! Metric formulas over a single iteration payload
//!
//! Every function returns 0 when there is nothing to measure, including
//! when an enrichment (pipelines, incidents, status history) is missing.

use chrono::{DateTime, Utc};

use super::MetricKind;
use crate::client::DateWindow;
use crate::client::models::IterationPayload;

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Closed issue weights; an unweighted issue counts as 1.
pub fn velocity(payload: &IterationPayload) -> f64 {
    payload
        .issues
        .iter()
        .filter(|issue| issue.is_closed())
        .map(|issue| f64::from(issue.weight.unwrap_or(1)))
        .sum()
}

/// Mean hours from first "In progress" to close.
pub fn cycle_time(payload: &IterationPayload) -> f64 {
    mean(payload.issues.iter().filter_map(|issue| {
        let started = issue.in_progress_at?;
        let closed = issue.closed_at?;
        (closed >= started).then(|| hours_between(started, closed))
    }))
}

/// Mean hours from MR creation to merge.
pub fn lead_time(payload: &IterationPayload) -> f64 {
    mean(payload.merge_requests.iter().filter_map(|mr| {
        let merged = mr.merged_at?;
        (merged >= mr.created_at).then(|| hours_between(mr.created_at, merged))
    }))
}

fn successful_deployments(payload: &IterationPayload) -> usize {
    payload.pipelines.iter().filter(|p| p.is_success()).count()
}

/// Successful pipelines per iteration day.
pub fn deployment_frequency(payload: &IterationPayload) -> f64 {
    let window = DateWindow::for_dates(payload.metadata.start_date, payload.metadata.due_date);
    successful_deployments(payload) as f64 / window.days() as f64
}

/// Mean hours from incident creation to close.
pub fn mttr(payload: &IterationPayload) -> f64 {
    mean(payload.incidents.iter().filter_map(|incident| {
        let closed = incident.closed_at?;
        (closed >= incident.created_at).then(|| hours_between(incident.created_at, closed))
    }))
}

/// Incidents per successful deployment, as a percentage.
pub fn change_failure_rate(payload: &IterationPayload) -> f64 {
    let deployments = successful_deployments(payload);
    if deployments == 0 {
        return 0.0;
    }
    payload.incidents.len() as f64 / deployments as f64 * 100.0
}

/// Dispatch on `kind`.
pub fn calculate(kind: MetricKind, payload: &IterationPayload) -> f64 {
    match kind {
        MetricKind::Velocity => velocity(payload),
        MetricKind::CycleTime => cycle_time(payload),
        MetricKind::LeadTime => lead_time(payload),
        MetricKind::DeploymentFrequency => deployment_frequency(payload),
        MetricKind::Mttr => mttr(payload),
        MetricKind::ChangeFailureRate => change_failure_rate(payload),
    }
}
