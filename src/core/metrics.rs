use std::sync::OnceLock;

use metrics::Unit;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder once per process when enabled.
pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    if PROM_HANDLE.set(handle).is_ok() {
        describe_sweep_metrics();
    }
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

fn describe_sweep_metrics() {
    metrics::describe_counter!("overdue_sweeps_total", "Overdue sweeps by final status");
    metrics::describe_counter!(
        "overdue_attempts_processed_total",
        "Attempts whose time-expiry transition completed"
    );
    metrics::describe_counter!(
        "overdue_attempts_failed_total",
        "Attempts skipped after an error"
    );
    metrics::describe_counter!(
        "overdue_quizzes_touched_total",
        "Distinct quizzes loaded by sweeps"
    );
    metrics::describe_counter!(
        "overdue_attempt_transitions_total",
        "Attempt state changes by target state"
    );
    metrics::describe_histogram!(
        "overdue_sweep_duration_seconds",
        Unit::Seconds,
        "Wall time of one sweep"
    );
}
