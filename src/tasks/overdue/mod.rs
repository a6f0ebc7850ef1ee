mod postgres;
mod store;
mod transition;
mod updater;


use std::time::Instant;

use anyhow::Result;

use crate::core::state::AppState;

use postgres::PgAttemptStore;
use transition::TimeExpiryHandler;
use updater::OverdueAttemptUpdater;

pub(crate) use updater::SweepOutcome;

/// One full sweep against the application database, waiting for any sweep
/// already running in this process to finish first.
pub(crate) async fn sweep_overdue_attempts(
    state: &AppState,
    now: i64,
    processto: i64,
) -> Result<SweepOutcome> {
    let _running = state.sweep_lock().lock().await;
    run_sweep(state, now, processto).await
}

/// Like [`sweep_overdue_attempts`], but returns `None` straight away when another
/// sweep holds the lock.
pub(crate) async fn try_sweep_overdue_attempts(
    state: &AppState,
    now: i64,
    processto: i64,
) -> Result<Option<SweepOutcome>> {
    let Ok(_running) = state.sweep_lock().try_lock() else {
        tracing::info!(now, processto, "Overdue sweep already running; request refused");
        return Ok(None);
    };
    run_sweep(state, now, processto).await.map(Some)
}

// Each sweep keeps one pooled connection for its cursor and needs another for
// lookups and attempt transactions, so callers must hold the sweep lock.
async fn run_sweep(state: &AppState, now: i64, processto: i64) -> Result<SweepOutcome> {
    let store = PgAttemptStore::new(state.db().clone());
    let transition = TimeExpiryHandler;
    let started = Instant::now();

    tracing::info!(now, processto, "Looking for overdue quiz attempts");

    let result = OverdueAttemptUpdater::new(&store, &transition)
        .update_overdue_attempts(now, processto)
        .await;

    metrics::histogram!("overdue_sweep_duration_seconds").record(started.elapsed().as_secs_f64());

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            metrics::counter!("overdue_sweeps_total", "status" => "failed").increment(1);
            return Err(err);
        }
    };

    tracing::info!(
        processed = outcome.processed,
        quizzes = outcome.quizzes,
        failed = outcome.failed,
        "Considered {} attempts in {} quizzes",
        outcome.processed,
        outcome.quizzes
    );
    metrics::counter!("overdue_sweeps_total", "status" => "completed").increment(1);
    metrics::counter!("overdue_attempts_processed_total").increment(outcome.processed);
    metrics::counter!("overdue_attempts_failed_total").increment(outcome.failed);
    metrics::counter!("overdue_quizzes_touched_total").increment(outcome.quizzes);

    Ok(outcome)
}
