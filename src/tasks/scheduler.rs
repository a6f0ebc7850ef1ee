use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::state::AppState;
use crate::core::time::unix_now;
use crate::tasks::overdue;

pub(crate) async fn run(state: AppState) -> Result<()> {
    if !state.settings().sweep().enabled {
        tracing::warn!("Overdue sweep disabled; worker idles until shutdown");
        crate::core::shutdown::shutdown_signal().await;
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(overdue_sweep_loop(state, shutdown_rx));

    crate::core::shutdown::broadcast_on_signal(shutdown_tx).await;

    if let Err(err) = handle.await {
        tracing::error!(error = %err, "Background task join failed");
    }

    Ok(())
}

async fn overdue_sweep_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let period = Duration::from_secs(state.settings().sweep().interval_seconds);
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_seconds = period.as_secs(), "Overdue sweep loop started");

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                let now = unix_now();
                let processto = state.settings().sweep().processto(now);
                if let Err(err) = overdue::sweep_overdue_attempts(&state, now, processto).await {
                    tracing::error!(error = %err, trace = ?err, "Overdue attempt sweep failed");
                }
            }
        }
    }

    tracing::info!("Overdue sweep loop stopped");
}
