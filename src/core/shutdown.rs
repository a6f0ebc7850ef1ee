use tokio::signal;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

async fn wait_for_signal() -> Signal {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => Signal::Interrupt,
        _ = terminate => Signal::Terminate,
    }
}

/// Resolves on SIGINT or SIGTERM.
pub(crate) async fn shutdown_signal() {
    let signal = wait_for_signal().await;
    tracing::info!(signal = signal.as_str(), "shutdown signal received");
}

/// Waits for a signal, then flips `stop` so background loops finish their current tick
/// and exit.
pub(crate) async fn broadcast_on_signal(stop: watch::Sender<bool>) {
    shutdown_signal().await;
    if stop.send(true).is_err() {
        tracing::warn!("Shutdown requested but no background loop is listening");
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;

    #[test]
    fn signal_names_match_posix() {
        assert_eq!(Signal::Interrupt.as_str(), "SIGINT");
        assert_eq!(Signal::Terminate.as_str(), "SIGTERM");
    }
}
