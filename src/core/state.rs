use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::core::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    // Held for the whole of an overdue sweep; at most one runs per process.
    sweep_lock: Mutex<()>,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, sweep_lock: Mutex::new(()) }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn sweep_lock(&self) -> &Mutex<()> {
        &self.inner.sweep_lock
    }
}
