use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use thiserror::Error;

use crate::db::models::{Course, CourseModule, OverdueAttempt, Quiz};
use crate::repositories::attempts::AttemptStateUpdate;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },
    #[error("no attempt transaction is open")]
    NoTransaction,
}

/// Persistence the overdue sweep depends on.
///
/// Writes for one attempt happen between `begin_attempt` and `commit_attempt`.
/// `force_rollback` discards whatever that attempt left uncommitted and is safe to
/// call when nothing is open.
#[async_trait]
pub(crate) trait AttemptStore: Send + Sync {
    async fn open_overdue(&self, processto: i64) -> Result<AttemptCursor<'_>, StoreError>;

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError>;

    async fn find_course_module(&self, quiz_id: i64) -> Result<Option<CourseModule>, StoreError>;

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, StoreError>;

    async fn begin_attempt(&self) -> Result<(), StoreError>;

    async fn apply_state_update(&self, update: &AttemptStateUpdate) -> Result<bool, StoreError>;

    async fn commit_attempt(&self) -> Result<(), StoreError>;

    /// Returns whether an open transaction was rolled back.
    async fn force_rollback(&self) -> Result<bool, StoreError>;
}

/// Forward-only sequence of overdue attempts.
///
/// The first row is read when the cursor is opened, so a query that cannot run
/// fails before the sweep touches any attempt. The underlying stream, and the
/// connection it holds, is released when the cursor is dropped.
pub(crate) struct AttemptCursor<'a> {
    rows: BoxStream<'a, Result<OverdueAttempt, StoreError>>,
    peeked: Option<OverdueAttempt>,
    exhausted: bool,
    read: u64,
}

impl<'a> AttemptCursor<'a> {
    pub(crate) async fn open(
        mut rows: BoxStream<'a, Result<OverdueAttempt, StoreError>>,
    ) -> Result<Self, StoreError> {
        let peeked = rows.try_next().await?;
        let exhausted = peeked.is_none();
        Ok(Self { rows, peeked, exhausted, read: 0 })
    }

    pub(crate) async fn next(&mut self) -> Result<Option<OverdueAttempt>, StoreError> {
        if let Some(attempt) = self.peeked.take() {
            self.read += 1;
            return Ok(Some(attempt));
        }

        if self.exhausted {
            return Ok(None);
        }

        match self.rows.try_next().await {
            Ok(Some(attempt)) => {
                self.read += 1;
                Ok(Some(attempt))
            }
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(err) => {
                self.exhausted = true;
                Err(err)
            }
        }
    }
}

impl Drop for AttemptCursor<'_> {
    fn drop(&mut self) {
        tracing::debug!(rows_read = self.read, exhausted = self.exhausted, "Overdue attempt cursor closed");
    }
}
