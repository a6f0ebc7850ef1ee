use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::db::models::{Course, CourseModule, Quiz};
use crate::repositories;
use crate::repositories::attempts::AttemptStateUpdate;

use super::store::{AttemptCursor, AttemptStore, StoreError};

/// `AttemptStore` over a Postgres pool.
///
/// The cursor streams on one pooled connection while attempt writes run in a
/// separate transaction kept in `open`, which never spans more than one attempt.
pub(crate) struct PgAttemptStore {
    pool: PgPool,
    open: Mutex<Option<Transaction<'static, Postgres>>>,
}

impl PgAttemptStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool, open: Mutex::new(None) }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn open_overdue(&self, processto: i64) -> Result<AttemptCursor<'_>, StoreError> {
        let rows = repositories::attempts::stream_overdue(&self.pool, processto)
            .map_err(StoreError::from)
            .boxed();
        AttemptCursor::open(rows).await
    }

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError> {
        Ok(repositories::quizzes::find_by_id(&self.pool, quiz_id).await?)
    }

    async fn find_course_module(&self, quiz_id: i64) -> Result<Option<CourseModule>, StoreError> {
        Ok(repositories::course_modules::find_by_quiz(&self.pool, quiz_id).await?)
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, StoreError> {
        Ok(repositories::courses::find_by_id(&self.pool, course_id).await?)
    }

    async fn begin_attempt(&self) -> Result<(), StoreError> {
        let mut open = self.open.lock().await;
        if let Some(stale) = open.take() {
            tracing::warn!("Rolling back attempt transaction left open by a previous attempt");
            stale.rollback().await?;
        }
        *open = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn apply_state_update(&self, update: &AttemptStateUpdate) -> Result<bool, StoreError> {
        let mut open = self.open.lock().await;
        let applied = match open.as_mut() {
            Some(tx) => repositories::attempts::apply_state_update(&mut **tx, update).await?,
            None => repositories::attempts::apply_state_update(&self.pool, update).await?,
        };
        Ok(applied)
    }

    async fn commit_attempt(&self) -> Result<(), StoreError> {
        let tx = self.open.lock().await.take().ok_or(StoreError::NoTransaction)?;
        tx.commit().await?;
        Ok(())
    }

    async fn force_rollback(&self) -> Result<bool, StoreError> {
        let Some(tx) = self.open.lock().await.take() else {
            return Ok(false);
        };
        tx.rollback().await?;
        Ok(true)
    }
}
