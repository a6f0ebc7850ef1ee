use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::db::models::{Course, CourseModule, QuizAttempt};
use crate::services::attempt_timing::{decide, TransitionDecision};
use crate::services::effective_quiz::EffectiveQuiz;

use super::store::AttemptStore;

/// Everything the time-expiry transition needs to judge one attempt.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttemptContext<'a> {
    pub(crate) attempt: &'a QuizAttempt,
    pub(crate) quiz: &'a EffectiveQuiz,
    pub(crate) course_module: &'a CourseModule,
    pub(crate) course: &'a Course,
}

#[async_trait]
pub(crate) trait AttemptTransition: Send + Sync {
    /// Moves the attempt on if its time has run out and records when it next needs
    /// checking. Calling it again on an attempt that already moved is a no-op.
    async fn handle_if_time_expired(
        &self,
        store: &dyn AttemptStore,
        context: AttemptContext<'_>,
        now: i64,
        is_preview: bool,
    ) -> Result<TransitionDecision>;
}

/// Default transition: decides from the attempt's effective deadline and persists
/// the result in an attempt-scoped transaction.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TimeExpiryHandler;

#[async_trait]
impl AttemptTransition for TimeExpiryHandler {
    async fn handle_if_time_expired(
        &self,
        store: &dyn AttemptStore,
        context: AttemptContext<'_>,
        now: i64,
        is_preview: bool,
    ) -> Result<TransitionDecision> {
        let attempt = context.attempt;
        let decision = decide(context.quiz, attempt, now, is_preview || attempt.preview);
        let update = decision.into_update(attempt, now);

        if update.state == attempt.state && update.timecheckstate == attempt.timecheckstate {
            return Ok(decision);
        }

        store.begin_attempt().await.context("Failed to start attempt transaction")?;
        let applied =
            store.apply_state_update(&update).await.context("Failed to update attempt state")?;
        store.commit_attempt().await.context("Failed to commit attempt state")?;

        if !applied {
            tracing::debug!(
                attempt_id = attempt.id,
                state = attempt.state.as_str(),
                "Attempt changed before its deadline check was applied"
            );
            return Ok(decision);
        }

        if update.state != attempt.state {
            tracing::info!(
                attempt_id = attempt.id,
                quiz_id = context.quiz.quiz_id,
                course_id = context.course.id,
                course_module_id = context.course_module.id,
                from = attempt.state.as_str(),
                to = update.state.as_str(),
                "Attempt time expired"
            );
            metrics::counter!("overdue_attempt_transitions_total", "to" => decision.label())
                .increment(1);
        }

        Ok(decision)
    }
}
