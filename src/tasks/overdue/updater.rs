use anyhow::{Context, Result};
use serde::Serialize;

use crate::db::models::{Course, CourseModule, OverdueAttempt, Quiz};
use crate::services::effective_quiz::EffectiveQuiz;

use super::store::{AttemptStore, StoreError};
use super::transition::{AttemptContext, AttemptTransition};

/// Work done by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct SweepOutcome {
    /// Attempts whose transition completed without error.
    pub(crate) processed: u64,
    /// Distinct quizzes whose settings were loaded.
    pub(crate) quizzes: u64,
    pub(crate) failed: u64,
}

struct QuizContext {
    quiz: Quiz,
    course_module: CourseModule,
}

/// Drives every overdue attempt through its time-expiry transition.
pub(crate) struct OverdueAttemptUpdater<'a> {
    store: &'a dyn AttemptStore,
    transition: &'a dyn AttemptTransition,
}

impl<'a> OverdueAttemptUpdater<'a> {
    pub(crate) fn new(store: &'a dyn AttemptStore, transition: &'a dyn AttemptTransition) -> Self {
        Self { store, transition }
    }

    /// Runs one sweep. A failing attempt is logged, its transaction rolled back and
    /// the sweep moves on; only a failure to read the attempt list aborts it.
    pub(crate) async fn update_overdue_attempts(
        &self,
        now: i64,
        processto: i64,
    ) -> Result<SweepOutcome> {
        let mut cursor = self
            .store
            .open_overdue(processto)
            .await
            .context("Failed to query overdue attempts")?;

        let mut outcome = SweepOutcome::default();
        let mut current_quiz: Option<QuizContext> = None;
        let mut current_course: Option<Course> = None;

        loop {
            let attempt = match cursor.next().await {
                Ok(Some(attempt)) => attempt,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(
                        processed = outcome.processed,
                        quizzes = outcome.quizzes,
                        failed = outcome.failed,
                        "Overdue sweep aborted while reading attempts"
                    );
                    return Err(err).context("Failed to read overdue attempts");
                }
            };

            let result = self
                .process_attempt(&attempt, &mut current_quiz, &mut current_course, &mut outcome, now)
                .await;

            match result {
                Ok(()) => outcome.processed += 1,
                Err(err) => {
                    outcome.failed += 1;
                    tracing::error!(
                        attempt_id = attempt.attempt.id,
                        quiz_id = attempt.attempt.quiz_id,
                        error = %err,
                        trace = ?err,
                        "Error while processing overdue attempt"
                    );
                    self.reset_transaction(attempt.attempt.id).await;
                }
            }
        }

        drop(cursor);
        Ok(outcome)
    }

    async fn process_attempt(
        &self,
        attempt: &OverdueAttempt,
        current_quiz: &mut Option<QuizContext>,
        current_course: &mut Option<Course>,
        outcome: &mut SweepOutcome,
        now: i64,
    ) -> Result<()> {
        let quiz_id = attempt.attempt.quiz_id;
        let quiz_context = match current_quiz.take() {
            Some(cached) if cached.quiz.id == quiz_id => cached,
            previous => match self.load_quiz(quiz_id).await {
                Ok(loaded) => {
                    outcome.quizzes += 1;
                    loaded
                }
                Err(err) => {
                    *current_quiz = previous;
                    return Err(err);
                }
            },
        };
        let quiz_context = current_quiz.insert(quiz_context);

        let course_id = quiz_context.quiz.course_id;
        let course = match current_course.take() {
            Some(cached) if cached.id == course_id => cached,
            previous => match self.load_course(course_id).await {
                Ok(loaded) => loaded,
                Err(err) => {
                    *current_course = previous;
                    return Err(err);
                }
            },
        };
        let course = current_course.insert(course);

        let effective = EffectiveQuiz::for_attempt(&quiz_context.quiz, attempt);
        let context = AttemptContext {
            attempt: &attempt.attempt,
            quiz: &effective,
            course_module: &quiz_context.course_module,
            course,
        };

        self.transition
            .handle_if_time_expired(self.store, context, now, false)
            .await
            .context("Time-expiry transition failed")?;

        Ok(())
    }

    async fn load_quiz(&self, quiz_id: i64) -> Result<QuizContext> {
        let quiz = self
            .store
            .find_quiz(quiz_id)
            .await
            .context("Failed to fetch quiz")?
            .ok_or(StoreError::NotFound { entity: "quiz", id: quiz_id })?;
        let course_module = self
            .store
            .find_course_module(quiz_id)
            .await
            .context("Failed to fetch course module")?
            .ok_or(StoreError::NotFound { entity: "course module for quiz", id: quiz_id })?;

        Ok(QuizContext { quiz, course_module })
    }

    async fn load_course(&self, course_id: i64) -> Result<Course> {
        let course = self
            .store
            .find_course(course_id)
            .await
            .context("Failed to fetch course")?
            .ok_or(StoreError::NotFound { entity: "course", id: course_id })?;
        Ok(course)
    }

    async fn reset_transaction(&self, attempt_id: i64) {
        match self.store.force_rollback().await {
            Ok(true) => {
                tracing::warn!(attempt_id, "Rolled back open transaction after attempt failure")
            }
            Ok(false) => {}
            Err(err) => tracing::error!(
                attempt_id,
                error = %err,
                "Failed to roll back transaction after attempt failure"
            ),
        }
    }
}
