use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::time::format_unix;
use crate::db::models::{OverdueAttempt, QuizAttempt};
use crate::services::attempt_timing::TransitionDecision;
use crate::tasks::overdue::SweepOutcome;

/// Manual sweep request. Omitted times fall back to the clock and the configured
/// grace period, exactly as the scheduler computes them.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_window"))]
pub(crate) struct SweepRequest {
    #[validate(range(min = 0, message = "now must be non-negative"))]
    pub(crate) now: Option<i64>,
    #[validate(range(min = 0, message = "processto must be non-negative"))]
    pub(crate) processto: Option<i64>,
}

fn validate_window(request: &SweepRequest) -> Result<(), ValidationError> {
    match (request.now, request.processto) {
        (Some(now), Some(processto)) if processto > now => Err(ValidationError::new("window")
            .with_message(Cow::Borrowed("processto must not be after now"))),
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SweepResponse {
    pub(crate) processed: u64,
    pub(crate) quizzes: u64,
    pub(crate) failed: u64,
    pub(crate) now: i64,
    pub(crate) processto: i64,
    pub(crate) processto_at: String,
}

impl SweepResponse {
    pub(crate) fn new(outcome: SweepOutcome, now: i64, processto: i64) -> Self {
        Self {
            processed: outcome.processed,
            quizzes: outcome.quizzes,
            failed: outcome.failed,
            now,
            processto,
            processto_at: format_unix(processto),
        }
    }
}

/// What the sweep would do with one attempt right now.
#[derive(Debug, Serialize)]
pub(crate) struct AttemptTimingResponse {
    pub(crate) attempt: QuizAttempt,
    pub(crate) course_id: i64,
    pub(crate) usertimeclose: i64,
    pub(crate) usertimelimit: i64,
    pub(crate) end_time: Option<i64>,
    pub(crate) end_time_at: Option<String>,
    pub(crate) due_for_sweep: bool,
    pub(crate) next_action: &'static str,
    pub(crate) next_check: Option<i64>,
}

impl AttemptTimingResponse {
    pub(crate) fn new(
        row: OverdueAttempt,
        end_time: Option<i64>,
        decision: TransitionDecision,
        processto: i64,
    ) -> Self {
        let due_for_sweep = row.attempt.state.is_active()
            && row.attempt.timecheckstate.is_some_and(|check| check <= processto);
        let next_check = match decision {
            TransitionDecision::Reschedule { timecheckstate } => timecheckstate,
            TransitionDecision::GoOverdue { timecheckstate } => Some(timecheckstate),
            TransitionDecision::Finish { .. } | TransitionDecision::Abandon => None,
        };

        Self {
            attempt: row.attempt,
            course_id: row.course_id,
            usertimeclose: row.usertimeclose,
            usertimelimit: row.usertimelimit,
            end_time,
            end_time_at: end_time.map(format_unix),
            due_for_sweep,
            next_action: decision.label(),
            next_check,
        }
    }
}
