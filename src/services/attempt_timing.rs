use crate::db::models::QuizAttempt;
use crate::db::types::{AttemptState, OverdueHandling};
use crate::repositories::attempts::AttemptStateUpdate;
use crate::services::effective_quiz::EffectiveQuiz;

/// Outcome of checking one attempt against its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionDecision {
    /// State stays as it is; only the next check time changes.
    Reschedule { timecheckstate: Option<i64> },
    GoOverdue { timecheckstate: i64 },
    Finish { timefinish: i64 },
    Abandon,
}

impl TransitionDecision {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Reschedule { .. } => "rescheduled",
            Self::GoOverdue { .. } => "overdue",
            Self::Finish { .. } => "finished",
            Self::Abandon => "abandoned",
        }
    }

    pub(crate) fn into_update(self, attempt: &QuizAttempt, now: i64) -> AttemptStateUpdate {
        let (state, timecheckstate, timefinish) = match self {
            Self::Reschedule { timecheckstate } => (attempt.state, timecheckstate, None),
            Self::GoOverdue { timecheckstate } => {
                (AttemptState::Overdue, Some(timecheckstate), None)
            }
            Self::Finish { timefinish } => (AttemptState::Finished, None, Some(timefinish)),
            Self::Abandon => (AttemptState::Abandoned, None, None),
        };

        AttemptStateUpdate {
            attempt_id: attempt.id,
            expected_state: attempt.state,
            state,
            timecheckstate,
            timefinish,
            timemodified: now,
        }
    }
}

/// Moment the attempt runs out of time: the earlier of the close time and the end
/// of the time limit. `None` when neither applies.
pub(crate) fn attempt_end_time(quiz: &EffectiveQuiz, attempt: &QuizAttempt) -> Option<i64> {
    let close = (quiz.timeclose > 0).then_some(quiz.timeclose);
    let limit = (quiz.timelimit > 0).then(|| attempt.timestart.saturating_add(quiz.timelimit));

    match (close, limit) {
        (Some(close), Some(limit)) => Some(close.min(limit)),
        (close, limit) => close.or(limit),
    }
}

/// Transition for `attempt` at `now` under its effective settings.
///
/// With a zero grace period, going overdue schedules the next check at the end
/// time itself, so the very next sweep finds the attempt again and abandons it.
pub(crate) fn decide(
    quiz: &EffectiveQuiz,
    attempt: &QuizAttempt,
    now: i64,
    is_preview: bool,
) -> TransitionDecision {
    let Some(end) = attempt_end_time(quiz, attempt) else {
        return TransitionDecision::Reschedule { timecheckstate: None };
    };

    // Previews and attempts that already left the active states never need a check.
    if is_preview || !attempt.state.is_active() {
        return TransitionDecision::Reschedule { timecheckstate: None };
    }

    if now < end {
        return TransitionDecision::Reschedule { timecheckstate: Some(end) };
    }

    match attempt.state {
        AttemptState::Overdue => {
            let grace_end = end.saturating_add(quiz.graceperiod);
            if now >= grace_end {
                TransitionDecision::Abandon
            } else {
                TransitionDecision::Reschedule { timecheckstate: Some(grace_end) }
            }
        }
        _ => match quiz.overduehandling {
            OverdueHandling::AutoSubmit => TransitionDecision::Finish { timefinish: end },
            OverdueHandling::GracePeriod => TransitionDecision::GoOverdue {
                timecheckstate: end.saturating_add(quiz.graceperiod),
            },
            OverdueHandling::AutoAbandon => TransitionDecision::Abandon,
        },
    }
}
