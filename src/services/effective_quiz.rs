use crate::db::models::{OverdueAttempt, Quiz};
use crate::db::types::OverdueHandling;

/// Quiz settings as they apply to one user: the quiz defaults with the close time
/// and time limit replaced by the user's effective values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EffectiveQuiz {
    pub(crate) quiz_id: i64,
    pub(crate) course_id: i64,
    pub(crate) timeopen: i64,
    pub(crate) timeclose: i64,
    pub(crate) timelimit: i64,
    pub(crate) overduehandling: OverdueHandling,
    pub(crate) graceperiod: i64,
}

impl EffectiveQuiz {
    pub(crate) fn for_attempt(quiz: &Quiz, attempt: &OverdueAttempt) -> Self {
        Self {
            quiz_id: quiz.id,
            course_id: quiz.course_id,
            timeopen: quiz.timeopen,
            timeclose: attempt.usertimeclose,
            timelimit: attempt.usertimelimit,
            overduehandling: quiz.overduehandling,
            graceperiod: quiz.graceperiod,
        }
    }
}
