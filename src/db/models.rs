use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::types::{AttemptState, OverdueHandling};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: i64,
    pub(crate) shortname: String,
    pub(crate) fullname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: i64,
    pub(crate) course_id: i64,
    pub(crate) name: String,
    pub(crate) timeopen: i64,
    /// Default close time, `0` when the quiz never closes.
    pub(crate) timeclose: i64,
    /// Default time limit in seconds, `0` when unlimited.
    pub(crate) timelimit: i64,
    pub(crate) overduehandling: OverdueHandling,
    pub(crate) graceperiod: i64,
}

/// Placement of a quiz inside its course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseModule {
    pub(crate) id: i64,
    pub(crate) course_id: i64,
    pub(crate) quiz_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizAttempt {
    pub(crate) id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) user_id: i64,
    pub(crate) attempt: i32,
    pub(crate) state: AttemptState,
    pub(crate) preview: bool,
    pub(crate) timestart: i64,
    pub(crate) timefinish: i64,
    pub(crate) timemodified: i64,
    /// Next time the attempt must be re-examined; `None` when nothing is pending.
    pub(crate) timecheckstate: Option<i64>,
}

/// An attempt together with the close time and time limit that apply to its user
/// once user and group overrides are taken into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct OverdueAttempt {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub(crate) attempt: QuizAttempt,
    pub(crate) course_id: i64,
    pub(crate) usertimeclose: i64,
    pub(crate) usertimelimit: i64,
}
