use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Lifecycle of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "attemptstate", rename_all = "lowercase")]
pub(crate) enum AttemptState {
    InProgress,
    Overdue,
    Finished,
    Abandoned,
}

impl AttemptState {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "inprogress",
            Self::Overdue => "overdue",
            Self::Finished => "finished",
            Self::Abandoned => "abandoned",
        }
    }

    /// States the overdue sweep has to keep looking at.
    pub(crate) fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::Overdue)
    }
}

/// What happens to an in-progress attempt once its time runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "overduehandling", rename_all = "lowercase")]
pub(crate) enum OverdueHandling {
    AutoSubmit,
    GracePeriod,
    AutoAbandon,
}
