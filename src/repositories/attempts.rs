use std::sync::OnceLock;

use futures::stream::BoxStream;
use sqlx::PgPool;

use crate::db::models::OverdueAttempt;
use crate::db::types::AttemptState;
use crate::repositories::overrides::usertime_sql;

pub(crate) const COLUMNS: &str = "\
    qa.id, qa.quiz_id, qa.user_id, qa.attempt, qa.state, qa.preview, \
    qa.timestart, qa.timefinish, qa.timemodified, qa.timecheckstate";

/// New state for one attempt, applied only while the attempt is still in `expected_state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttemptStateUpdate {
    pub(crate) attempt_id: i64,
    pub(crate) expected_state: AttemptState,
    pub(crate) state: AttemptState,
    pub(crate) timecheckstate: Option<i64>,
    pub(crate) timefinish: Option<i64>,
    pub(crate) timemodified: i64,
}

fn overdue_sql() -> &'static str {
    static SQL: OnceLock<String> = OnceLock::new();
    SQL.get_or_init(|| {
        let usertimes = usertime_sql(
            "iqa.state IN ($1, $2) AND iqa.timecheckstate IS NOT NULL AND iqa.timecheckstate <= $3",
        );
        format!(
            "SELECT {COLUMNS}, q.course_id, qu.usertimeclose, qu.usertimelimit
               FROM quiz_attempts qa
               JOIN quizzes q ON q.id = qa.quiz_id
               JOIN ({usertimes}) qu ON qu.id = qa.id
              WHERE qa.state IN ($1, $2)
                AND qa.timecheckstate IS NOT NULL
                AND qa.timecheckstate <= $3
           ORDER BY q.course_id, qa.quiz_id, qa.id"
        )
    })
}

fn single_attempt_sql() -> &'static str {
    static SQL: OnceLock<String> = OnceLock::new();
    SQL.get_or_init(|| {
        let usertimes = usertime_sql("iqa.id = $1");
        format!(
            "SELECT {COLUMNS}, q.course_id, qu.usertimeclose, qu.usertimelimit
               FROM quiz_attempts qa
               JOIN quizzes q ON q.id = qa.quiz_id
               JOIN ({usertimes}) qu ON qu.id = qa.id
              WHERE qa.id = $1"
        )
    })
}

/// Attempts that are still running and due for a check at or before `processto`,
/// grouped by course and then by quiz. Rows are streamed from the server.
pub(crate) fn stream_overdue(
    pool: &PgPool,
    processto: i64,
) -> BoxStream<'_, Result<OverdueAttempt, sqlx::Error>> {
    sqlx::query_as::<_, OverdueAttempt>(overdue_sql())
        .bind(AttemptState::InProgress)
        .bind(AttemptState::Overdue)
        .bind(processto)
        .fetch(pool)
}

/// One attempt with its effective times, as an interactive view would see it.
pub(crate) async fn find_with_usertimes(
    executor: impl sqlx::PgExecutor<'_>,
    attempt_id: i64,
) -> Result<Option<OverdueAttempt>, sqlx::Error> {
    sqlx::query_as::<_, OverdueAttempt>(single_attempt_sql())
        .bind(attempt_id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn apply_state_update(
    executor: impl sqlx::PgExecutor<'_>,
    update: &AttemptStateUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE quiz_attempts
            SET state = $1,
                timecheckstate = $2,
                timefinish = COALESCE($3, timefinish),
                timemodified = $4
          WHERE id = $5 AND state = $6",
    )
    .bind(update.state)
    .bind(update.timecheckstate)
    .bind(update.timefinish)
    .bind(update.timemodified)
    .bind(update.attempt_id)
    .bind(update.expected_state)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
