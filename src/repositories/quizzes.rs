use crate::db::models::Quiz;

pub(crate) const COLUMNS: &str = "\
    id, course_id, name, timeopen, timeclose, timelimit, overduehandling, graceperiod";

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}
