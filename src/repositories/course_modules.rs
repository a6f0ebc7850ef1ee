use crate::db::models::CourseModule;

pub(crate) async fn find_by_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: i64,
) -> Result<Option<CourseModule>, sqlx::Error> {
    sqlx::query_as::<_, CourseModule>(
        "SELECT id, course_id, quiz_id FROM course_modules WHERE quiz_id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(executor)
    .await
}
