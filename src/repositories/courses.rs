use crate::db::models::Course;

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, shortname, fullname FROM courses WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}
