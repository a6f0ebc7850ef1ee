use sqlx::PgPool;

/// Round-trips to the database and returns its clock as unix seconds.
pub(crate) async fn ping(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT EXTRACT(EPOCH FROM now())::BIGINT").fetch_one(pool).await
}
