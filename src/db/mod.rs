pub mod bootstrap;
pub mod statement;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // a single connection so every statement sees the same in-memory database
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite")
}
