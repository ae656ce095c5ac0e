use crate::core::models::common::Requester;
use crate::database::sqlx::SqliteSqlxManager;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Fresh in-memory database with migrations and seed templates applied.
pub async fn manager() -> SqliteSqlxManager {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap().foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    SqliteSqlxManager::new(pool)
}

pub fn owner() -> Requester {
    Requester::new("10.0.0.1")
}

pub fn stranger() -> Requester {
    Requester::new("10.0.0.2")
}
