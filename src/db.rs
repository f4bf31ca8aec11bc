use std::str::FromStr;

use sqlx::MySqlPool;
use sqlx::mysql::MySqlConnectOptions;

/// Connect to MySQL. The URL carries host and credentials; the database
/// name is configured separately and applied here.
pub async fn init_db(database_url: &str, database_name: &str) -> MySqlPool {
    let options = MySqlConnectOptions::from_str(database_url)
        .expect("DATABASE_URL must be a valid MySQL connection URL")
        .database(database_name);

    MySqlPool::connect_with(options)
        .await
        .expect("Failed to connect to database")
}

/// Apply embedded migrations on startup.
pub async fn run_migrations(pool: &MySqlPool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}
