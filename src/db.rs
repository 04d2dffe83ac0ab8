use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

const MAX_CONNECTIONS: u32 = 20;
const MIN_CONNECTIONS: u32 = 2;

/// Establish a connection to the database with connection pooling.
///
/// Each connection to `sqlite::memory:` opens its own database, so in-memory
/// URLs get a single connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let in_memory = database_url.starts_with("sqlite::memory:");
    let (max, min) = if in_memory {
        (1, 1)
    } else {
        (MAX_CONNECTIONS, MIN_CONNECTIONS)
    };

    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    tracing::debug!(max_connections = max, in_memory, "Opening database pool");

    let db = Database::connect(opts).await?;
    Ok(db)
}
