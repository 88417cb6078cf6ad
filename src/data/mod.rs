use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::{QueryResult, SqliteConnection};
use tokio::task::JoinError;

pub mod models;
pub mod repositories;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const INITIAL_SCHEMA: &str =
    include_str!("../../migrations/2024-01-01-000000_initial_schema/up.sql");

/// Per-connection pragmas. Every pooled connection waits on a locked
/// database instead of failing with SQLITE_BUSY, and enforces the
/// cascading foreign keys the schema relies on.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(
    database_url: &str,
    pool_size: u32,
    busy_timeout: Duration,
) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(pool_size)
        .connection_customizer(Box::new(ConnectionOptions { busy_timeout }))
        .build(manager)
}

/// Switches the database to WAL mode and applies the schema. Safe to run
/// on every startup.
pub fn run_migrations(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute("PRAGMA journal_mode = WAL;")?;
    conn.batch_execute(INITIAL_SCHEMA)
}

/// Runs blocking diesel work on tokio's blocking pool with a pooled connection.
pub async fn with_conn<T, E, F>(pool: &DbPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<r2d2::Error> + From<JoinError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut *conn)
    })
    .await?
}
