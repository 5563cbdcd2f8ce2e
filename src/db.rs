use anyhow::{anyhow, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, instrument};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Embedded SQL migrations from the `migrations/` directory
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies the per-connection SQLite settings every time the pool opens a connection.
///
/// Foreign keys are off by default in SQLite, and the cascading deletes of
/// cars and assignments depend on them.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Creates a connection pool for the given SQLite database URL
pub fn init_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    Ok(pool)
}

/// Runs all pending embedded migrations against the pool's database
#[instrument(skip(pool))]
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let conn = &mut pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
    info!("Applied {} migrations", applied.len());
    Ok(())
}
