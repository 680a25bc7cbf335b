//! Embedded schema migrations.
//!
//! Files live in `migrations/sqlite/` at the workspace root and are compiled
//! into the binary. Applied versions are tracked in `_sqlx_migrations`, so a
//! file must never change once it has shipped; add `NNN_description.sql`
//! instead.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(migrations = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}
