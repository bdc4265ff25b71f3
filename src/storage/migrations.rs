//! Database migrations

use rusqlite::Connection;

use crate::error::{QuizError, Result};

const MIGRATIONS: [&str; 2] = [
    include_str!("../../migrations/001_initial_schema.sql"),
    include_str!("../../migrations/002_unique_course_keys.sql"),
];

pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Run all pending migrations, tracking progress in `PRAGMA user_version`.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| QuizError::Migration {
            version: 0,
            reason: err.to_string(),
        })?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let target_version = (idx + 1) as u32;
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql).map_err(|err| QuizError::Migration {
            version: target_version,
            reason: err.to_string(),
        })?;
        conn.pragma_update(None, "user_version", target_version)
            .map_err(|err| QuizError::Migration {
                version: target_version,
                reason: format!("failed to set user_version: {err}"),
            })?;
        tracing::debug!(version = target_version, "applied migration");
    }

    Ok(SCHEMA_VERSION)
}
