// Database schema: table creation and migrations.
//
// A `schema_version` table tracks which migrations have run; each later
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// Idempotent; runs on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per authenticated user
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            email TEXT,
            username TEXT UNIQUE,
            full_name TEXT,
            bio TEXT,
            avatar_url TEXT,
            contact_email TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS social_accounts (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            platform TEXT NOT NULL,            -- instagram / tiktok / youtube
            handle TEXT NOT NULL,
            followers INTEGER NOT NULL,
            is_primary INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Flattened analysis results; list fields are JSON arrays
        CREATE TABLE IF NOT EXISTS engagement_analyses (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            social_account_id TEXT NOT NULL REFERENCES social_accounts(id),
            engagement_rate REAL NOT NULL,
            avg_likes INTEGER NOT NULL,
            avg_comments INTEGER NOT NULL,
            total_engagement INTEGER NOT NULL,
            quality TEXT NOT NULL,             -- poor / average / good / excellent
            insights TEXT NOT NULL,
            post_data TEXT NOT NULL,
            best_post TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS media_kits (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            social_account_id TEXT NOT NULL REFERENCES social_accounts(id),
            engagement_analysis_id TEXT,
            title TEXT NOT NULL,
            bio TEXT,
            top_posts TEXT NOT NULL,           -- JSON array of TopPost
            contact_email TEXT,
            engagement TEXT NOT NULL,          -- JSON EngagementSnapshot
            is_public INTEGER NOT NULL DEFAULT 1,
            view_count INTEGER NOT NULL DEFAULT 0,
            pdf_generated_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS media_kit_views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            media_kit_id TEXT NOT NULL REFERENCES media_kits(id),
            viewer_ip TEXT,
            user_agent TEXT,
            referrer TEXT,
            viewed_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_analyses_user
            ON engagement_analyses(user_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_kits_user
            ON media_kits(user_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_views_kit
            ON media_kit_views(media_kit_id);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: profile-completeness snapshot on media kits, so a kit
    // keeps the readiness context it was published with.
    run_migration(conn, 2, |c| {
        c.execute_batch("ALTER TABLE media_kits ADD COLUMN profile_completeness REAL;")
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
