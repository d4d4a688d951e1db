//! SQLite schema creation and migration.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent, safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a site database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        log::debug!("Creating schema v{} at {}", CURRENT_VERSION, path.display());
        create_schema(&conn)?;
    } else if version < CURRENT_VERSION {
        log::debug!("Migrating schema v{} -> v{}", version, CURRENT_VERSION);
        migrate(&conn, version)?;
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    let mut version = from_version;
    while version < CURRENT_VERSION {
        if version == 1 {
            // v1 stored classification on playlists only.
            conn.execute_batch(
                "ALTER TABLE game_cache ADD COLUMN extreme BOOLEAN NOT NULL DEFAULT 0;
                 ALTER TABLE game_cache ADD COLUMN filter_groups TEXT NOT NULL DEFAULT '[]';",
            )?;
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Game metadata mirrored from the upstream catalog.
-- List columns hold JSON arrays.
CREATE TABLE IF NOT EXISTS game_cache (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    series TEXT NOT NULL DEFAULT '',
    developer TEXT NOT NULL DEFAULT '',
    publisher TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL DEFAULT '',
    play_mode TEXT NOT NULL DEFAULT '[]',
    language TEXT NOT NULL DEFAULT '[]',
    description TEXT NOT NULL DEFAULT '',
    platform_name TEXT NOT NULL DEFAULT '',
    extreme BOOLEAN NOT NULL DEFAULT 0,
    filter_groups TEXT NOT NULL DEFAULT '[]',
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_game_cache_updated ON game_cache(updated_at);

-- Upstream tags seen on any cached game
CREATE TABLE IF NOT EXISTS tag_cache (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tag_cache_name ON tag_cache(name);

CREATE TABLE IF NOT EXISTS user_profile (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    avatar_url TEXT NOT NULL DEFAULT '',
    roles TEXT NOT NULL DEFAULT '[]',
    updated_at TEXT NOT NULL
);

-- Author ids are not foreign keys: content outlives its author's profile.
CREATE TABLE IF NOT EXISTS playlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    author_id TEXT NOT NULL,
    library TEXT NOT NULL DEFAULT '',
    icon TEXT NOT NULL DEFAULT '',
    public BOOLEAN NOT NULL DEFAULT 0,
    extreme BOOLEAN NOT NULL DEFAULT 0,
    filter_groups TEXT NOT NULL DEFAULT '[]',
    total_games INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_playlist_author ON playlist(author_id);

CREATE TABLE IF NOT EXISTS playlist_game (
    playlist_id INTEGER NOT NULL REFERENCES playlist(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    game_id TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (playlist_id, position)
);

CREATE TABLE IF NOT EXISTS news_post (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    post_type TEXT NOT NULL,
    author_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS content_report (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_ref TEXT NOT NULL,
    report_state TEXT NOT NULL,
    reported_by TEXT NOT NULL DEFAULT '',
    report_reason TEXT NOT NULL DEFAULT '',
    context TEXT NOT NULL DEFAULT '',
    reported_user TEXT NOT NULL DEFAULT '',
    resolved_by TEXT NOT NULL DEFAULT '',
    resolved_at TEXT,
    action_taken TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_content_report_state ON content_report(report_state);

CREATE TABLE IF NOT EXISTS gotd_suggestion (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id TEXT NOT NULL,
    author_id TEXT NOT NULL,
    anonymous BOOLEAN NOT NULL DEFAULT 0,
    description TEXT NOT NULL DEFAULT '',
    suggested_date TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS gotd (
    game_id TEXT NOT NULL,
    author TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    assigned_date TEXT NOT NULL UNIQUE
);
"#;
