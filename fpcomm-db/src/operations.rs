//! CRUD operations for every stored entity type.

use chrono::{DateTime, Utc};
use fpcomm_model::*;
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl OperationError {
    fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

// ── List Columns ────────────────────────────────────────────────────────────

/// Encode a string list for a JSON array column.
pub(crate) fn encode_list(list: &[String]) -> Result<String, OperationError> {
    Ok(serde_json::to_string(list)?)
}

/// Decode a JSON array column.
pub(crate) fn decode_list(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ── Game Cache Operations ───────────────────────────────────────────────────

pub(crate) const GAME_COLUMNS: &str = "id, title, series, developer, publisher, release_date,
     play_mode, language, description, platform_name, extreme, filter_groups, updated_at";

/// Insert or refresh a cached game.
///
/// Every field is overwritten except `updated_at`, which keeps the later of
/// the stored and incoming values.
pub fn upsert_game(conn: &Connection, game: &CachedGame) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO game_cache (id, title, series, developer, publisher, release_date,
             play_mode, language, description, platform_name, extreme, filter_groups, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             series = excluded.series,
             developer = excluded.developer,
             publisher = excluded.publisher,
             release_date = excluded.release_date,
             play_mode = excluded.play_mode,
             language = excluded.language,
             description = excluded.description,
             platform_name = excluded.platform_name,
             extreme = excluded.extreme,
             filter_groups = excluded.filter_groups,
             updated_at = MAX(game_cache.updated_at, excluded.updated_at)",
        params![
            game.id,
            game.title,
            game.series,
            game.developer,
            game.publisher,
            game.release_date,
            encode_list(&game.play_modes)?,
            encode_list(&game.languages)?,
            game.description,
            game.platform,
            game.extreme,
            encode_list(&game.filter_groups)?,
            game.updated_at,
        ],
    )?;
    Ok(())
}

/// Find a cached game by id.
pub fn find_game(conn: &Connection, id: &str) -> Result<Option<CachedGame>, OperationError> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM game_cache WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], row_to_game);
    match result {
        Ok(game) => Ok(Some(game)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a cached game. Returns whether a row was deleted.
pub fn delete_game(conn: &Connection, id: &str) -> Result<bool, OperationError> {
    let count = conn.execute("DELETE FROM game_cache WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub(crate) fn row_to_game(row: &rusqlite::Row<'_>) -> rusqlite::Result<CachedGame> {
    Ok(CachedGame {
        id: row.get(0)?,
        title: row.get(1)?,
        series: row.get(2)?,
        developer: row.get(3)?,
        publisher: row.get(4)?,
        release_date: row.get(5)?,
        play_modes: decode_list(row, 6)?,
        languages: decode_list(row, 7)?,
        description: row.get(8)?,
        platform: row.get(9)?,
        extreme: row.get(10)?,
        filter_groups: decode_list(row, 11)?,
        updated_at: row.get(12)?,
        missing: false,
    })
}

// ── Tag Operations ──────────────────────────────────────────────────────────

/// Insert or update a mirrored upstream tag.
pub fn upsert_tag(conn: &Connection, tag: &CachedTag) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO tag_cache (id, name, description, category, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             description = excluded.description,
             category = excluded.category,
             updated_at = excluded.updated_at",
        params![tag.id, tag.name, tag.description, tag.category, tag.updated_at],
    )?;
    Ok(())
}

pub fn find_tag(conn: &Connection, id: i64) -> Result<Option<CachedTag>, OperationError> {
    let result = conn.query_row(
        "SELECT id, name, description, category, updated_at FROM tag_cache WHERE id = ?1",
        params![id],
        |row| {
            Ok(CachedTag {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                category: row.get(3)?,
                updated_at: row.get(4)?,
            })
        },
    );
    match result {
        Ok(tag) => Ok(Some(tag)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── User Operations ─────────────────────────────────────────────────────────

pub fn upsert_user(conn: &Connection, user: &UserProfile) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO user_profile (id, username, avatar_url, roles, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             username = excluded.username,
             avatar_url = excluded.avatar_url,
             roles = excluded.roles,
             updated_at = excluded.updated_at",
        params![
            user.id,
            user.username,
            user.avatar_url,
            encode_list(&user.roles)?,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &str) -> Result<Option<UserProfile>, OperationError> {
    let result = conn.query_row(
        "SELECT id, username, avatar_url, roles, updated_at FROM user_profile WHERE id = ?1",
        params![id],
        |row| {
            Ok(UserProfile {
                id: row.get(0)?,
                username: row.get(1)?,
                avatar_url: row.get(2)?,
                roles: decode_list(row, 3)?,
                updated_at: row.get(4)?,
            })
        },
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Look up a profile, substituting a "Deleted User" stand-in when absent.
pub fn user_or_deleted(conn: &Connection, id: &str) -> Result<UserProfile, OperationError> {
    Ok(get_user(conn, id)?.unwrap_or_else(|| UserProfile::deleted(id)))
}

// ── Playlist Operations ─────────────────────────────────────────────────────

/// Insert a playlist (when `id` is 0) or update an existing one.
///
/// Returns the playlist id. `created_at` is never changed by an update.
pub fn upsert_playlist(conn: &Connection, playlist: &Playlist) -> Result<i64, OperationError> {
    let filter_groups = encode_list(&playlist.filter_groups)?;

    if playlist.id == 0 {
        conn.execute(
            "INSERT INTO playlist (name, description, author_id, library, icon, public,
                 extreme, filter_groups, total_games, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                playlist.name,
                playlist.description,
                playlist.author.id,
                playlist.library,
                playlist.icon,
                playlist.public,
                playlist.extreme,
                filter_groups,
                playlist.total_games,
                playlist.created_at,
                playlist.updated_at,
            ],
        )?;
        return Ok(conn.last_insert_rowid());
    }

    conn.execute(
        "INSERT INTO playlist (id, name, description, author_id, library, icon, public,
             extreme, filter_groups, total_games, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             description = excluded.description,
             author_id = excluded.author_id,
             library = excluded.library,
             icon = excluded.icon,
             public = excluded.public,
             extreme = excluded.extreme,
             filter_groups = excluded.filter_groups,
             total_games = excluded.total_games,
             updated_at = excluded.updated_at",
        params![
            playlist.id,
            playlist.name,
            playlist.description,
            playlist.author.id,
            playlist.library,
            playlist.icon,
            playlist.public,
            playlist.extreme,
            filter_groups,
            playlist.total_games,
            playlist.created_at,
            playlist.updated_at,
        ],
    )?;
    Ok(playlist.id)
}

/// Replace a playlist's game entries, keeping the given order, and update
/// its game count to match.
pub fn replace_playlist_games(
    conn: &Connection,
    playlist_id: i64,
    games: &[PlaylistGame],
) -> Result<(), OperationError> {
    conn.execute(
        "DELETE FROM playlist_game WHERE playlist_id = ?1",
        params![playlist_id],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO playlist_game (playlist_id, position, game_id, notes)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, entry) in games.iter().enumerate() {
        stmt.execute(params![playlist_id, position as i64, entry.game_id, entry.notes])?;
    }

    let updated = conn.execute(
        "UPDATE playlist SET total_games = ?2 WHERE id = ?1",
        params![playlist_id, games.len() as i64],
    )?;
    if updated == 0 {
        return Err(OperationError::not_found("playlist", playlist_id));
    }
    Ok(())
}

/// Delete a playlist and its game entries.
pub fn delete_playlist(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let count = conn.execute("DELETE FROM playlist WHERE id = ?1", params![id])?;
    if count == 0 {
        return Err(OperationError::not_found("playlist", id));
    }
    Ok(())
}

// ── News Operations ─────────────────────────────────────────────────────────

/// Store a news post under its author's id. Returns the generated id.
pub fn insert_news_post(conn: &Connection, post: &NewsPost) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO news_post (title, content, post_type, author_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            post.title,
            post.content,
            post.post_type,
            post.author.id,
            post.created_at,
            post.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Content Report Operations ───────────────────────────────────────────────

pub fn insert_content_report(
    conn: &Connection,
    report: &ContentReport,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO content_report (content_ref, report_state, reported_by, report_reason,
             context, reported_user, resolved_by, resolved_at, action_taken, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            report.content_ref,
            report.report_state,
            report.reported_by,
            report.report_reason,
            report.context,
            report.reported_user,
            report.resolved_by,
            report.resolved_at,
            report.action_taken,
            report.created_at,
            report.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Game of the Day Operations ──────────────────────────────────────────────

pub fn insert_gotd_suggestion(
    conn: &Connection,
    suggestion: &GotdSuggestionRow,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO gotd_suggestion (game_id, author_id, anonymous, description,
             suggested_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            suggestion.game_id,
            suggestion.author_id,
            suggestion.anonymous,
            suggestion.description,
            suggestion.suggested_date,
            suggestion.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_gotd_suggestion(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let count = conn.execute("DELETE FROM gotd_suggestion WHERE id = ?1", params![id])?;
    if count == 0 {
        return Err(OperationError::not_found("gotd_suggestion", id));
    }
    Ok(())
}

/// Assign a game to a day. An existing assignment for that day is replaced.
pub fn assign_gotd(conn: &Connection, gotd: &GotdGame) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO gotd (game_id, author, description, assigned_date)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(assigned_date) DO UPDATE SET
             game_id = excluded.game_id,
             author = excluded.author,
             description = excluded.description",
        params![gotd.game_id, gotd.author, gotd.description, gotd.assigned_date],
    )?;
    Ok(())
}

/// Remove the assignment for a day. Returns whether one existed.
pub fn unassign_gotd(conn: &Connection, date: DateTime<Utc>) -> Result<bool, OperationError> {
    let count = conn.execute("DELETE FROM gotd WHERE assigned_date = ?1", params![date])?;
    Ok(count > 0)
}
