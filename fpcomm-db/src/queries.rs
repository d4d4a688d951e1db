//! Read queries: batch game lookup, paginated searches, and listing.
//!
//! Searches are composed with [`QueryBuilder`] so the data statement and its
//! count twin always share the same predicates.

use chrono::{DateTime, Utc};
use fpcomm_model::*;
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use crate::builder::QueryBuilder;
use crate::operations::{GAME_COLUMNS, OperationError, decode_list, row_to_game};

// ── Game Lookups ────────────────────────────────────────────────────────────

/// Load every cached game whose id is in `ids` with a single statement.
///
/// The ids are bound as one JSON array, so the batch size is not limited by
/// SQLite's parameter count. Duplicate ids are collapsed; row order is
/// unspecified.
pub fn games_by_ids<S: AsRef<str>>(
    conn: &Connection,
    ids: &[S],
) -> Result<Vec<CachedGame>, OperationError> {
    let unique = dedup_ids(ids);
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::new(format!("SELECT {GAME_COLUMNS} FROM game_cache"));
    builder.add_predicate(
        "id IN (SELECT value FROM json_each(?1))",
        [Value::Text(serde_json::to_string(&unique)?)],
    );

    let mut stmt = conn.prepare(&builder.build(0))?;
    let rows = stmt.query_map(params_from_iter(builder.arguments()), row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Ids in first-seen order with duplicates removed.
pub fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect()
}

// ── Shared Search Plumbing ──────────────────────────────────────────────────

/// Apply ordering and pagination to a search.
///
/// `columns` maps accepted client-facing sort names to the qualified column
/// to order by. The qualified columns form the builder's allow-list, so an
/// unknown name leaves the default order in place.
fn apply_page(
    builder: &mut QueryBuilder,
    page: &PageQuery,
    default_order: &str,
    columns: &[(&str, &str)],
) {
    builder.set_order(default_order, "ascending", &[default_order]);

    let allowed: Vec<&str> = columns.iter().map(|(_, column)| *column).collect();
    let column = columns
        .iter()
        .find(|(name, _)| *name == page.order_by)
        .map_or(page.order_by.as_str(), |(_, column)| *column);
    builder.set_order(column, &page.order_direction, &allowed);
    builder.set_limit(page.limit());
    builder.set_offset(page.offset());
}

/// Run the data statement and, when requested, its count twin.
fn run_search<T>(
    conn: &Connection,
    builder: &mut QueryBuilder,
    count_base: &str,
    include_total: bool,
    map: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> Result<SearchPage<T>, OperationError> {
    let mut stmt = conn.prepare(&builder.build(0))?;
    let rows = stmt.query_map(params_from_iter(builder.arguments()), map)?;
    let items = rows.collect::<Result<Vec<_>, _>>()?;

    let total = if include_total {
        builder.set_base(count_base);
        let count: i64 = conn.query_row(
            &builder.build_count(0),
            params_from_iter(builder.count_arguments()),
            |row| row.get(0),
        )?;
        Some(count)
    } else {
        None
    };

    Ok(SearchPage { items, total })
}

fn like_pattern(fragment: &str) -> Value {
    Value::Text(format!("%{fragment}%"))
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Map the trailing `user_profile` columns of a joined row, falling back to
/// the deleted-user stand-in when the join found nothing.
fn author_from_row(
    row: &rusqlite::Row<'_>,
    start: usize,
    author_id: &str,
) -> rusqlite::Result<UserProfile> {
    let id: Option<String> = row.get(start)?;
    match id {
        Some(id) => Ok(UserProfile {
            id,
            username: row.get(start + 1)?,
            avatar_url: row.get(start + 2)?,
            roles: decode_list(row, start + 3)?,
            updated_at: row.get(start + 4)?,
        }),
        None => Ok(UserProfile::deleted(author_id)),
    }
}

// ── Playlist Queries ────────────────────────────────────────────────────────

const PLAYLIST_SELECT: &str = "SELECT p.id, p.name, p.description, p.author_id, p.library,
        p.icon, p.public, p.extreme, p.filter_groups, p.total_games, p.created_at,
        p.updated_at, u.id, u.username, u.avatar_url, u.roles, u.updated_at
     FROM playlist p LEFT JOIN user_profile u ON u.id = p.author_id";

const PLAYLIST_ORDER_COLUMNS: &[(&str, &str)] = &[
    ("name", "p.name"),
    ("created_at", "p.created_at"),
    ("updated_at", "p.updated_at"),
    ("total_games", "p.total_games"),
];

/// Search playlists. Extreme playlists are hidden unless `query.extreme`.
///
/// Results carry no game entries; use [`get_playlist`] for those.
pub fn search_playlists(
    conn: &Connection,
    query: &PlaylistSearchQuery,
) -> Result<SearchPage<Playlist>, OperationError> {
    let mut builder = QueryBuilder::new(PLAYLIST_SELECT);
    if !query.author_id.is_empty() {
        builder.add_predicate("p.author_id = ?1", [text(&query.author_id)]);
    }
    if !query.library.is_empty() {
        builder.add_predicate("p.library = ?1", [text(&query.library)]);
    }
    if !query.title.is_empty() {
        builder.add_predicate("p.name LIKE ?1", [like_pattern(&query.title)]);
    }
    if !query.extreme {
        builder.add_predicate("p.extreme = 0", std::iter::empty());
    }
    apply_page(&mut builder, &query.page, "p.id", PLAYLIST_ORDER_COLUMNS);

    run_search(
        conn,
        &mut builder,
        "SELECT COUNT(*) FROM playlist p",
        query.page.include_total,
        row_to_playlist,
    )
}

/// Load a playlist with its game entries in order.
pub fn get_playlist(conn: &Connection, id: i64) -> Result<Option<Playlist>, OperationError> {
    let sql = format!("{PLAYLIST_SELECT} WHERE p.id = ?1");
    let result = conn.query_row(&sql, params![id], row_to_playlist);
    let mut playlist = match result {
        Ok(p) => p,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    playlist.games = playlist_games(conn, id)?;
    Ok(Some(playlist))
}

/// Game entries of a playlist in their stored order.
pub fn playlist_games(
    conn: &Connection,
    playlist_id: i64,
) -> Result<Vec<PlaylistGame>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT game_id, notes FROM playlist_game WHERE playlist_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![playlist_id], |row| {
        Ok(PlaylistGame {
            game_id: row.get(0)?,
            notes: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_playlist(row: &rusqlite::Row<'_>) -> rusqlite::Result<Playlist> {
    let author_id: String = row.get(3)?;
    Ok(Playlist {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        author: author_from_row(row, 12, &author_id)?,
        library: row.get(4)?,
        icon: row.get(5)?,
        public: row.get(6)?,
        extreme: row.get(7)?,
        filter_groups: decode_list(row, 8)?,
        total_games: row.get(9)?,
        games: Vec::new(),
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

// ── News Queries ────────────────────────────────────────────────────────────

const NEWS_SELECT: &str = "SELECT n.id, n.post_type, n.title, n.content, n.author_id,
        n.created_at, n.updated_at, u.id, u.username, u.avatar_url, u.roles, u.updated_at
     FROM news_post n LEFT JOIN user_profile u ON u.id = n.author_id";

const NEWS_ORDER_COLUMNS: &[(&str, &str)] = &[
    ("title", "n.title"),
    ("created_at", "n.created_at"),
    ("updated_at", "n.updated_at"),
];

pub fn search_news_posts(
    conn: &Connection,
    query: &NewsPostSearchQuery,
) -> Result<SearchPage<NewsPost>, OperationError> {
    let mut builder = QueryBuilder::new(NEWS_SELECT);
    if !query.author_id.is_empty() {
        builder.add_predicate("n.author_id = ?1", [text(&query.author_id)]);
    }
    if !query.post_type.is_empty() {
        builder.add_predicate("n.post_type = ?1", [text(&query.post_type)]);
    }
    if !query.title.is_empty() {
        builder.add_predicate("n.title LIKE ?1", [like_pattern(&query.title)]);
    }
    apply_page(&mut builder, &query.page, "n.id", NEWS_ORDER_COLUMNS);

    run_search(
        conn,
        &mut builder,
        "SELECT COUNT(*) FROM news_post n",
        query.page.include_total,
        row_to_news_post,
    )
}

pub fn get_news_post(conn: &Connection, id: i64) -> Result<Option<NewsPost>, OperationError> {
    let sql = format!("{NEWS_SELECT} WHERE n.id = ?1");
    match conn.query_row(&sql, params![id], row_to_news_post) {
        Ok(post) => Ok(Some(post)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_news_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<NewsPost> {
    let author_id: String = row.get(4)?;
    Ok(NewsPost {
        id: row.get(0)?,
        post_type: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        author: author_from_row(row, 7, &author_id)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ── Content Report Queries ──────────────────────────────────────────────────

const REPORT_ORDER_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("resolved_at", "resolved_at"),
];

/// Search moderation reports. `content_type` matches anywhere in the
/// content reference.
pub fn search_content_reports(
    conn: &Connection,
    query: &ContentReportSearchQuery,
) -> Result<SearchPage<ContentReport>, OperationError> {
    let mut builder = QueryBuilder::new(
        "SELECT id, content_ref, report_state, reported_by, report_reason, context,
                reported_user, resolved_by, resolved_at, action_taken, created_at, updated_at
         FROM content_report",
    );
    if !query.content_type.is_empty() {
        builder.add_predicate("content_ref LIKE ?1", [like_pattern(&query.content_type)]);
    }
    let exact = [
        ("report_state", &query.report_state),
        ("reported_by", &query.reported_by),
        ("reported_user", &query.reported_user),
        ("resolved_by", &query.resolved_by),
    ];
    for (column, value) in exact {
        if !value.is_empty() {
            builder.add_predicate(&format!("{column} = ?1"), [text(value)]);
        }
    }
    apply_page(&mut builder, &query.page, "id", REPORT_ORDER_COLUMNS);

    run_search(
        conn,
        &mut builder,
        "SELECT COUNT(*) FROM content_report",
        query.page.include_total,
        |row| {
            Ok(ContentReport {
                id: row.get(0)?,
                content_ref: row.get(1)?,
                report_state: row.get(2)?,
                reported_by: row.get(3)?,
                report_reason: row.get(4)?,
                context: row.get(5)?,
                reported_user: row.get(6)?,
                resolved_by: row.get(7)?,
                resolved_at: row.get(8)?,
                action_taken: row.get(9)?,
                created_at: row.get(10)?,
                updated_at: row.get(11)?,
            })
        },
    )
}

// ── Game of the Day Queries ─────────────────────────────────────────────────

const SUGGESTION_SELECT: &str = "SELECT id, game_id, author_id, anonymous, description,
        suggested_date, created_at
     FROM gotd_suggestion";

const SUGGESTION_ORDER_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("suggested_date", "suggested_date"),
];

pub fn search_gotd_suggestions(
    conn: &Connection,
    query: &GotdSuggestionSearchQuery,
) -> Result<SearchPage<GotdSuggestionRow>, OperationError> {
    let mut builder = QueryBuilder::new(SUGGESTION_SELECT);
    apply_page(&mut builder, &query.page, "id", SUGGESTION_ORDER_COLUMNS);

    run_search(
        conn,
        &mut builder,
        "SELECT COUNT(*) FROM gotd_suggestion",
        query.page.include_total,
        row_to_suggestion,
    )
}

pub fn get_gotd_suggestion(
    conn: &Connection,
    id: i64,
) -> Result<Option<GotdSuggestionRow>, OperationError> {
    let sql = format!("{SUGGESTION_SELECT} WHERE id = ?1");
    match conn.query_row(&sql, params![id], row_to_suggestion) {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_suggestion(row: &rusqlite::Row<'_>) -> rusqlite::Result<GotdSuggestionRow> {
    Ok(GotdSuggestionRow {
        id: row.get(0)?,
        game_id: row.get(1)?,
        author_id: row.get(2)?,
        anonymous: row.get(3)?,
        description: row.get(4)?,
        suggested_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Assigned games of the day, oldest first. Future assignments are only
/// included when `show_future` is set.
pub fn list_gotd(
    conn: &Connection,
    show_future: bool,
    now: DateTime<Utc>,
) -> Result<Vec<GotdGame>, OperationError> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(GotdGame {
            game_id: row.get(0)?,
            author: row.get(1)?,
            description: row.get(2)?,
            assigned_date: row.get(3)?,
        })
    };

    let rows = if show_future {
        let mut stmt = conn.prepare(
            "SELECT game_id, author, description, assigned_date FROM gotd
             ORDER BY assigned_date",
        )?;
        stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?
    } else {
        let mut stmt = conn.prepare(
            "SELECT game_id, author, description, assigned_date FROM gotd
             WHERE assigned_date <= ?1 ORDER BY assigned_date",
        )?;
        stmt.query_map(params![now], map)?.collect::<Result<Vec<_>, _>>()?
    };
    Ok(rows)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts for every stored entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub games: i64,
    pub tags: i64,
    pub users: i64,
    pub playlists: i64,
    pub news_posts: i64,
    pub content_reports: i64,
    pub gotd_suggestions: i64,
    pub gotd_assigned: i64,
}

pub fn cache_stats(conn: &Connection) -> Result<CacheStats, OperationError> {
    let count = |table: &str| -> Result<i64, OperationError> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(n)
    };

    Ok(CacheStats {
        games: count("game_cache")?,
        tags: count("tag_cache")?,
        users: count("user_profile")?,
        playlists: count("playlist")?,
        news_posts: count("news_post")?,
        content_reports: count("content_report")?,
        gotd_suggestions: count("gotd_suggestion")?,
        gotd_assigned: count("gotd")?,
    })
}
