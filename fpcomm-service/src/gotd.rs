//! Game of the day suggestions and assignments.

use chrono::{DateTime, Utc};
use fpcomm_db::{get_gotd_suggestion, search_gotd_suggestions, user_or_deleted};
use fpcomm_model::{
    ANONYMOUS_AUTHOR, CachedGame, GotdGame, GotdSuggestion, GotdSuggestionRow,
    GotdSuggestionSearchQuery, SearchPage,
};
use fpcomm_upstream::GameCatalog;
use rusqlite::Connection;

use crate::error::CacheError;
use crate::game_cache::GameCache;

/// Search suggestions, resolving all their games with one batch lookup.
pub async fn search_suggestions<C: GameCatalog>(
    cache: &GameCache<'_, C>,
    query: &GotdSuggestionSearchQuery,
) -> Result<SearchPage<GotdSuggestion>, CacheError> {
    let page = search_gotd_suggestions(cache.connection(), query)?;

    let ids: Vec<&str> = page.items.iter().map(|s| s.game_id.as_str()).collect();
    let games = cache.resolve_many(&ids).await?;

    let mut items = Vec::with_capacity(page.items.len());
    for (row, game) in page.items.into_iter().zip(games) {
        items.push(attach(cache.connection(), row, game)?);
    }
    Ok(SearchPage {
        items,
        total: page.total,
    })
}

/// Load one suggestion with its game and author.
pub async fn get_suggestion<C: GameCatalog>(
    cache: &GameCache<'_, C>,
    id: i64,
) -> Result<Option<GotdSuggestion>, CacheError> {
    let Some(row) = get_gotd_suggestion(cache.connection(), id)? else {
        return Ok(None);
    };
    let game = cache.resolve(&row.game_id).await?;
    Ok(Some(attach(cache.connection(), row, game)?))
}

/// Assign a suggestion's game to `date`, crediting its author unless the
/// suggestion was anonymous.
pub fn assign_gotd(
    conn: &Connection,
    suggestion_id: i64,
    date: DateTime<Utc>,
) -> Result<GotdGame, CacheError> {
    let row = get_gotd_suggestion(conn, suggestion_id)?.ok_or_else(|| CacheError::NotFound {
        entity_type: "suggestion",
        id: suggestion_id.to_string(),
    })?;

    let author = if row.anonymous {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        user_or_deleted(conn, &row.author_id)?.username
    };

    let gotd = GotdGame {
        game_id: row.game_id,
        author,
        description: row.description,
        assigned_date: date,
    };
    fpcomm_db::assign_gotd(conn, &gotd)?;
    log::debug!("Assigned {} as game of the day for {}", gotd.game_id, date);
    Ok(gotd)
}

fn attach(
    conn: &Connection,
    row: GotdSuggestionRow,
    game: CachedGame,
) -> Result<GotdSuggestion, CacheError> {
    Ok(GotdSuggestion {
        id: row.id,
        author: user_or_deleted(conn, &row.author_id)?,
        game,
        anonymous: row.anonymous,
        description: row.description,
        suggested_date: row.suggested_date,
        created_at: row.created_at,
    })
}
