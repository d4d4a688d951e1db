//! Playlist save and load with resolved game metadata.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fpcomm_db::{get_playlist, replace_playlist_games, upsert_playlist};
use fpcomm_model::{Playlist, PlaylistGameDetail};
use fpcomm_upstream::GameCatalog;

use crate::error::CacheError;
use crate::game_cache::GameCache;

/// A stored playlist with every entry's game resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDetail {
    pub playlist: Playlist,
    pub games: Vec<PlaylistGameDetail>,
}

/// Store a playlist and its game list.
///
/// All games are resolved first so the playlist's `extreme` flag and filter
/// groups reflect its contents; whatever the caller set is replaced. A
/// playlist with id 0 is inserted. Returns the stored id.
pub async fn save_playlist<C: GameCatalog>(
    cache: &GameCache<'_, C>,
    playlist: &Playlist,
    now: DateTime<Utc>,
) -> Result<i64, CacheError> {
    let ids: Vec<&str> = playlist.games.iter().map(|g| g.game_id.as_str()).collect();
    let games = cache.resolve_many(&ids).await?;

    let extreme = games.iter().any(|g| g.extreme);
    let filter_groups: BTreeSet<String> = games
        .iter()
        .flat_map(|g| g.filter_groups.iter().cloned())
        .collect();

    let stored = Playlist {
        extreme,
        filter_groups: filter_groups.into_iter().collect(),
        total_games: playlist.games.len() as i64,
        created_at: if playlist.id == 0 { now } else { playlist.created_at },
        updated_at: now,
        ..playlist.clone()
    };

    let conn = cache.connection();
    let id = upsert_playlist(conn, &stored)?;
    replace_playlist_games(conn, id, &playlist.games)?;
    log::debug!(
        "Saved playlist {} with {} games (extreme: {})",
        id,
        stored.total_games,
        extreme
    );
    Ok(id)
}

/// Load a playlist and resolve each entry's game.
pub async fn load_playlist<C: GameCatalog>(
    cache: &GameCache<'_, C>,
    id: i64,
) -> Result<Option<PlaylistDetail>, CacheError> {
    let Some(playlist) = get_playlist(cache.connection(), id)? else {
        return Ok(None);
    };

    let ids: Vec<&str> = playlist.games.iter().map(|g| g.game_id.as_str()).collect();
    let resolved = cache.resolve_many(&ids).await?;
    let games = playlist
        .games
        .iter()
        .zip(resolved)
        .map(|(entry, game)| PlaylistGameDetail {
            game_id: entry.game_id.clone(),
            notes: entry.notes.clone(),
            game,
        })
        .collect();

    Ok(Some(PlaylistDetail { playlist, games }))
}
