use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::PlaylistSearchQuery;
use fpcomm_service::{GameCache, load_playlist};

use crate::CliError;

use super::games::log_game_line;
use super::{
    connect_catalog, db_error, log_page_footer, open_db, open_existing_db, runtime, truncate_str,
};

pub(crate) fn run_playlist_search(
    db: Option<&Path>,
    query: PlaylistSearchQuery,
) -> Result<(), CliError> {
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let page = fpcomm_db::search_playlists(&conn, &query)
        .map_err(db_error("Failed to search playlists"))?;

    if page.items.is_empty() {
        log::info!("{}", "No playlists found.".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }

    log::info!(
        "  {:>6}  {:<32} {:<16} {:>5}  {}",
        "ID",
        "Name",
        "Author",
        "Games",
        "Filters"
    );
    for p in &page.items {
        let filters = if p.extreme {
            format!("[extreme] {}", p.filter_groups.join(", "))
        } else {
            p.filter_groups.join(", ")
        };
        log::info!(
            "  {:>6}  {:<32} {:<16} {:>5}  {}",
            p.id,
            truncate_str(&p.name, 32),
            truncate_str(&p.author.username, 16),
            p.total_games,
            filters.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log_page_footer(page.items.len(), page.total, &query.page);
    Ok(())
}

/// Show a playlist with every entry resolved through the game cache.
pub(crate) fn run_playlist_show(db: Option<&Path>, id: i64, quiet: bool) -> Result<(), CliError> {
    let (mut conn, _) = open_db(db)?;
    let rt = runtime()?;

    let detail = rt.block_on(async {
        let catalog = connect_catalog(quiet).await?;
        let tx = conn
            .transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let detail = load_playlist(&GameCache::new(&tx, &catalog), id).await?;
        tx.commit().map_err(|e| CliError::database(e.to_string()))?;
        Ok::<_, CliError>(detail)
    })?;

    let Some(detail) = detail else {
        return Err(CliError::invalid_argument(format!("No playlist with id {}", id)));
    };
    let p = &detail.playlist;

    log::info!("{}", p.name.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Author:   {}", p.author.username);
    if !p.library.is_empty() {
        log::info!("  Library:  {}", p.library);
    }
    log::info!("  Public:   {}", if p.public { "yes" } else { "no" });
    if !p.filter_groups.is_empty() {
        log::info!("  Filters:  {}", p.filter_groups.join(", "));
    }
    if p.extreme {
        log::info!("  {}", "Extreme content".if_supports_color(Stdout, |t| t.red()));
    }
    log::info!(
        "  Created {}, updated {}",
        p.created_at.format("%Y-%m-%d"),
        p.updated_at.format("%Y-%m-%d")
    );
    if !p.description.is_empty() {
        crate::log_blank();
        log::info!("{}", p.description);
    }

    crate::log_blank();
    log::info!(
        "{}",
        format!("Games ({})", detail.games.len()).if_supports_color(Stdout, |t| t.bold())
    );
    for entry in &detail.games {
        log_game_line(&entry.game);
        if !entry.notes.is_empty() {
            log::info!("      {}", entry.notes.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
    Ok(())
}
