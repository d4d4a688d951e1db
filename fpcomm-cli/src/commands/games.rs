use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::CachedGame;
use fpcomm_service::GameCache;

use crate::CliError;

use super::{connect_catalog, open_db, runtime};

/// Resolve one game through the cache and print it.
pub(crate) fn run_game(db: Option<&Path>, id: &str, quiet: bool) -> Result<(), CliError> {
    let (mut conn, _) = open_db(db)?;
    let rt = runtime()?;

    let game = rt.block_on(async {
        let catalog = connect_catalog(quiet).await?;
        let tx = conn
            .transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let game = GameCache::new(&tx, &catalog).resolve(id).await?;
        tx.commit().map_err(|e| CliError::database(e.to_string()))?;
        Ok::<_, CliError>(game)
    })?;

    print_game(&game);
    Ok(())
}

/// Resolve several games in one batch and print a summary line for each.
pub(crate) fn run_games(db: Option<&Path>, ids: &[String], quiet: bool) -> Result<(), CliError> {
    let (mut conn, _) = open_db(db)?;
    let rt = runtime()?;

    let games = rt.block_on(async {
        let catalog = connect_catalog(quiet).await?;
        let tx = conn
            .transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let games = GameCache::new(&tx, &catalog).resolve_many(ids).await?;
        tx.commit().map_err(|e| CliError::database(e.to_string()))?;
        Ok::<_, CliError>(games)
    })?;

    let found = games.iter().filter(|g| !g.missing).count();
    for game in &games {
        log_game_line(game);
    }
    crate::log_blank();
    log::info!("{} of {} resolved", found, games.len());
    Ok(())
}

pub(crate) fn log_game_line(game: &CachedGame) {
    if game.missing {
        log::info!(
            "  {} {}",
            game.id.if_supports_color(Stdout, |t| t.dimmed()),
            "(not found)".if_supports_color(Stdout, |t| t.yellow()),
        );
        return;
    }
    let marker = if game.extreme { " [extreme]" } else { "" };
    log::info!(
        "  {} {}{}",
        game.id.if_supports_color(Stdout, |t| t.dimmed()),
        game.title.if_supports_color(Stdout, |t| t.bold()),
        marker.if_supports_color(Stdout, |t| t.red()),
    );
}

fn print_game(game: &CachedGame) {
    if game.missing {
        log::warn!("Game {} not found in cache or catalog", game.id);
        return;
    }

    log::info!("{}", game.title.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  ID:          {}", game.id);
    let fields = [
        ("Series", game.series.as_str()),
        ("Developer", game.developer.as_str()),
        ("Publisher", game.publisher.as_str()),
        ("Released", game.release_date.as_str()),
        ("Platform", game.platform.as_str()),
    ];
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        log::info!("  {:<12} {}", format!("{}:", label), value);
    }
    if !game.play_modes.is_empty() {
        log::info!("  Play modes:  {}", game.play_modes.join(", "));
    }
    if !game.languages.is_empty() {
        log::info!("  Languages:   {}", game.languages.join(", "));
    }
    if game.filter_groups.is_empty() {
        log::info!(
            "  Filters:     {}",
            "none".if_supports_color(Stdout, |t| t.dimmed())
        );
    } else {
        log::info!("  Filters:     {}", game.filter_groups.join(", "));
    }
    if game.extreme {
        log::info!(
            "  {}",
            "Extreme content".if_supports_color(Stdout, |t| t.red())
        );
    }
    log::info!(
        "  {}",
        format!("Cached {}", game.updated_at.format("%Y-%m-%d %H:%M UTC"))
            .if_supports_color(Stdout, |t| t.dimmed())
    );
    if !game.description.is_empty() {
        crate::log_blank();
        log::info!("{}", game.description);
    }
}
