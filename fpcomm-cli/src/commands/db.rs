use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{db_error, open_db, open_existing_db};

/// Create the database or bring an older one up to date.
pub(crate) fn run_db_init(db: Option<&Path>) -> Result<(), CliError> {
    let (conn, path) = open_db(db)?;
    let version = fpcomm_db::schema::get_schema_version(&conn)
        .map_err(|e| CliError::database(format!("Failed to read schema version: {}", e)))?;

    log::info!(
        "{} Database ready at {} (schema v{})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
        version,
    );
    Ok(())
}

pub(crate) fn run_db_stats(db: Option<&Path>) -> Result<(), CliError> {
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let stats = fpcomm_db::cache_stats(&conn).map_err(db_error("Failed to query stats"))?;

    log::info!("{}", "Database Statistics".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log::info!("  Cached games:     {:>8}", stats.games);
    log::info!("  Tags:             {:>8}", stats.tags);
    log::info!("  Users:            {:>8}", stats.users);
    log::info!("  Playlists:        {:>8}", stats.playlists);
    log::info!("  News posts:       {:>8}", stats.news_posts);
    log::info!("  Reports:          {:>8}", stats.content_reports);
    log::info!("  Suggestions:      {:>8}", stats.gotd_suggestions);
    log::info!("  Days assigned:    {:>8}", stats.gotd_assigned);
    Ok(())
}
