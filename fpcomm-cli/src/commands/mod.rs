pub(crate) mod config;
pub(crate) mod db;
pub(crate) mod filter_groups;
pub(crate) mod games;
pub(crate) mod gotd;
pub(crate) mod news;
pub(crate) mod playlist;
pub(crate) mod reports;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_db::Connection;
use fpcomm_upstream::{CatalogClient, Credentials};

use crate::CliError;
use crate::settings;
use crate::spinner::Spinner;

/// Open the database, creating it and its parent directory if needed.
pub(crate) fn open_db(flag: Option<&Path>) -> Result<(Connection, PathBuf), CliError> {
    let (path, source) = settings::database_path(flag);
    log::debug!("Using database {} ({})", path.display(), source);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = fpcomm_db::open_database(&path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok((conn, path))
}

/// Open the database only if it already exists.
///
/// Read-only commands use this so they never leave an empty file behind.
pub(crate) fn open_existing_db(flag: Option<&Path>) -> Result<Option<Connection>, CliError> {
    let (path, _) = settings::database_path(flag);
    if !path.exists() {
        log::warn!("No database found at {}", path.display());
        log::info!("Run 'fpcomm db init' to create one.");
        return Ok(None);
    }
    open_db(flag).map(|(conn, _)| Some(conn))
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to start async runtime: {}", e)))
}

/// Load credentials and authenticate against the upstream catalog.
pub(crate) async fn connect_catalog(quiet: bool) -> Result<CatalogClient, CliError> {
    let creds = Credentials::load().map_err(|e| {
        log::error!("Set FPCOMM_API_URL, FPCOMM_CLIENT_ID, FPCOMM_CLIENT_SECRET and");
        log::error!("FPCOMM_TOKEN_ENDPOINT, or add them to the config file.");
        log::error!("Run 'fpcomm config show' to see what is currently set.");
        CliError::config(e.to_string())
    })?;

    let spinner = Spinner::start("Connecting to catalog...", quiet);
    let result = CatalogClient::connect(creds).await;
    spinner.finish();

    let client = result.map_err(|e| CliError::catalog(format!("Failed to connect: {}", e)))?;
    log::debug!(
        "{} Connected to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        client.api_url()
    );
    Ok(client)
}

pub(crate) fn db_error(context: &str) -> impl Fn(fpcomm_db::OperationError) -> CliError + '_ {
    move |e| CliError::database(format!("{}: {}", context, e))
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}\u{2026}", kept)
}

/// Print the "N of M" footer for a search page.
pub(crate) fn log_page_footer(shown: usize, total: Option<i64>, page: &fpcomm_model::PageQuery) {
    crate::log_blank();
    match total {
        Some(total) => log::info!(
            "Showing {} of {} (page {}, {} per page)",
            shown,
            total,
            page.page.max(1),
            page.limit()
        ),
        None => log::info!("Showing {} (page {})", shown, page.page.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("site.db");

        assert!(open_existing_db(Some(&path)).unwrap().is_none());
        assert!(!path.exists());

        let (_, opened) = open_db(Some(&path)).unwrap();
        assert_eq!(opened, path);
        assert!(path.exists());
        assert!(open_existing_db(Some(&path)).unwrap().is_some());
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("Weekend", 10), "Weekend");
        assert_eq!(truncate_str("", 3), "");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate_str("Extremely Long Title", 8), "Extreme\u{2026}");
        assert_eq!(truncate_str("ééééé", 3).chars().count(), 3);
    }
}
