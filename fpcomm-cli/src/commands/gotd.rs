use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::{GotdSuggestionSearchQuery, PageQuery};
use fpcomm_service::{GameCache, search_suggestions};

use crate::CliError;

use super::{
    connect_catalog, db_error, log_page_footer, open_db, open_existing_db, runtime, truncate_str,
};

/// List suggestions with their games resolved through the cache.
pub(crate) fn run_gotd_suggestions(
    db: Option<&Path>,
    page: PageQuery,
    quiet: bool,
) -> Result<(), CliError> {
    let (mut conn, _) = open_db(db)?;
    let rt = runtime()?;
    let query = GotdSuggestionSearchQuery { page };

    let results = rt.block_on(async {
        let catalog = connect_catalog(quiet).await?;
        let tx = conn
            .transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let results = search_suggestions(&GameCache::new(&tx, &catalog), &query).await?;
        tx.commit().map_err(|e| CliError::database(e.to_string()))?;
        Ok::<_, CliError>(results)
    })?;

    if results.items.is_empty() {
        log::info!("{}", "No suggestions.".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }

    for s in &results.items {
        let title = if s.game.missing {
            format!("{} (not found)", s.game.id)
        } else {
            s.game.title.clone()
        };
        let wanted = s
            .suggested_date
            .map(|d| format!(" for {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        log::info!(
            "  {:>5}  {}{}",
            s.id,
            truncate_str(&title, 48).if_supports_color(Stdout, |t| t.bold()),
            wanted.if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!(
            "         {} {}",
            format!("by {}:", s.display_author()).if_supports_color(Stdout, |t| t.dimmed()),
            truncate_str(&s.description, 60),
        );
    }
    log_page_footer(results.items.len(), results.total, &query.page);
    Ok(())
}

/// List assigned days, oldest first.
pub(crate) fn run_gotd_current(db: Option<&Path>, show_future: bool) -> Result<(), CliError> {
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let now = Utc::now();
    let games = fpcomm_db::list_gotd(&conn, show_future, now)
        .map_err(db_error("Failed to list games of the day"))?;

    if games.is_empty() {
        log::info!("{}", "Nothing assigned.".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }

    for g in &games {
        let day = g.assigned_date.format("%Y-%m-%d").to_string();
        let day = if g.assigned_date > now {
            format!("{} (upcoming)", day)
        } else {
            day
        };
        log::info!(
            "  {:<22} {} {}",
            day.if_supports_color(Stdout, |t| t.cyan()),
            g.game_id,
            format!("by {}", g.author).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

pub(crate) fn run_gotd_assign(
    db: Option<&Path>,
    suggestion: i64,
    date: &str,
) -> Result<(), CliError> {
    let day = parse_day(date)?;
    let (conn, _) = open_db(db)?;
    let gotd = fpcomm_service::assign_gotd(&conn, suggestion, day)?;

    log::info!(
        "{} Assigned {} to {} (credited to {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        gotd.game_id,
        gotd.assigned_date.format("%Y-%m-%d"),
        gotd.author,
    );
    Ok(())
}

pub(crate) fn run_gotd_unassign(db: Option<&Path>, date: &str) -> Result<(), CliError> {
    let day = parse_day(date)?;
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let removed =
        fpcomm_db::unassign_gotd(&conn, day).map_err(db_error("Failed to remove assignment"))?;

    if removed {
        log::info!(
            "{} Cleared {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            date
        );
    } else {
        log::warn!("Nothing was assigned to {}", date);
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` day into midnight UTC.
fn parse_day(s: &str) -> Result<DateTime<Utc>, CliError> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
        CliError::invalid_argument(format!("Bad date '{}': {} (expected YYYY-MM-DD)", s, e))
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::invalid_argument(format!("Bad date '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_day_as_utc_midnight() {
        let day = parse_day("2024-07-04").unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap());
        assert_eq!(parse_day(" 2024-07-04 ").unwrap(), day);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_day("07/04/2024").is_err());
        assert!(parse_day("2024-02-30").is_err());
        assert!(parse_day("").is_err());
    }
}
