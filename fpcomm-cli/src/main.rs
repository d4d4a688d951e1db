//! fpcomm CLI
//!
//! Operator tool for the community site's database: resolve games through
//! the cache, browse playlists, news and reports, and schedule the game of
//! the day.

mod cli_types;
mod commands;
mod error;
mod settings;
mod spinner;

use std::io::Write;

use clap::Parser;

use cli_types::{
    Cli, Commands, ConfigAction, DbAction, GotdAction, NewsAction, PlaylistAction, ReportsAction,
};
pub(crate) use error::CliError;

/// Emit an empty info line.
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logger(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "[{} {:<5}] {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.args()
                )
            } else if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
        })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = cli.database.as_deref();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Game { id } => commands::games::run_game(db, &id, quiet),
        Commands::Games { ids } => commands::games::run_games(db, &ids, quiet),
        Commands::FilterGroups { tags } => {
            commands::filter_groups::run_filter_groups(tags);
            Ok(())
        }
        Commands::Playlist { action } => match action {
            PlaylistAction::Search {
                author,
                library,
                title,
                extreme,
                page,
            } => commands::playlist::run_playlist_search(
                db,
                fpcomm_model::PlaylistSearchQuery {
                    author_id: author,
                    library,
                    title,
                    extreme,
                    page: page.to_query(),
                },
            ),
            PlaylistAction::Show { id } => commands::playlist::run_playlist_show(db, id, quiet),
        },
        Commands::News { action } => match action {
            NewsAction::Search {
                author,
                post_type,
                title,
                page,
            } => commands::news::run_news_search(
                db,
                fpcomm_model::NewsPostSearchQuery {
                    author_id: author,
                    post_type,
                    title,
                    page: page.to_query(),
                },
            ),
        },
        Commands::Reports { action } => match action {
            ReportsAction::Search {
                content,
                state,
                reported_by,
                reported_user,
                resolved_by,
                page,
            } => commands::reports::run_reports_search(
                db,
                fpcomm_model::ContentReportSearchQuery {
                    content_type: content,
                    report_state: state,
                    reported_by,
                    reported_user,
                    resolved_by,
                    page: page.to_query(),
                },
            ),
        },
        Commands::Gotd { action } => match action {
            GotdAction::Suggestions { page } => {
                commands::gotd::run_gotd_suggestions(db, page.to_query(), quiet)
            }
            GotdAction::Current { future } => commands::gotd::run_gotd_current(db, future),
            GotdAction::Assign { suggestion, date } => {
                commands::gotd::run_gotd_assign(db, suggestion, &date)
            }
            GotdAction::Unassign { date } => commands::gotd::run_gotd_unassign(db, &date),
        },
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::run_config_show(db),
                ConfigAction::Path => commands::config::run_config_path(),
            }
            Ok(())
        }
        Commands::Db { action } => match action {
            DbAction::Init => commands::db::run_db_init(db),
            DbAction::Stats => commands::db::run_db_stats(db),
        },
    }
}
