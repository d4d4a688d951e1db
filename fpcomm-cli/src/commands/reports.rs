use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::{ContentReport, ContentReportSearchQuery};

use crate::CliError;

use super::{db_error, log_page_footer, open_existing_db, truncate_str};

pub(crate) fn run_reports_search(
    db: Option<&Path>,
    query: ContentReportSearchQuery,
) -> Result<(), CliError> {
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let page = fpcomm_db::search_content_reports(&conn, &query)
        .map_err(db_error("Failed to search reports"))?;

    if page.items.is_empty() {
        log::info!("{}", "No reports found.".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }

    for report in &page.items {
        log_report(report);
    }
    log_page_footer(page.items.len(), page.total, &query.page);
    Ok(())
}

fn log_report(report: &ContentReport) {
    log::info!(
        "  {:>5}  {:<10} {}",
        report.id,
        report.report_state.if_supports_color(Stdout, |t| t.cyan()),
        report.content_ref.if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "         reported by {} on {}: {}",
        report.reported_by,
        report.created_at.format("%Y-%m-%d"),
        truncate_str(&report.report_reason, 60),
    );
    if let Some(resolved_at) = report.resolved_at {
        log::info!(
            "         {}",
            format!(
                "resolved by {} on {} ({})",
                report.resolved_by,
                resolved_at.format("%Y-%m-%d"),
                report.action_taken
            )
            .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
