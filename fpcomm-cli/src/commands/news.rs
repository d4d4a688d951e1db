use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_model::NewsPostSearchQuery;

use crate::CliError;

use super::{db_error, log_page_footer, open_existing_db, truncate_str};

pub(crate) fn run_news_search(
    db: Option<&Path>,
    query: NewsPostSearchQuery,
) -> Result<(), CliError> {
    let Some(conn) = open_existing_db(db)? else {
        return Ok(());
    };
    let page = fpcomm_db::search_news_posts(&conn, &query)
        .map_err(db_error("Failed to search news posts"))?;

    if page.items.is_empty() {
        log::info!("{}", "No news posts found.".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }

    for post in &page.items {
        log::info!(
            "  {:>5}  {}  {:<10} {} {}",
            post.id,
            post.created_at.format("%Y-%m-%d"),
            truncate_str(&post.post_type, 10),
            truncate_str(&post.title, 48).if_supports_color(Stdout, |t| t.bold()),
            format!("by {}", post.author.username).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log_page_footer(page.items.len(), page.total, &query.page);
    Ok(())
}
