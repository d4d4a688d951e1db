//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fpcomm")]
#[command(about = "Operate the community site's game cache and content", long_about = None)]
pub(crate) struct Cli {
    /// Path to the site database (overrides FPCOMM_DATABASE and settings.toml)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pagination and ordering shared by the search commands.
#[derive(Args, Clone)]
pub(crate) struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i64).range(1..))]
    pub page_size: i64,

    /// Column to sort by (unknown columns are ignored)
    #[arg(long, default_value = "")]
    pub order_by: String,

    /// Sort direction: ascending or descending
    #[arg(long, default_value = "ascending")]
    pub direction: String,

    /// Also count all matching rows
    #[arg(long)]
    pub total: bool,
}

impl PageArgs {
    pub(crate) fn to_query(&self) -> fpcomm_model::PageQuery {
        fpcomm_model::PageQuery {
            page: self.page,
            page_size: self.page_size,
            order_by: self.order_by.clone(),
            order_direction: self.direction.clone(),
            include_total: self.total,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve one game through the cache
    Game {
        /// Game id
        id: String,
    },

    /// Resolve several games through the cache in one batch
    Games {
        /// Game ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List the content filter groups and their tags
    FilterGroups {
        /// Also print every tag in each group
        #[arg(long)]
        tags: bool,
    },

    /// Search and inspect playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },

    /// Search news posts
    News {
        #[command(subcommand)]
        action: NewsAction,
    },

    /// Search moderation reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Game of the day suggestions and assignments
    Gotd {
        #[command(subcommand)]
        action: GotdAction,
    },

    /// Inspect upstream catalog configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the site database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum PlaylistAction {
    /// Search playlists
    Search {
        /// Filter by author id
        #[arg(long, default_value = "")]
        author: String,

        /// Filter by library
        #[arg(long, default_value = "")]
        library: String,

        /// Match a substring of the playlist name
        #[arg(long, default_value = "")]
        title: String,

        /// Include playlists with extreme content
        #[arg(long)]
        extreme: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show a playlist with its games resolved
    Show {
        /// Playlist id
        id: i64,
    },
}

#[derive(Subcommand)]
pub(crate) enum NewsAction {
    /// Search news posts
    Search {
        /// Filter by author id
        #[arg(long, default_value = "")]
        author: String,

        /// Filter by post type
        #[arg(long, default_value = "")]
        post_type: String,

        /// Match a substring of the title
        #[arg(long, default_value = "")]
        title: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub(crate) enum ReportsAction {
    /// Search moderation reports
    Search {
        /// Match a substring of the reported content reference
        #[arg(long, default_value = "")]
        content: String,

        /// Filter by report state
        #[arg(long, default_value = "")]
        state: String,

        /// Filter by reporting user id
        #[arg(long, default_value = "")]
        reported_by: String,

        /// Filter by reported user id
        #[arg(long, default_value = "")]
        reported_user: String,

        /// Filter by resolving moderator id
        #[arg(long, default_value = "")]
        resolved_by: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub(crate) enum GotdAction {
    /// List suggestions with their games resolved
    Suggestions {
        #[command(flatten)]
        page: PageArgs,
    },

    /// List assigned games of the day
    Current {
        /// Include days that have not happened yet
        #[arg(long)]
        future: bool,
    },

    /// Assign a suggestion to a day
    Assign {
        /// Suggestion id
        suggestion: i64,

        /// Day in YYYY-MM-DD form
        date: String,
    },

    /// Remove the assignment for a day
    Unassign {
        /// Day in YYYY-MM-DD form
        date: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show upstream credentials and where each value comes from
    Show,

    /// Print the config file paths
    Path,
}

#[derive(Subcommand)]
pub(crate) enum DbAction {
    /// Create (or migrate) the database
    Init,

    /// Show row counts
    Stats,
}
