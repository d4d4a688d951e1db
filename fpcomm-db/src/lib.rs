//! SQLite persistence layer for the community site.
//!
//! Provides schema creation, the search [`QueryBuilder`], CRUD operations,
//! and query APIs backed by SQLite (via rusqlite with bundled feature).

pub mod builder;
pub mod operations;
pub mod queries;
pub mod schema;

pub use builder::{QueryBuilder, SortDirection};
pub use operations::{
    OperationError, assign_gotd, delete_game, delete_gotd_suggestion, delete_playlist,
    find_game, find_tag, get_user, insert_content_report, insert_gotd_suggestion,
    insert_news_post, replace_playlist_games, unassign_gotd, upsert_game, upsert_playlist,
    upsert_tag, upsert_user, user_or_deleted,
};
pub use queries::{
    CacheStats, cache_stats, dedup_ids, games_by_ids, get_gotd_suggestion, get_news_post,
    get_playlist, list_gotd, playlist_games, search_content_reports, search_gotd_suggestions,
    search_news_posts, search_playlists,
};
pub use schema::{SchemaError, open_database, open_memory};
pub use rusqlite::Connection;
