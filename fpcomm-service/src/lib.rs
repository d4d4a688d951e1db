//! Orchestration between the local database and the upstream catalog.
//!
//! [`GameCache`] keeps mirrored game records fresh; the playlist and game of
//! the day flows build on it to attach resolved metadata to stored content.
//! Every function works against a caller-supplied connection, usually a
//! transaction, so a failed call can be rolled back as a whole.

pub mod error;
pub mod game_cache;
pub mod gotd;
pub mod playlists;
pub mod tag_cache;

pub use error::CacheError;
pub use game_cache::{DEFAULT_MAX_AGE_HOURS, GameCache};
pub use gotd::{assign_gotd, get_suggestion, search_suggestions};
pub use playlists::{PlaylistDetail, load_playlist, save_playlist};
pub use tag_cache::record_tags;
