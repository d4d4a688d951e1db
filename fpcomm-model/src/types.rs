//! Data model types for the community site.
//!
//! These types represent the persistent schema: cached game metadata, the tag
//! mirror, user profiles, playlists, news posts, content reports, and game of
//! the day suggestions/assignments.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Username shown for authors whose profile no longer exists.
pub const DELETED_USER: &str = "Deleted User";

/// Author name shown for anonymous game of the day suggestions.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

// ── Games ───────────────────────────────────────────────────────────────────

/// A game record mirrored from the upstream catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedGame {
    pub id: String,
    pub title: String,
    pub series: String,
    pub developer: String,
    pub publisher: String,
    pub release_date: String,
    pub play_modes: Vec<String>,
    pub languages: Vec<String>,
    pub description: String,
    pub platform: String,
    pub extreme: bool,
    /// Sorted, deduplicated filter group names.
    pub filter_groups: Vec<String>,
    pub updated_at: DateTime<Utc>,
    /// Set when neither the local cache nor the upstream catalog knows the id.
    /// Never persisted.
    #[serde(default)]
    pub missing: bool,
}

impl CachedGame {
    /// Placeholder for an id that could not be found anywhere.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            series: String::new(),
            developer: String::new(),
            publisher: String::new(),
            release_date: String::new(),
            play_modes: Vec::new(),
            languages: Vec::new(),
            description: String::new(),
            platform: String::new(),
            extreme: false,
            filter_groups: Vec::new(),
            updated_at: DateTime::<Utc>::MIN_UTC,
            missing: true,
        }
    }

    /// True when the record is older than `max_age` at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.updated_at > max_age
    }
}

/// Local mirror of an upstream tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTag {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

// ── Users ───────────────────────────────────────────────────────────────────

/// A community member profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub avatar_url: String,
    pub roles: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Stand-in profile for an author id with no stored profile.
    pub fn deleted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: DELETED_USER.to_string(),
            avatar_url: String::new(),
            roles: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

// ── Searching ───────────────────────────────────────────────────────────────

/// Pagination and ordering shared by every search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub order_by: String,
    #[serde(default)]
    pub order_direction: String,
    #[serde(default)]
    pub include_total: bool,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    50
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            order_by: String::new(),
            order_direction: String::new(),
            include_total: false,
        }
    }
}

impl PageQuery {
    /// Rows per page, never below 1.
    pub fn limit(&self) -> i64 {
        self.page_size.max(1)
    }

    /// Row offset of the first item on the requested page. Saturates instead
    /// of overflowing on absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }
}

/// One page of search results. `total` is only filled when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub total: Option<i64>,
}

// ── Playlists ───────────────────────────────────────────────────────────────

/// A game entry within a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistGame {
    pub game_id: String,
    #[serde(default)]
    pub notes: String,
}

/// A curated list of games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Zero for a playlist that has not been stored yet.
    pub id: i64,
    pub name: String,
    pub description: String,
    pub author: UserProfile,
    pub library: String,
    pub icon: String,
    pub public: bool,
    pub extreme: bool,
    pub filter_groups: Vec<String>,
    pub total_games: i64,
    #[serde(default)]
    pub games: Vec<PlaylistGame>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A playlist game entry together with its resolved metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistGameDetail {
    pub game_id: String,
    pub notes: String,
    pub game: CachedGame,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSearchQuery {
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub title: String,
    /// Include playlists containing extreme content.
    #[serde(default)]
    pub extreme: bool,
    #[serde(flatten)]
    pub page: PageQuery,
}

// ── News ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: i64,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub author: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPostSearchQuery {
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub post_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub page: PageQuery,
}

// ── Moderation ──────────────────────────────────────────────────────────────

/// A user-submitted report against a piece of content.
///
/// User references are plain ids; an empty string means "nobody".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReport {
    pub id: i64,
    pub content_ref: String,
    pub report_state: String,
    pub reported_by: String,
    pub report_reason: String,
    pub context: String,
    pub reported_user: String,
    pub resolved_by: String,
    pub resolved_at: Option<DateTime<Utc>>,
    pub action_taken: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReportSearchQuery {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub report_state: String,
    #[serde(default)]
    pub reported_by: String,
    #[serde(default)]
    pub reported_user: String,
    #[serde(default)]
    pub resolved_by: String,
    #[serde(flatten)]
    pub page: PageQuery,
}

// ── Game of the Day ─────────────────────────────────────────────────────────

/// A suggestion row as stored; the game is referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotdSuggestionRow {
    pub id: i64,
    pub game_id: String,
    pub author_id: String,
    pub anonymous: bool,
    pub description: String,
    pub suggested_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A suggestion with its game metadata and author profile resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotdSuggestion {
    pub id: i64,
    pub game: CachedGame,
    pub author: UserProfile,
    pub anonymous: bool,
    pub description: String,
    pub suggested_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GotdSuggestion {
    /// Name to credit publicly for this suggestion.
    pub fn display_author(&self) -> &str {
        if self.anonymous {
            ANONYMOUS_AUTHOR
        } else {
            &self.author.username
        }
    }
}

/// A game assigned to a specific day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotdGame {
    pub game_id: String,
    pub author: String,
    pub description: String,
    pub assigned_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotdSuggestionSearchQuery {
    #[serde(flatten)]
    pub page: PageQuery,
}
