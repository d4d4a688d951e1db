//! Read-through cache of upstream game metadata.
//!
//! Records older than the maximum age are refreshed from the catalog on
//! access. A single-id lookup that finds a stale record gone upstream deletes
//! it; batch lookups never delete, they keep serving the stale copy.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use fpcomm_db::{delete_game, find_game, games_by_ids, upsert_game};
use fpcomm_model::{CachedGame, TagClassifier, split_delimited};
use fpcomm_upstream::{GameCatalog, UpstreamGame};
use rusqlite::Connection;

use crate::error::CacheError;
use crate::tag_cache::record_tags;

/// Age after which a cached record is refreshed.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// Per-call view over the game cache table and the upstream catalog.
pub struct GameCache<'a, C> {
    conn: &'a Connection,
    catalog: &'a C,
    classifier: &'a TagClassifier,
    max_age: Duration,
}

impl<'a, C: GameCatalog> GameCache<'a, C> {
    pub fn new(conn: &'a Connection, catalog: &'a C) -> Self {
        Self {
            conn,
            catalog,
            classifier: TagClassifier::builtin(),
            max_age: Duration::hours(DEFAULT_MAX_AGE_HOURS),
        }
    }

    pub fn with_classifier(mut self, classifier: &'a TagClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn connection(&self) -> &'a Connection {
        self.conn
    }

    /// Resolve one game id.
    ///
    /// Returns a placeholder with `missing` set when neither the cache nor
    /// the catalog knows the id.
    pub async fn resolve(&self, id: &str) -> Result<CachedGame, CacheError> {
        let now = Utc::now();

        let Some(cached) = find_game(self.conn, id)? else {
            log::debug!("Game {} not cached, fetching", id);
            return match self.catalog.get_game(id).await? {
                Some(upstream) => self.store(&upstream, now),
                None => Ok(CachedGame::missing(id)),
            };
        };

        if !cached.is_stale(now, self.max_age) {
            return Ok(cached);
        }

        log::debug!("Game {} is stale, refreshing", id);
        match self.catalog.get_game(id).await? {
            Some(upstream) => self.store(&upstream, now),
            None => {
                log::debug!("Game {} no longer exists upstream, dropping it", id);
                delete_game(self.conn, id)?;
                Ok(CachedGame::missing(id))
            }
        }
    }

    /// Resolve many ids at once, preserving input order and duplicates.
    ///
    /// Storage is read with one query. Stale records and uncached ids are
    /// each fetched with at most one batch request.
    pub async fn resolve_many<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<CachedGame>, CacheError> {
        let now = Utc::now();
        let mut slots: Vec<CachedGame> = ids
            .iter()
            .map(|id| CachedGame::missing(id.as_ref()))
            .collect();
        if slots.is_empty() {
            return Ok(slots);
        }

        let cached: HashMap<String, CachedGame> = games_by_ids(self.conn, ids)?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();
        for slot in slots.iter_mut() {
            if let Some(game) = cached.get(&slot.id) {
                *slot = game.clone();
            }
        }

        let stale = unique_ids(&slots, |g| !g.missing && g.is_stale(now, self.max_age));
        if !stale.is_empty() {
            log::debug!("Refreshing {} stale games", stale.len());
            self.fetch_into(&stale, &mut slots, now).await?;
        }

        let missing = unique_ids(&slots, |g| g.missing);
        if !missing.is_empty() {
            log::debug!("Fetching {} uncached games", missing.len());
            self.fetch_into(&missing, &mut slots, now).await?;
        }

        log::debug!(
            "Resolved {} ids ({} cached, {} refreshed, {} new)",
            ids.len(),
            cached.len(),
            stale.len(),
            missing.len()
        );
        Ok(slots)
    }

    /// Fetch `wanted` in one batch and write every hit into its slots.
    async fn fetch_into(
        &self,
        wanted: &[String],
        slots: &mut [CachedGame],
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let refs: Vec<&str> = wanted.iter().map(String::as_str).collect();
        for upstream in self.catalog.get_games(&refs).await? {
            if !refs.contains(&upstream.id.as_str()) {
                log::warn!("Ignoring unrequested game {} from catalog", upstream.id);
                continue;
            }
            let game = self.store(&upstream, now)?;
            for slot in slots.iter_mut().filter(|s| s.id == game.id) {
                *slot = game.clone();
            }
        }
        Ok(())
    }

    /// Classify an upstream record, record its tags, and persist it.
    fn store(&self, upstream: &UpstreamGame, now: DateTime<Utc>) -> Result<CachedGame, CacheError> {
        let game = to_cached(upstream, self.classifier, now);
        record_tags(self.conn, &upstream.tags, now)?;
        upsert_game(self.conn, &game)?;
        Ok(game)
    }
}

/// Ids of slots matching `pred`, deduplicated in first-seen order.
fn unique_ids(slots: &[CachedGame], pred: impl Fn(&CachedGame) -> bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for slot in slots.iter().filter(|s| pred(s)) {
        if !out.contains(&slot.id) {
            out.push(slot.id.clone());
        }
    }
    out
}

/// Convert an upstream record into its cached form.
pub fn to_cached(
    upstream: &UpstreamGame,
    classifier: &TagClassifier,
    now: DateTime<Utc>,
) -> CachedGame {
    let classification = classifier.classify(upstream.tag_names());
    CachedGame {
        id: upstream.id.clone(),
        title: upstream.title.clone(),
        series: upstream.series.clone(),
        developer: upstream.developer.clone(),
        publisher: upstream.publisher.clone(),
        release_date: upstream.release_date.clone(),
        play_modes: split_delimited(&upstream.play_mode),
        languages: split_delimited(&upstream.language),
        description: upstream.description.clone(),
        platform: upstream.platform.clone(),
        extreme: classification.extreme,
        filter_groups: classification.filter_groups,
        updated_at: now,
        missing: false,
    }
}
