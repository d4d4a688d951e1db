use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{Duration, Utc};
use fpcomm_db::{find_game, find_tag, open_memory, upsert_game};
use fpcomm_model::CachedGame;
use fpcomm_service::GameCache;
use fpcomm_upstream::{GameCatalog, UpstreamError, UpstreamGame, UpstreamTag};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    One(String),
    Many(Vec<String>),
}

#[derive(Default)]
struct FakeCatalog {
    games: HashMap<String, UpstreamGame>,
    calls: RefCell<Vec<Call>>,
    fail: bool,
}

impl FakeCatalog {
    fn with(games: Vec<UpstreamGame>) -> Self {
        Self {
            games: games.into_iter().map(|g| (g.id.clone(), g)).collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn check(&self) -> Result<(), UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Status {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl GameCatalog for FakeCatalog {
    async fn get_game(&self, id: &str) -> Result<Option<UpstreamGame>, UpstreamError> {
        self.calls.borrow_mut().push(Call::One(id.to_string()));
        self.check()?;
        Ok(self.games.get(id).cloned())
    }

    async fn get_games(&self, ids: &[&str]) -> Result<Vec<UpstreamGame>, UpstreamError> {
        self.calls
            .borrow_mut()
            .push(Call::Many(ids.iter().map(|s| s.to_string()).collect()));
        self.check()?;
        Ok(ids.iter().filter_map(|id| self.games.get(*id).cloned()).collect())
    }
}

fn tag(id: i64, name: &str) -> UpstreamTag {
    UpstreamTag {
        id,
        name: name.to_string(),
        description: String::new(),
        category: "content".to_string(),
    }
}

fn upstream(id: &str, title: &str, tags: Vec<UpstreamTag>) -> UpstreamGame {
    UpstreamGame {
        id: id.to_string(),
        title: title.to_string(),
        developer: "Studio".to_string(),
        play_mode: "Single Player; Multiplayer ".to_string(),
        language: "en;ja".to_string(),
        platform: "Flash".to_string(),
        tags,
        ..Default::default()
    }
}

fn cached(id: &str, title: &str, age: Duration) -> CachedGame {
    CachedGame {
        title: title.to_string(),
        updated_at: Utc::now() - age,
        missing: false,
        ..CachedGame::missing(id)
    }
}

fn ids(games: &[CachedGame]) -> Vec<(&str, bool)> {
    games.iter().map(|g| (g.id.as_str(), g.missing)).collect()
}

// ── Single lookups ──────────────────────────────────────────────────────────

#[tokio::test]
async fn new_game_is_classified_and_persisted() {
    let conn = open_memory().unwrap();
    let catalog = FakeCatalog::with(vec![upstream(
        "g1",
        "Blood Bath",
        vec![tag(1, "Gore"), tag(2, "Strong Violence"), tag(3, "Platformer")],
    )]);
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("g1").await.unwrap();
    assert!(!game.missing);
    assert!(game.extreme);
    assert_eq!(game.filter_groups, vec!["Violence"]);
    assert_eq!(game.play_modes, vec!["Single Player", "Multiplayer"]);
    assert_eq!(game.languages, vec!["en", "ja"]);

    let stored = find_game(&conn, "g1").unwrap().unwrap();
    assert!(stored.extreme);
    assert_eq!(stored.filter_groups, vec!["Violence"]);
    assert_eq!(catalog.calls(), vec![Call::One("g1".to_string())]);
}

#[tokio::test]
async fn every_tag_is_recorded() {
    let conn = open_memory().unwrap();
    let catalog = FakeCatalog::with(vec![upstream(
        "g1",
        "Puzzler",
        vec![tag(10, "Puzzle"), tag(11, "Seizure Warning")],
    )]);
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("g1").await.unwrap();
    assert!(!game.extreme);
    assert_eq!(game.filter_groups, vec!["Seizure Warning"]);
    assert_eq!(find_tag(&conn, 10).unwrap().unwrap().name, "Puzzle");
    assert_eq!(find_tag(&conn, 11).unwrap().unwrap().name, "Seizure Warning");
}

#[tokio::test]
async fn fresh_record_skips_upstream() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("g1", "Cached", Duration::hours(1))).unwrap();
    let catalog = FakeCatalog::with(vec![upstream("g1", "Upstream", vec![])]);
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("g1").await.unwrap();
    assert_eq!(game.title, "Cached");
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn stale_record_gone_upstream_is_deleted() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("g1", "Old", Duration::hours(48))).unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("g1").await.unwrap();
    assert!(game.missing);
    assert!(find_game(&conn, "g1").unwrap().is_none());
}

#[tokio::test]
async fn stale_record_is_refreshed_in_place() {
    let conn = open_memory().unwrap();
    let old = cached("g1", "Old", Duration::hours(48));
    upsert_game(&conn, &old).unwrap();
    let catalog = FakeCatalog::with(vec![upstream("g1", "New", vec![])]);
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("g1").await.unwrap();
    assert_eq!(game.title, "New");
    let stored = find_game(&conn, "g1").unwrap().unwrap();
    assert_eq!(stored.title, "New");
    assert!(stored.updated_at > old.updated_at);
}

#[tokio::test]
async fn unknown_everywhere_is_missing_and_not_stored() {
    let conn = open_memory().unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let game = cache.resolve("ghost").await.unwrap();
    assert!(game.missing);
    assert_eq!(game.id, "ghost");
    assert!(find_game(&conn, "ghost").unwrap().is_none());
}

#[tokio::test]
async fn custom_max_age() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("g1", "Old", Duration::hours(2))).unwrap();
    let catalog = FakeCatalog::with(vec![upstream("g1", "New", vec![])]);
    let cache = GameCache::new(&conn, &catalog).with_max_age(Duration::hours(1));

    assert_eq!(cache.resolve("g1").await.unwrap().title, "New");
}

// ── Batch lookups ───────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_keeps_order_with_missing_holes() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("a", "A", Duration::hours(1))).unwrap();
    upsert_game(&conn, &cached("c", "C", Duration::hours(2))).unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let games = cache.resolve_many(&["a", "b", "c"]).await.unwrap();
    assert_eq!(ids(&games), vec![("a", false), ("b", true), ("c", false)]);
    assert_eq!(catalog.calls(), vec![Call::Many(vec!["b".to_string()])]);
}

#[tokio::test]
async fn batch_of_fresh_records_makes_no_calls() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("a", "A", Duration::hours(1))).unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let games = cache.resolve_many(&["a", "a"]).await.unwrap();
    assert_eq!(ids(&games), vec![("a", false), ("a", false)]);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn stale_and_missing_are_fetched_separately() {
    let conn = open_memory().unwrap();
    upsert_game(&conn, &cached("old", "Old", Duration::hours(30))).unwrap();
    upsert_game(&conn, &cached("fresh", "Fresh", Duration::hours(3))).unwrap();
    let catalog = FakeCatalog::with(vec![
        upstream("old", "Old Refreshed", vec![tag(1, "Racism")]),
        upstream("new", "Brand New", vec![]),
    ]);
    let cache = GameCache::new(&conn, &catalog);

    let games = cache
        .resolve_many(&["new", "old", "fresh", "new"])
        .await
        .unwrap();
    let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Brand New", "Old Refreshed", "Fresh", "Brand New"]);
    assert_eq!(games[1].filter_groups, vec!["Bigotry"]);

    assert_eq!(
        catalog.calls(),
        vec![
            Call::Many(vec!["old".to_string()]),
            Call::Many(vec!["new".to_string()]),
        ]
    );
    assert_eq!(find_game(&conn, "new").unwrap().unwrap().title, "Brand New");
    assert!(find_game(&conn, "old").unwrap().unwrap().extreme);
}

#[tokio::test]
async fn batch_never_deletes_stale_records() {
    let conn = open_memory().unwrap();
    let old = cached("old", "Old", Duration::hours(30));
    upsert_game(&conn, &old).unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let games = cache.resolve_many(&["old"]).await.unwrap();
    assert!(!games[0].missing);
    assert_eq!(games[0].title, "Old");
    assert_eq!(find_game(&conn, "old").unwrap().unwrap().title, "Old");
}

#[tokio::test]
async fn empty_batch_is_empty() {
    let conn = open_memory().unwrap();
    let catalog = FakeCatalog::default();
    let cache = GameCache::new(&conn, &catalog);

    let none: [&str; 0] = [];
    assert!(cache.resolve_many(&none).await.unwrap().is_empty());
    assert!(catalog.calls().is_empty());
}

// ── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upstream_failure_rolls_back_transaction() {
    let mut conn = open_memory().unwrap();
    upsert_game(&conn, &cached("old", "Old", Duration::hours(30))).unwrap();

    let catalog = FakeCatalog {
        fail: true,
        ..FakeCatalog::with(vec![upstream("new", "New", vec![])])
    };
    {
        let tx = conn.transaction().unwrap();
        let cache = GameCache::new(&tx, &catalog);
        let err = cache.resolve_many(&["old", "new"]).await.unwrap_err();
        assert!(matches!(err, fpcomm_service::CacheError::Upstream(_)));
    }

    assert_eq!(find_game(&conn, "old").unwrap().unwrap().title, "Old");
    assert!(find_game(&conn, "new").unwrap().is_none());
}
