use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use fpcomm_db::{
    get_playlist, insert_gotd_suggestion, list_gotd, open_memory, upsert_game, upsert_user,
};
use fpcomm_model::*;
use fpcomm_service::{
    CacheError, GameCache, assign_gotd, get_suggestion, load_playlist, save_playlist,
    search_suggestions,
};
use fpcomm_upstream::{GameCatalog, UpstreamError, UpstreamGame, UpstreamTag};

struct StaticCatalog(HashMap<String, UpstreamGame>);

impl StaticCatalog {
    fn new(games: Vec<UpstreamGame>) -> Self {
        Self(games.into_iter().map(|g| (g.id.clone(), g)).collect())
    }
}

impl GameCatalog for StaticCatalog {
    async fn get_game(&self, id: &str) -> Result<Option<UpstreamGame>, UpstreamError> {
        Ok(self.0.get(id).cloned())
    }

    async fn get_games(&self, ids: &[&str]) -> Result<Vec<UpstreamGame>, UpstreamError> {
        Ok(ids.iter().filter_map(|id| self.0.get(*id).cloned()).collect())
    }
}

fn game_with_tags(id: &str, tags: &[&str]) -> UpstreamGame {
    UpstreamGame {
        id: id.to_string(),
        title: format!("Title {id}"),
        tags: tags
            .iter()
            .enumerate()
            .map(|(i, name)| UpstreamTag {
                id: i as i64 + 1,
                name: name.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn author(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        username: name.to_string(),
        avatar_url: String::new(),
        roles: Vec::new(),
        updated_at: Utc::now(),
    }
}

fn draft(games: &[&str]) -> Playlist {
    Playlist {
        id: 0,
        name: "Weekend".to_string(),
        description: String::new(),
        author: author("u1", "alice"),
        library: "arcade".to_string(),
        icon: String::new(),
        public: true,
        extreme: false,
        filter_groups: vec!["stale value".to_string()],
        total_games: 0,
        games: games
            .iter()
            .map(|id| PlaylistGame {
                game_id: id.to_string(),
                notes: format!("note for {id}"),
            })
            .collect(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── Playlists ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn saving_rolls_up_game_classification() {
    let conn = open_memory().unwrap();
    let catalog = StaticCatalog::new(vec![
        game_with_tags("g1", &["Seizure Warning"]),
        game_with_tags("g2", &["Gore", "Racism"]),
        game_with_tags("g3", &["Puzzle"]),
    ]);
    let cache = GameCache::new(&conn, &catalog);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let id = save_playlist(&cache, &draft(&["g1", "g2", "g3", "unknown"]), now)
        .await
        .unwrap();

    let stored = get_playlist(&conn, id).unwrap().unwrap();
    assert!(stored.extreme);
    assert_eq!(stored.filter_groups, vec!["Bigotry", "Seizure Warning", "Violence"]);
    assert_eq!(stored.total_games, 4);
    assert_eq!(stored.created_at, now);
    assert_eq!(stored.games.len(), 4);
    assert_eq!(stored.games[3].game_id, "unknown");
}

#[tokio::test]
async fn resaving_replaces_games_and_keeps_created_at() {
    let conn = open_memory().unwrap();
    let catalog = StaticCatalog::new(vec![
        game_with_tags("g1", &["Gore"]),
        game_with_tags("g2", &[]),
    ]);
    let cache = GameCache::new(&conn, &catalog);
    let first = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let id = save_playlist(&cache, &draft(&["g1"]), first).await.unwrap();

    let mut edited = get_playlist(&conn, id).unwrap().unwrap();
    edited.games = vec![PlaylistGame {
        game_id: "g2".to_string(),
        notes: String::new(),
    }];
    let later = first + Duration::days(3);
    assert_eq!(save_playlist(&cache, &edited, later).await.unwrap(), id);

    let stored = get_playlist(&conn, id).unwrap().unwrap();
    assert!(!stored.extreme);
    assert!(stored.filter_groups.is_empty());
    assert_eq!(stored.total_games, 1);
    assert_eq!(stored.created_at, first);
    assert_eq!(stored.updated_at, later);
}

#[tokio::test]
async fn loading_resolves_each_entry() {
    let conn = open_memory().unwrap();
    upsert_user(&conn, &author("u1", "alice")).unwrap();
    let catalog = StaticCatalog::new(vec![game_with_tags("g1", &[])]);
    let cache = GameCache::new(&conn, &catalog);
    let id = save_playlist(&cache, &draft(&["g1", "gone", "g1"]), Utc::now())
        .await
        .unwrap();

    let detail = load_playlist(&cache, id).await.unwrap().unwrap();
    assert_eq!(detail.playlist.author.username, "alice");
    let summary: Vec<(&str, &str, bool)> = detail
        .games
        .iter()
        .map(|g| (g.game_id.as_str(), g.notes.as_str(), g.game.missing))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("g1", "note for g1", false),
            ("gone", "note for gone", true),
            ("g1", "note for g1", false),
        ]
    );

    assert!(load_playlist(&cache, 999).await.unwrap().is_none());
}

// ── Game of the Day ─────────────────────────────────────────────────────────

fn suggestion(game_id: &str, author_id: &str, anonymous: bool) -> GotdSuggestionRow {
    GotdSuggestionRow {
        id: 0,
        game_id: game_id.to_string(),
        author_id: author_id.to_string(),
        anonymous,
        description: format!("Try {game_id}"),
        suggested_date: None,
        created_at: Utc::now(),
    }
}

#[test]
fn assignment_credits_author_unless_anonymous() {
    let conn = open_memory().unwrap();
    upsert_user(&conn, &author("u1", "alice")).unwrap();
    let named = insert_gotd_suggestion(&conn, &suggestion("g1", "u1", false)).unwrap();
    let hidden = insert_gotd_suggestion(&conn, &suggestion("g2", "u1", true)).unwrap();
    let orphan = insert_gotd_suggestion(&conn, &suggestion("g3", "u404", false)).unwrap();

    let day = |d| Utc.with_ymd_and_hms(2024, 7, d, 0, 0, 0).unwrap();
    assert_eq!(assign_gotd(&conn, named, day(1)).unwrap().author, "alice");
    assert_eq!(assign_gotd(&conn, hidden, day(2)).unwrap().author, ANONYMOUS_AUTHOR);
    assert_eq!(assign_gotd(&conn, orphan, day(3)).unwrap().author, DELETED_USER);

    let assigned = list_gotd(&conn, true, day(1)).unwrap();
    let games: Vec<&str> = assigned.iter().map(|g| g.game_id.as_str()).collect();
    assert_eq!(games, vec!["g1", "g2", "g3"]);
    assert_eq!(assigned[0].description, "Try g1");
}

#[test]
fn assigning_unknown_suggestion_fails() {
    let conn = open_memory().unwrap();
    let err = assign_gotd(&conn, 77, Utc::now()).unwrap_err();
    assert!(matches!(err, CacheError::NotFound { .. }));
}

#[tokio::test]
async fn suggestions_carry_resolved_games() {
    let conn = open_memory().unwrap();
    upsert_user(&conn, &author("u1", "alice")).unwrap();
    let cached = CachedGame {
        title: "Cached Title".to_string(),
        updated_at: Utc::now(),
        missing: false,
        ..CachedGame::missing("g1")
    };
    upsert_game(&conn, &cached).unwrap();
    let catalog = StaticCatalog::new(vec![game_with_tags("g2", &["Drugs"])]);
    let cache = GameCache::new(&conn, &catalog);

    let first = insert_gotd_suggestion(&conn, &suggestion("g1", "u1", true)).unwrap();
    insert_gotd_suggestion(&conn, &suggestion("g2", "u2", false)).unwrap();

    let query = GotdSuggestionSearchQuery {
        page: PageQuery {
            include_total: true,
            ..Default::default()
        },
    };
    let page = search_suggestions(&cache, &query).await.unwrap();
    assert_eq!(page.total, Some(2));
    assert_eq!(page.items[0].game.title, "Cached Title");
    assert_eq!(page.items[0].display_author(), ANONYMOUS_AUTHOR);
    assert_eq!(page.items[1].game.filter_groups, vec!["Otherwise Mature Topics"]);
    assert_eq!(page.items[1].author.username, DELETED_USER);

    let one = get_suggestion(&cache, first).await.unwrap().unwrap();
    assert_eq!(one.author.username, "alice");
    assert!(get_suggestion(&cache, 555).await.unwrap().is_none());
}
