use chrono::{Duration, Utc};
use fpcomm_model::*;

#[test]
fn page_offset() {
    let page = PageQuery {
        page: 3,
        page_size: 20,
        ..Default::default()
    };
    assert_eq!(page.offset(), 40);

    let first = PageQuery {
        page: 0,
        page_size: 20,
        ..Default::default()
    };
    assert_eq!(first.offset(), 0);
}

#[test]
fn page_extremes_do_not_overflow() {
    let far = PageQuery {
        page: i64::MAX,
        page_size: 50,
        ..Default::default()
    };
    assert_eq!(far.offset(), i64::MAX);

    let negative = PageQuery {
        page: 2,
        page_size: -1,
        ..Default::default()
    };
    assert_eq!(negative.limit(), 1);
    assert_eq!(negative.offset(), 1);

    let zero = PageQuery {
        page_size: 0,
        ..Default::default()
    };
    assert_eq!(zero.limit(), 1);
}

#[test]
fn missing_placeholder() {
    let game = CachedGame::missing("abc");
    assert!(game.missing);
    assert_eq!(game.id, "abc");
    assert!(game.filter_groups.is_empty());
}

#[test]
fn staleness_window() {
    let now = Utc::now();
    let mut game = CachedGame::missing("abc");
    game.missing = false;

    game.updated_at = now - Duration::hours(23);
    assert!(!game.is_stale(now, Duration::hours(24)));

    game.updated_at = now - Duration::hours(24);
    assert!(!game.is_stale(now, Duration::hours(24)));

    game.updated_at = now - Duration::hours(25);
    assert!(game.is_stale(now, Duration::hours(24)));
}

#[test]
fn missing_flag_defaults_when_deserializing() {
    let json = r#"{
        "id": "g1",
        "title": "Alien Hominid",
        "series": "",
        "developer": "The Behemoth",
        "publisher": "Newgrounds",
        "release_date": "2002-08-07",
        "play_modes": ["Single Player"],
        "languages": ["en"],
        "description": "",
        "platform": "Flash",
        "extreme": false,
        "filter_groups": [],
        "updated_at": "2024-01-01T00:00:00Z"
    }"#;
    let game: CachedGame = serde_json::from_str(json).unwrap();
    assert!(!game.missing);
    assert_eq!(game.play_modes, vec!["Single Player"]);
}

#[test]
fn anonymous_suggestion_hides_author() {
    let mut suggestion = GotdSuggestion {
        id: 1,
        game: CachedGame::missing("g1"),
        author: UserProfile::deleted("u1"),
        anonymous: true,
        description: String::new(),
        suggested_date: None,
        created_at: Utc::now(),
    };
    suggestion.author.username = "tester".to_string();
    assert_eq!(suggestion.display_author(), ANONYMOUS_AUTHOR);

    suggestion.anonymous = false;
    assert_eq!(suggestion.display_author(), "tester");
}
