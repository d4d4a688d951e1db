use serde::{Deserialize, Serialize};

/// A game record as served by the catalog.
///
/// `play_mode` and `language` are semicolon-delimited lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamGame {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub play_mode: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, rename = "original_description")]
    pub description: String,
    #[serde(default, rename = "platform_name")]
    pub platform: String,
    #[serde(default)]
    pub tags: Vec<UpstreamTag>,
}

impl UpstreamGame {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamTag {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// Body of `POST /api/games/fetch`.
#[derive(Debug, Serialize)]
pub(crate) struct GamesFetchRequest<'a> {
    pub game_ids: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub(crate) struct GamesFetchResponse {
    #[serde(default)]
    pub games: Vec<UpstreamGame>,
}

/// Token endpoint response for the client-credentials grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_game() {
        let json = r#"{
            "id": "0a1b",
            "title": "Bloons Tower Defense",
            "series": "Bloons",
            "developer": "Ninja Kiwi",
            "publisher": "Ninja Kiwi",
            "release_date": "2007-08-01",
            "play_mode": "Single Player",
            "language": "en",
            "original_description": "Pop them all.",
            "platform_name": "Flash",
            "tags": [{"id": 3, "name": "Tower Defense", "description": "", "category": "genre"}]
        }"#;
        let game: UpstreamGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.platform, "Flash");
        assert_eq!(game.description, "Pop them all.");
        assert_eq!(game.tag_names().collect::<Vec<_>>(), vec!["Tower Defense"]);
    }

    #[test]
    fn missing_fields_default() {
        let game: UpstreamGame = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(game.id, "x");
        assert!(game.tags.is_empty());
        assert!(game.play_mode.is_empty());
    }

    #[test]
    fn fetch_request_shape() {
        let ids = ["a", "b"];
        let body = serde_json::to_value(GamesFetchRequest { game_ids: &ids }).unwrap();
        assert_eq!(body, serde_json::json!({"game_ids": ["a", "b"]}));
    }

    #[test]
    fn fetch_response_without_games() {
        let resp: GamesFetchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.games.is_empty());
    }
}
