use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::GameCatalog;
use crate::credentials::Credentials;
use crate::error::UpstreamError;
use crate::types::{GamesFetchRequest, GamesFetchResponse, TokenResponse, UpstreamGame};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tokens this close to expiry are replaced before use.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn usable_at(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

/// HTTP client for the upstream catalog API.
pub struct CatalogClient {
    http: reqwest::Client,
    creds: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl CatalogClient {
    /// Create a client. No request is made until the first lookup.
    pub fn new(creds: Credentials) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            creds,
            token: Mutex::new(None),
        })
    }

    /// Create a client and fetch an access token, so bad credentials are
    /// reported immediately.
    pub async fn connect(creds: Credentials) -> Result<Self, UpstreamError> {
        let client = Self::new(creds)?;
        client.bearer().await?;
        Ok(client)
    }

    pub fn api_url(&self) -> &str {
        &self.creds.api_url
    }

    /// Current access token, refreshed when missing or about to expire.
    async fn bearer(&self) -> Result<String, UpstreamError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref() {
            if current.usable_at(Instant::now()) {
                return Ok(current.value.clone());
            }
            log::debug!("Access token expiring, refreshing");
        }

        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<AccessToken, UpstreamError> {
        log::debug!("Requesting access token from {}", self.creds.token_endpoint);

        let resp = self
            .http
            .post(&self.creds.token_endpoint)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.creds.scope.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Token(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&text)
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Token(format!("Failed to parse token response: {e}")))?;
        if !parsed.token_type.is_empty() && !parsed.token_type.eq_ignore_ascii_case("bearer") {
            log::warn!("Unexpected token type '{}'", parsed.token_type);
        }

        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: Instant::now() + Duration::from_secs(parsed.expires_in),
        })
    }
}

impl GameCatalog for CatalogClient {
    async fn get_game(&self, id: &str) -> Result<Option<UpstreamGame>, UpstreamError> {
        let url = game_url(&self.creds.api_url, id)?;
        let token = self.bearer().await?;
        log::debug!("Fetching game {} from catalog", id);

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: truncate(&text).to_string(),
            });
        }

        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn get_games(&self, ids: &[&str]) -> Result<Vec<UpstreamGame>, UpstreamError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let token = self.bearer().await?;
        log::debug!("Fetching {} games from catalog", ids.len());

        let resp = self
            .http
            .post(format!("{}/api/games/fetch", self.creds.api_url))
            .bearer_auth(token)
            .json(&GamesFetchRequest { game_ids: ids })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: truncate(&text).to_string(),
            });
        }

        let parsed: GamesFetchResponse = serde_json::from_str(&text)?;
        let unrequested = parsed
            .games
            .iter()
            .filter(|g| !ids.contains(&g.id.as_str()))
            .count();
        if unrequested > 0 {
            log::warn!("Catalog returned {} games that were not requested", unrequested);
        }
        Ok(parsed.games)
    }
}

/// `{api_url}/api/game/{id}` with the id percent-encoded as one path segment.
fn game_url(api_url: &str, id: &str) -> Result<reqwest::Url, UpstreamError> {
    let mut url = reqwest::Url::parse(api_url)
        .map_err(|e| UpstreamError::Config(format!("Invalid api_url '{}': {}", api_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| UpstreamError::Config(format!("api_url '{}' cannot hold a path", api_url)))?
        .pop_if_empty()
        .extend(["api", "game", id]);
    Ok(url)
}

/// Limit error bodies to something readable in a log line.
fn truncate(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usable_until_margin() {
        let now = Instant::now();
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(3600),
        };
        assert!(token.usable_at(now));
        assert!(token.usable_at(now + Duration::from_secs(3000)));
        assert!(!token.usable_at(now + Duration::from_secs(3540)));
        assert!(!token.usable_at(now + Duration::from_secs(4000)));
    }

    #[test]
    fn short_lived_token_is_never_reused() {
        let now = Instant::now();
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(!token.usable_at(now));
    }

    #[test]
    fn game_id_is_one_encoded_segment() {
        let url = game_url("https://catalog.example.org", "a/b?c#d").unwrap();
        assert_eq!(
            url.as_str(),
            "https://catalog.example.org/api/game/a%2Fb%3Fc%23d"
        );

        let nested = game_url("https://catalog.example.org/v2", "g1").unwrap();
        assert_eq!(nested.as_str(), "https://catalog.example.org/v2/api/game/g1");
    }

    #[test]
    fn unusable_api_url_is_config_error() {
        assert!(matches!(
            game_url("not a url", "g1"),
            Err(UpstreamError::Config(_))
        ));
        assert!(matches!(
            game_url("mailto:ops@example.org", "g1"),
            Err(UpstreamError::Config(_))
        ));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate(&long).chars().count(), 200);
        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let creds = Credentials {
            api_url: "http://127.0.0.1:9".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            scope: "identity".to_string(),
            token_endpoint: "http://127.0.0.1:9/token".to_string(),
        };
        let client = CatalogClient::new(creds).unwrap();
        assert!(client.get_games(&[]).await.unwrap().is_empty());
    }
}
