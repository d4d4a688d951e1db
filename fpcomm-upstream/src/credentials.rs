use std::path::PathBuf;

use crate::error::UpstreamError;

const ENV_API_URL: &str = "FPCOMM_API_URL";
const ENV_CLIENT_ID: &str = "FPCOMM_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "FPCOMM_CLIENT_SECRET";
const ENV_CLIENT_SCOPE: &str = "FPCOMM_CLIENT_SCOPE";
const ENV_TOKEN_ENDPOINT: &str = "FPCOMM_TOKEN_ENDPOINT";

const DEFAULT_SCOPE: &str = "identity";

/// Client-credentials configuration for the upstream catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the catalog API, without a trailing slash.
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub token_endpoint: String,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub api_url: CredentialSource,
    pub client_id: CredentialSource,
    pub client_secret: CredentialSource,
    pub scope: CredentialSource,
    pub token_endpoint: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    upstream: Option<UpstreamConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct UpstreamConfig {
    api_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: Option<String>,
    token_endpoint: Option<String>,
}

impl UpstreamConfig {
    fn field(&self, env_var: &str) -> Option<&String> {
        match env_var {
            ENV_API_URL => self.api_url.as_ref(),
            ENV_CLIENT_ID => self.client_id.as_ref(),
            ENV_CLIENT_SECRET => self.client_secret.as_ref(),
            ENV_CLIENT_SCOPE => self.scope.as_ref(),
            ENV_TOKEN_ENDPOINT => self.token_endpoint.as_ref(),
            _ => None,
        }
    }
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file > default. Only the scope has a
    /// default; every other field is required.
    pub fn load() -> Result<Self, UpstreamError> {
        let config = load_config_file();
        Self::resolve(|var| std::env::var(var).ok(), config.as_ref())
    }

    fn resolve(
        env: impl Fn(&str) -> Option<String>,
        config: Option<&UpstreamConfig>,
    ) -> Result<Self, UpstreamError> {
        let lookup = |var: &str| {
            env(var)
                .filter(|v| !v.is_empty())
                .or_else(|| config.and_then(|c| c.field(var).cloned()))
        };
        let required = |var: &str, name: &str| {
            lookup(var).ok_or_else(|| {
                UpstreamError::Config(format!(
                    "Missing {name}. Set {var} env var or add it to the [upstream] table of the config file"
                ))
            })
        };

        let api_url = required(ENV_API_URL, "api_url")?
            .trim_end_matches('/')
            .to_string();
        let client_id = required(ENV_CLIENT_ID, "client_id")?;
        let client_secret = required(ENV_CLIENT_SECRET, "client_secret")?;
        let token_endpoint = required(ENV_TOKEN_ENDPOINT, "token_endpoint")?;
        let scope = lookup(ENV_CLIENT_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string());

        Ok(Self {
            api_url,
            client_id,
            client_secret,
            scope,
            token_endpoint,
        })
    }
}

/// Return the path to the upstream config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fpcomm").join("config.toml"))
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = load_config_file();
    sources_from(|var| std::env::var(var).ok(), config.as_ref())
}

fn sources_from(
    env: impl Fn(&str) -> Option<String>,
    config: Option<&UpstreamConfig>,
) -> CredentialSources {
    let source = |var: &'static str, has_default: bool| {
        if env(var).is_some_and(|v| !v.is_empty()) {
            CredentialSource::EnvVar(var)
        } else if config.and_then(|c| c.field(var)).is_some() {
            CredentialSource::ConfigFile
        } else if has_default {
            CredentialSource::Default
        } else {
            CredentialSource::Missing
        }
    };

    CredentialSources {
        api_url: source(ENV_API_URL, false),
        client_id: source(ENV_CLIENT_ID, false),
        client_secret: source(ENV_CLIENT_SECRET, false),
        scope: source(ENV_CLIENT_SCOPE, true),
        token_endpoint: source(ENV_TOKEN_ENDPOINT, false),
    }
}

fn load_config_file() -> Option<UpstreamConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<UpstreamConfig> {
    match toml::from_str::<ConfigFile>(content) {
        Ok(config) => config.upstream,
        Err(e) => {
            log::warn!("Ignoring malformed upstream config: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    const FILE: &str = r#"
[upstream]
api_url = "https://catalog.example.org/"
client_id = "file-id"
client_secret = "file-secret"
token_endpoint = "https://auth.example.org/token"
"#;

    #[test]
    fn loads_from_config_file() {
        let config = parse_config(FILE);
        let creds = Credentials::resolve(env_of(&[]), config.as_ref()).unwrap();
        assert_eq!(creds.api_url, "https://catalog.example.org");
        assert_eq!(creds.client_id, "file-id");
        assert_eq!(creds.scope, DEFAULT_SCOPE);
    }

    #[test]
    fn env_overrides_config_file() {
        let config = parse_config(FILE);
        let env = env_of(&[(ENV_CLIENT_ID, "env-id"), (ENV_CLIENT_SCOPE, "catalog")]);
        let creds = Credentials::resolve(env, config.as_ref()).unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.client_secret, "file-secret");
        assert_eq!(creds.scope, "catalog");
    }

    #[test]
    fn missing_required_field_is_config_error() {
        let env = env_of(&[(ENV_API_URL, "https://catalog.example.org")]);
        let err = Credentials::resolve(env, None).unwrap_err();
        match err {
            UpstreamError::Config(msg) => assert!(msg.contains(ENV_CLIENT_ID)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_file_is_ignored() {
        assert!(parse_config("[upstream\nnot toml").is_none());
        assert!(parse_config("").is_none());
    }

    #[test]
    fn reports_sources() {
        let config = parse_config(FILE);
        let sources = sources_from(env_of(&[(ENV_API_URL, "x")]), config.as_ref());
        assert_eq!(sources.api_url, CredentialSource::EnvVar(ENV_API_URL));
        assert_eq!(sources.client_id, CredentialSource::ConfigFile);
        assert_eq!(sources.scope, CredentialSource::Default);

        let bare = sources_from(env_of(&[]), None);
        assert_eq!(bare.token_endpoint, CredentialSource::Missing);
    }
}
