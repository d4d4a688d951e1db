//! Location of the site database.
//!
//! Priority: `--database` flag > `FPCOMM_DATABASE` env var >
//! `[database] path` in settings.toml > the platform data directory.

use std::path::{Path, PathBuf};

pub(crate) const ENV_DATABASE: &str = "FPCOMM_DATABASE";

/// Where the database path was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathSource {
    Flag,
    EnvVar,
    SettingsFile,
    Default,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--database"),
            Self::EnvVar => write!(f, "env ${}", ENV_DATABASE),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct SettingsFile {
    database: Option<DatabaseSettings>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DatabaseSettings {
    path: Option<PathBuf>,
}

/// Path to the CLI settings file.
pub(crate) fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fpcomm").join("settings.toml"))
}

/// Default database location when nothing else is configured.
pub(crate) fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fpcomm")
        .join("fpcomm.db")
}

/// Resolve the database path from the process environment.
pub(crate) fn database_path(flag: Option<&Path>) -> (PathBuf, PathSource) {
    let file = settings_path().and_then(|p| std::fs::read_to_string(p).ok());
    resolve_database_path(
        flag,
        std::env::var(ENV_DATABASE).ok(),
        file.as_deref(),
        default_database_path(),
    )
}

fn resolve_database_path(
    flag: Option<&Path>,
    env: Option<String>,
    settings: Option<&str>,
    default: PathBuf,
) -> (PathBuf, PathSource) {
    if let Some(path) = flag {
        return (path.to_path_buf(), PathSource::Flag);
    }
    if let Some(path) = env.filter(|v| !v.is_empty()) {
        return (PathBuf::from(path), PathSource::EnvVar);
    }
    if let Some(path) = settings.and_then(parse_settings) {
        return (path, PathSource::SettingsFile);
    }
    (default, PathSource::Default)
}

fn parse_settings(content: &str) -> Option<PathBuf> {
    match toml::from_str::<SettingsFile>(content) {
        Ok(file) => file.database.and_then(|d| d.path),
        Err(e) => {
            log::warn!("Ignoring malformed settings file: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = "[database]\npath = \"/srv/fpcomm/site.db\"\n";

    fn fallback() -> PathBuf {
        PathBuf::from("/data/fpcomm.db")
    }

    #[test]
    fn flag_wins() {
        let (path, source) = resolve_database_path(
            Some(Path::new("/tmp/flag.db")),
            Some("/tmp/env.db".to_string()),
            Some(SETTINGS),
            fallback(),
        );
        assert_eq!(path, PathBuf::from("/tmp/flag.db"));
        assert_eq!(source, PathSource::Flag);
    }

    #[test]
    fn env_beats_settings_file() {
        let env = Some("/tmp/env.db".to_string());
        let (path, source) = resolve_database_path(None, env, Some(SETTINGS), fallback());
        assert_eq!(path, PathBuf::from("/tmp/env.db"));
        assert_eq!(source, PathSource::EnvVar);
    }

    #[test]
    fn empty_env_is_ignored() {
        let (path, source) =
            resolve_database_path(None, Some(String::new()), Some(SETTINGS), fallback());
        assert_eq!(path, PathBuf::from("/srv/fpcomm/site.db"));
        assert_eq!(source, PathSource::SettingsFile);
    }

    #[test]
    fn falls_back_to_default() {
        let (path, source) = resolve_database_path(None, None, Some("[database]\n"), fallback());
        assert_eq!(path, fallback());
        assert_eq!(source, PathSource::Default);

        let (_, source) = resolve_database_path(None, None, Some("not = [toml"), fallback());
        assert_eq!(source, PathSource::Default);
    }
}
