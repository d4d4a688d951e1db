use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use fpcomm_upstream::{CredentialSource, Credentials};

use crate::settings;

fn mask_value(s: &str) -> String {
    match s.char_indices().nth(2) {
        Some((idx, _)) => format!("{}****", &s[..idx]),
        None => "****".to_string(),
    }
}

fn log_path(label: &str, path: Option<&Path>) {
    match path {
        Some(p) if p.exists() => log::info!(
            "  {} {} {}",
            label,
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        ),
        Some(p) => log::info!(
            "  {} {} {}",
            label,
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  {} {}",
            label,
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }
}

/// Show catalog credentials, the database location, and where each came from.
pub(crate) fn run_config_show(db: Option<&Path>) {
    let sources = fpcomm_upstream::credential_sources();
    let creds = Credentials::load().ok();

    log::info!("{}", "fpcomm Configuration".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log_path("Config file:  ", fpcomm_upstream::config_path().as_deref());
    log_path("Settings file:", settings::settings_path().as_deref());

    let (db_path, db_source) = settings::database_path(db);
    log::info!(
        "  Database:      {} {}",
        db_path.display(),
        format!("({})", db_source).if_supports_color(Stdout, |t| t.dimmed()),
    );
    crate::log_blank();

    let c = creds.as_ref();
    let fields: [(&str, &CredentialSource, Option<String>); 5] = [
        ("api_url", &sources.api_url, c.map(|c| c.api_url.clone())),
        ("client_id", &sources.client_id, c.map(|c| c.client_id.clone())),
        (
            "client_secret",
            &sources.client_secret,
            c.map(|c| mask_value(&c.client_secret)),
        ),
        ("scope", &sources.scope, c.map(|c| c.scope.clone())),
        (
            "token_endpoint",
            &sources.token_endpoint,
            c.map(|c| c.token_endpoint.clone()),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        let label = format!("{}:", name);
        match (source, value) {
            (CredentialSource::Missing, _) => log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            (_, Some(v)) => log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            // Set, but another required field is missing so nothing loaded.
            (_, None) => log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "set".if_supports_color(Stdout, |t| t.green()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

/// Print the config file paths.
pub(crate) fn run_config_path() {
    match fpcomm_upstream::config_path() {
        Some(p) => println!("{}", p.display()),
        None => log::error!("Could not determine config directory"),
    }
    if let Some(p) = settings::settings_path() {
        println!("{}", p.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_two_chars() {
        assert_eq!(mask_value("supersecret"), "su****");
        assert_eq!(mask_value("ab"), "****");
        assert_eq!(mask_value("ééé"), "éé****");
    }
}
