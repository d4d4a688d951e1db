//! Client for the upstream game catalog.
//!
//! [`GameCatalog`] is the seam the game cache talks to; [`CatalogClient`] is
//! the HTTP implementation, authenticated with a client-credentials token.

pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::CatalogClient;
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, config_path, credential_sources,
};
pub use error::UpstreamError;
pub use types::{UpstreamGame, UpstreamTag};

/// Read access to the authoritative game catalog.
#[allow(async_fn_in_trait)]
pub trait GameCatalog {
    /// Fetch one game. `Ok(None)` when the catalog does not know the id.
    async fn get_game(&self, id: &str) -> Result<Option<UpstreamGame>, UpstreamError>;

    /// Fetch several games in one request. Unknown ids are silently omitted
    /// from the result.
    async fn get_games(&self, ids: &[&str]) -> Result<Vec<UpstreamGame>, UpstreamError>;
}
