use fpcomm_db::OperationError;
use fpcomm_upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("Upstream catalog error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: &'static str, id: String },
}
