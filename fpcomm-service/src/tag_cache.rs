//! Mirror of upstream tags.

use chrono::{DateTime, Utc};
use fpcomm_db::{OperationError, upsert_tag};
use fpcomm_model::CachedTag;
use fpcomm_upstream::UpstreamTag;
use rusqlite::Connection;

/// Refresh every tag seen on an upstream record, matched by a filter group
/// or not.
pub fn record_tags(
    conn: &Connection,
    tags: &[UpstreamTag],
    now: DateTime<Utc>,
) -> Result<(), OperationError> {
    for tag in tags {
        upsert_tag(
            conn,
            &CachedTag {
                id: tag.id,
                name: tag.name.clone(),
                description: tag.description.clone(),
                category: tag.category.clone(),
                updated_at: now,
            },
        )?;
    }
    Ok(())
}
