//! Protobuf parser for GTFS Realtime feeds.

use prost::Message;
use tracing::debug;

use crate::error::Result;
use crate::gtfs_rt::FeedMessage;

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// # Errors
///
/// Returns [`Error::Decode`](crate::Error::Decode) if the bytes are not valid
/// protobuf for a `FeedMessage`.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedMessage> {
    let feed = FeedMessage::decode(bytes)?;
    debug!(
        bytes = bytes.len(),
        entity_count = feed.entity.len(),
        "Feed decoded"
    );
    Ok(feed)
}
