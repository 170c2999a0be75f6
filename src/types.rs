//! Core types shared across the organizer.

/// ItemId: opaque identifier of an item, unique within one user's collection
pub type ItemId = String;

/// Timestamp: milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Generate a fresh item identifier
pub fn new_item_id() -> ItemId {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time as a [`Timestamp`]
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
