//! Database utility functions.

use uuid::Uuid;

/// Generate a new entity identity: 128 random bits rendered as hyphenated hex.
pub fn generate_entity_id() -> String {
    Uuid::new_v4().to_string()
}
