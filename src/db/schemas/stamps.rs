//! Shared document timestamps

use serde::{Deserialize, Serialize};

/// Creation and modification timestamps, maintained by the repository on
/// create and save. Flattened into each document.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Stamps {
    /// When the document was created
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,

    /// When the document was last written
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl Stamps {
    /// Set both timestamps to now
    pub fn stamp_created(&mut self) {
        let now = bson::DateTime::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    /// Set the modification timestamp to now
    pub fn stamp_updated(&mut self) {
        self.updated_at = Some(bson::DateTime::now());
    }
}
