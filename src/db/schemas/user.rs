//! User document schema
//!
//! The users collection is owned by the account service; this backend only
//! reads it to resolve owner ids to display names. No indexes are declared
//! here.

use bson::Document;
use bson::oid::ObjectId;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// The slice of a user document consumed here. Unknown fields (credentials,
/// roles) are ignored on deserialization.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Display name
    pub username: String,
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        Vec::new()
    }
}
