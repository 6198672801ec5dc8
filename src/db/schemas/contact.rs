//! Contact document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::Stamps;
use crate::repo::Record;

/// Collection name for contacts
pub const CONTACT_COLLECTION: &str = "contacts";

/// Contact document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ContactDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Owning user. Legacy documents may lack this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ObjectId>,

    /// Contact display name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Email address
    pub email: String,

    /// Free-form notes about the contact
    pub description: String,

    /// Creation and modification timestamps
    #[serde(flatten)]
    pub stamps: Stamps,
}

impl Record for ContactDoc {
    const COLLECTION: &'static str = CONTACT_COLLECTION;

    fn id(&self) -> Option<ObjectId> {
        self._id
    }

    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }

    fn stamps_mut(&mut self) -> &mut Stamps {
        &mut self.stamps
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "phone" => Some(self.phone.clone()),
            "email" => Some(self.email.clone()),
            "description" => Some(self.description.clone()),
            _ => None,
        }
    }
}

impl IntoIndexes for ContactDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user": 1 },
            Some(
                IndexOptions::builder()
                    .name("user_index".to_string())
                    .build(),
            ),
        )]
    }
}
