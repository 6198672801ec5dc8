//! Info note document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::Stamps;
use crate::repo::Record;

/// Collection name for info notes
pub const INFO_COLLECTION: &str = "info";

/// Info note document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct InfoDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Owning user. Legacy documents may lack this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ObjectId>,

    /// Note title
    pub title: String,

    /// Note body
    pub description: String,

    /// Creation and modification timestamps
    #[serde(flatten)]
    pub stamps: Stamps,
}

impl Record for InfoDoc {
    const COLLECTION: &'static str = INFO_COLLECTION;

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
            "title" => Some(self.title.clone()),
            "description" => Some(self.description.clone()),
            _ => None,
        }
    }
}

impl IntoIndexes for InfoDoc {
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
