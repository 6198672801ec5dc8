//! Income document schema
//!
//! Income titles are unique across the collection. The constraint is a
//! unique index so concurrent writers cannot both slip past a pre-check.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::Stamps;
use crate::repo::Record;

/// Collection name for income entries
pub const INCOME_COLLECTION: &str = "income";

/// Income document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct IncomeDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Owning user. Legacy documents may lack this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ObjectId>,

    /// Amount of the income entry
    pub amount: f64,

    /// Title, unique across all income entries
    pub title: String,

    /// Free-form notes about the entry
    pub description: String,

    /// Creation and modification timestamps
    #[serde(flatten)]
    pub stamps: Stamps,
}

impl Record for IncomeDoc {
    const COLLECTION: &'static str = INCOME_COLLECTION;

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

    fn unique_fields() -> &'static [&'static str] {
        &["title"]
    }
}

impl IntoIndexes for IncomeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "title": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("title_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "user": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
