//! In-memory repositories
//!
//! Store doubles used by the test suite and handy for local development
//! without a MongoDB instance. They keep insertion order and enforce the
//! same unique-field contract as the MongoDB implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::schemas::UserDoc;
use crate::repo::{Record, RecordRepository, RepoError, UserLookup};

/// In-memory repository for one record type
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

fn violates_unique<T: Record>(records: &[T], candidate: &T, skip_id: Option<ObjectId>) -> Option<String> {
    for field in T::unique_fields() {
        let Some(value) = candidate.field(field) else {
            continue;
        };
        let collides = records.iter().any(|existing| {
            existing.id() != skip_id && existing.field(field).as_deref() == Some(value.as_str())
        });
        if collides {
            return Some(field.to_string());
        }
    }
    None
}

#[async_trait]
impl<T: Record> RecordRepository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, RepoError> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == Some(oid)).cloned())
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Option<T>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.field(field).as_deref() == Some(value))
            .cloned())
    }

    async fn create(&self, mut record: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;

        if let Some(field) = violates_unique(&records, &record, None) {
            return Err(RepoError::Duplicate(field));
        }

        record.set_id(ObjectId::new());
        record.stamps_mut().stamp_created();
        records.push(record.clone());

        Ok(record)
    }

    async fn save(&self, mut record: T) -> Result<T, RepoError> {
        let id = record
            .id()
            .ok_or_else(|| RepoError::Unavailable("record has no id".to_string()))?;

        let mut records = self.records.write().await;

        if let Some(field) = violates_unique(&records, &record, Some(id)) {
            return Err(RepoError::Duplicate(field));
        }

        record.stamps_mut().stamp_updated();
        if let Some(existing) = records.iter_mut().find(|r| r.id() == Some(id)) {
            *existing = record.clone();
        }

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<Option<T>, RepoError> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let mut records = self.records.write().await;
        let position = records.iter().position(|r| r.id() == Some(oid));
        Ok(position.map(|i| records.remove(i)))
    }
}

/// In-memory user lookup backed by a fixed id-to-username map
#[derive(Debug, Default)]
pub struct MemoryUserLookup {
    users: HashMap<ObjectId, String>,
}

impl MemoryUserLookup {
    /// Create a lookup over the given users
    pub fn with_users(users: HashMap<ObjectId, String>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserLookup for MemoryUserLookup {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, RepoError> {
        Ok(self.users.get(id).map(|username| UserDoc {
            _id: Some(*id),
            username: username.clone(),
        }))
    }

    async fn usernames_for(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, String>, RepoError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|username| (*id, username.clone())))
            .collect())
    }
}
