//! MongoDB-backed repositories

use std::collections::HashMap;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures_util::StreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use crate::db::mongo::{IntoIndexes, StoreClient, StoreCollection};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::repo::{Record, RecordRepository, RepoError, UserLookup};

/// Duplicate-key writes come back as server error code 11000.
fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

fn map_write_err<T: Record>(err: MongoError) -> RepoError {
    if is_duplicate_key(&err) {
        let field = T::unique_fields().first().copied().unwrap_or("_id");
        RepoError::Duplicate(field.to_string())
    } else {
        RepoError::Unavailable(err.to_string())
    }
}

/// Repository over one MongoDB collection
#[derive(Clone)]
pub struct MongoRepository<T>
where
    T: Record + Serialize + DeserializeOwned + IntoIndexes,
{
    collection: StoreCollection<T>,
}

impl<T> MongoRepository<T>
where
    T: Record + Serialize + DeserializeOwned + IntoIndexes,
{
    /// Open the record type's collection, applying its indexes
    pub async fn new(client: &StoreClient) -> Result<Self, RepoError> {
        Ok(Self {
            collection: client.collection::<T>(T::COLLECTION).await?,
        })
    }
}

#[async_trait]
impl<T> RecordRepository<T> for MongoRepository<T>
where
    T: Record + Serialize + DeserializeOwned + IntoIndexes,
{
    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        let cursor = self
            .collection
            .inner()
            .find(doc! {})
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        let records: Vec<T> = cursor
            .filter_map(|record| async {
                match record {
                    Ok(r) => Some(r),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(records)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, RepoError> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        self.collection
            .inner()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Option<T>, RepoError> {
        let mut filter = bson::Document::new();
        filter.insert(field, value);

        self.collection
            .inner()
            .find_one(filter)
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))
    }

    async fn create(&self, mut record: T) -> Result<T, RepoError> {
        record.stamps_mut().stamp_created();

        let result = self
            .collection
            .inner()
            .insert_one(&record)
            .await
            .map_err(map_write_err::<T>)?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepoError::Unavailable("missing inserted id".to_string()))?;
        record.set_id(id);

        Ok(record)
    }

    async fn save(&self, mut record: T) -> Result<T, RepoError> {
        let id = record
            .id()
            .ok_or_else(|| RepoError::Unavailable("record has no id".to_string()))?;
        record.stamps_mut().stamp_updated();

        self.collection
            .inner()
            .replace_one(doc! { "_id": id }, &record)
            .await
            .map_err(map_write_err::<T>)?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<Option<T>, RepoError> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        self.collection
            .inner()
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))
    }
}

/// User lookup over the externally owned users collection
#[derive(Clone)]
pub struct MongoUserLookup {
    collection: StoreCollection<UserDoc>,
}

impl MongoUserLookup {
    /// Open the users collection
    pub async fn new(client: &StoreClient) -> Result<Self, RepoError> {
        Ok(Self {
            collection: client.collection::<UserDoc>(USER_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl UserLookup for MongoUserLookup {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, RepoError> {
        self.collection
            .inner()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))
    }

    async fn usernames_for(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, String>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self
            .collection
            .inner()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| RepoError::Unavailable(e.to_string()))?;

        let users: Vec<UserDoc> = cursor
            .filter_map(|user| async {
                match user {
                    Ok(u) => Some(u),
                    Err(e) => {
                        error!("Error reading user document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(users
            .into_iter()
            .filter_map(|u| u._id.map(|id| (id, u.username)))
            .collect())
    }
}
