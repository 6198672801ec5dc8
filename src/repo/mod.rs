//! Persistence gateways
//!
//! Handlers talk to the store through the `RecordRepository` and `UserLookup`
//! traits so the MongoDB implementation can be swapped for the in-memory one
//! in tests and local development.

pub mod memory;
pub mod mongo;

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;

use crate::db::schemas::{Stamps, UserDoc};

pub use memory::{MemoryRepository, MemoryUserLookup};
pub use mongo::{MongoRepository, MongoUserLookup};

/// Errors surfaced by repository operations
#[derive(Error, Debug)]
pub enum RepoError {
    /// The store was unreachable or an operation failed
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write collided with an existing value of a unique field
    #[error("duplicate value for unique field '{0}'")]
    Duplicate(String),
}

/// A persisted record type
///
/// Implemented by each document schema so the repositories can stay generic.
pub trait Record: Clone + Send + Sync + Unpin + 'static {
    /// Collection name in the store
    const COLLECTION: &'static str;

    /// The store-assigned id, if the record has been persisted
    fn id(&self) -> Option<ObjectId>;

    /// Attach the store-assigned id
    fn set_id(&mut self, id: ObjectId);

    /// Mutable access to the record's timestamps
    fn stamps_mut(&mut self) -> &mut Stamps;

    /// String projection of a named field, used for field queries and
    /// uniqueness checks
    fn field(&self, name: &str) -> Option<String>;

    /// Fields that must be unique across the collection
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Persistence gateway for one record type
///
/// `create` assigns the id and both timestamps; `save` replaces the whole
/// record by id and refreshes the modification timestamp. Writes that violate
/// a unique field fail with [`RepoError::Duplicate`], except that a `save`
/// never collides with the record's own stored value. An id that does not
/// parse reads as absent.
#[async_trait]
pub trait RecordRepository<T: Record>: Send + Sync {
    /// Fetch every record in store order
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Fetch one record by id
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, RepoError>;

    /// Fetch one record by exact match on a named field
    async fn find_by_field(&self, field: &str, value: &str) -> Result<Option<T>, RepoError>;

    /// Persist a new record, returning it with id and timestamps set
    async fn create(&self, record: T) -> Result<T, RepoError>;

    /// Replace a persisted record by id
    async fn save(&self, record: T) -> Result<T, RepoError>;

    /// Delete a record by id, returning it when the store had it
    async fn delete(&self, id: &str) -> Result<Option<T>, RepoError>;
}

/// Read-only gateway to the externally owned users collection
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Resolve a user by id; an unknown id is `None`, not an error
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, RepoError>;

    /// Resolve display names for a set of user ids in one query
    async fn usernames_for(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, String>, RepoError>;
}
