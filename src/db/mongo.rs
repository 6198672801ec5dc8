//! MongoDB client and collection wrapper
//!
//! Typed collection handles that apply schema-declared indexes when they are
//! constructed, so uniqueness constraints live with the store rather than in
//! application pre-checks.

use bson::{doc, Document};
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::repo::RepoError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    /// Index keys and options to apply to the collection
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    db_name: String,
}

impl StoreClient {
    /// Connect to MongoDB and verify the connection with a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, RepoError> {
        info!("Connecting to MongoDB at {}", uri);

        // Bound server selection so startup fails fast when the store is
        // unreachable instead of hanging.
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| RepoError::Unavailable(format!("failed to connect: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Unavailable(format!("ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection with its indexes applied
    pub async fn collection<T>(&self, name: &str) -> Result<StoreCollection<T>, RepoError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        StoreCollection::new(&self.client, &self.db_name, name).await
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct StoreCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> StoreCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection handle and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, RepoError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let store_collection = StoreCollection { inner: collection };

        store_collection.apply_indexes().await?;

        Ok(store_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), RepoError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| RepoError::Unavailable(format!("failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Get the underlying collection
    pub fn inner(&self) -> &Collection<T> {
        &self.inner
    }
}
