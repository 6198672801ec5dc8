//! Application state
//!
//! The persistence gateways shared by all handlers. Repositories are injected
//! as trait objects so tests swap in the in-memory implementations.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::db::schemas::{ContactDoc, IncomeDoc, InfoDoc};
use crate::db::StoreClient;
use crate::repo::{
    MemoryRepository, MemoryUserLookup, MongoRepository, MongoUserLookup, RecordRepository,
    RepoError, UserLookup,
};

/// Shared handler state: one repository per record type plus the user lookup
#[derive(Clone)]
pub struct AppState {
    /// Contact records
    pub contacts: Arc<dyn RecordRepository<ContactDoc>>,
    /// Income records
    pub income: Arc<dyn RecordRepository<IncomeDoc>>,
    /// Info note records
    pub info: Arc<dyn RecordRepository<InfoDoc>>,
    /// Resolves owner ids to display names
    pub users: Arc<dyn UserLookup>,
}

impl AppState {
    /// Connect to MongoDB and open every collection
    pub async fn connect(config: &StoreConfig) -> Result<Self, RepoError> {
        let client = StoreClient::new(&config.uri, &config.db_name).await?;

        Ok(Self {
            contacts: Arc::new(MongoRepository::<ContactDoc>::new(&client).await?),
            income: Arc::new(MongoRepository::<IncomeDoc>::new(&client).await?),
            info: Arc::new(MongoRepository::<InfoDoc>::new(&client).await?),
            users: Arc::new(MongoUserLookup::new(&client).await?),
        })
    }

    /// State over empty in-memory stores, for tests and local development
    pub fn in_memory() -> Self {
        Self {
            contacts: Arc::new(MemoryRepository::<ContactDoc>::new()),
            income: Arc::new(MemoryRepository::<IncomeDoc>::new()),
            info: Arc::new(MemoryRepository::<InfoDoc>::new()),
            users: Arc::new(MemoryUserLookup::default()),
        }
    }
}
