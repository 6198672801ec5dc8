//! Document store access
//!
//! MongoDB client wrapper and the document schemas persisted through it.

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, StoreClient, StoreCollection};
