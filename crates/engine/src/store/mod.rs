//! Document store seam.
//!
//! All persistent state lives in a remote document store, partitioned by user
//! namespace and named collection. The store enforces no schema; the engine
//! owns field-shape consistency.

use serde_json::Value;
use thiserror::Error;

mod memory;
mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

/// Collection names used by the engine inside a user namespace.
pub mod collections {
    pub const WALLETS: &str = "wallets";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BUDGETS: &str = "budgets";
    pub const CATEGORIES: &str = "categories";
}

/// A schemaless document: a store-assigned id plus arbitrary JSON fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Interface of the remote document store, per user namespace and collection.
///
/// Contract notes:
/// - `list_all` returns documents in insertion order.
/// - `delete` is idempotent: deleting an absent id is `Ok`.
pub trait DocumentStore {
    fn list_all(
        &self,
        namespace: &str,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>>;

    fn create(
        &self,
        namespace: &str,
        collection: &str,
        fields: Value,
    ) -> impl Future<Output = Result<String, StoreError>>;

    fn update(
        &self,
        namespace: &str,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn delete(
        &self,
        namespace: &str,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;
}

impl<S: DocumentStore> DocumentStore for &S {
    async fn list_all(&self, namespace: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).list_all(namespace, collection).await
    }

    async fn create(
        &self,
        namespace: &str,
        collection: &str,
        fields: Value,
    ) -> Result<String, StoreError> {
        (**self).create(namespace, collection, fields).await
    }

    async fn update(
        &self,
        namespace: &str,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<(), StoreError> {
        (**self).update(namespace, collection, id, fields).await
    }

    async fn delete(&self, namespace: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(namespace, collection, id).await
    }
}
