//! In-process document store used by tests and the memory database mode.

use std::{
    collections::HashMap,
    sync::Mutex,
    sync::atomic::{AtomicBool, Ordering},
};

use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

/// A `DocumentStore` kept entirely in memory.
///
/// Documents are listed in insertion order. `fail_writes` makes every
/// subsequent write return [`StoreError::Unavailable`], which lets tests
/// exercise the write-failure path without a real remote store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<(String, String), Vec<Document>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write after this call fail (reads stay available).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Vec<Document>>> {
        match self.scopes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn list_all(&self, namespace: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        let scopes = self.lock();
        Ok(scopes
            .get(&(namespace.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create(
        &self,
        namespace: &str,
        collection: &str,
        fields: Value,
    ) -> Result<String, StoreError> {
        self.check_writable()?;
        let id = Uuid::new_v4().to_string();
        let mut scopes = self.lock();
        scopes
            .entry((namespace.to_string(), collection.to_string()))
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn update(
        &self,
        namespace: &str,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut scopes = self.lock();
        let documents = scopes
            .get_mut(&(namespace.to_string(), collection.to_string()))
            .ok_or_else(|| StoreError::Unavailable(format!("no such document: {id}")))?;
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| StoreError::Unavailable(format!("no such document: {id}")))?;
        document.fields = fields;
        Ok(())
    }

    async fn delete(&self, namespace: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut scopes = self.lock();
        if let Some(documents) = scopes.get_mut(&(namespace.to_string(), collection.to_string())) {
            documents.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn create_list_in_insertion_order() {
        let store = MemoryStore::new();
        store
            .create("alice", "wallets", json!({"name": "Efectivo"}))
            .await
            .unwrap();
        store
            .create("alice", "wallets", json!({"name": "Banco"}))
            .await
            .unwrap();

        let docs = store.list_all("alice", "wallets").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].fields["name"], "Efectivo");
        assert_eq!(docs[1].fields["name"], "Banco");
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = MemoryStore::new();
        store
            .create("alice", "wallets", json!({"name": "Efectivo"}))
            .await
            .unwrap();

        assert!(store.list_all("bob", "wallets").await.unwrap().is_empty());
        assert!(store.list_all("alice", "budgets").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_absent_id_is_ok() {
        let store = MemoryStore::new();
        store
            .delete("alice", "wallets", "missing")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fail_writes_keeps_reads_available() {
        let store = MemoryStore::new();
        let id = store
            .create("alice", "wallets", json!({"name": "Efectivo"}))
            .await
            .unwrap();

        store.fail_writes(true);
        assert!(store
            .create("alice", "wallets", json!({"name": "Banco"}))
            .await
            .is_err());
        assert!(store.delete("alice", "wallets", &id).await.is_err());
        assert_eq!(store.list_all("alice", "wallets").await.unwrap().len(), 1);
    }
}
