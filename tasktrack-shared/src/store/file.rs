/// JSON-file document store
///
/// Development fallback used when no database is configured. The whole data
/// set lives in one JSON file shaped as `{ "collection": [documents…] }`;
/// it is read once at open and rewritten in full after every mutation.
///
/// Deliberately minimal: the file write is not atomic (a crash mid-write
/// can corrupt the file) and there is no cross-process locking. An
/// in-process mutex serializes access within one server.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::store::FileStore;
///
/// let store = FileStore::open("data.json")?;
/// # Ok::<(), tasktrack_shared::store::StoreError>(())
/// ```
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::query::{self, QuerySpec};
use super::{DocumentStore, StoreError};

type Collections = BTreeMap<String, Vec<Value>>;

/// File-backed [`DocumentStore`]
pub struct FileStore {
    path: PathBuf,
    collections: Mutex<Collections>,
}

impl FileStore {
    /// Opens the store, loading the data file if it exists.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or does not parse as
    /// JSON. Malformed data on disk is fatal here, not at first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let collections = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Collections::new()
        };

        tracing::debug!(path = %path.display(), "Opened file document store");

        Ok(Self {
            path,
            collections: Mutex::new(collections),
        })
    }

    fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        // Whole-file rewrite; no atomic rename.
        let raw = serde_json::to_string_pretty(collections)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collections> {
        // Mutations swap whole documents, so the map stays consistent even
        // if a prior holder panicked.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn create(
        &self,
        collection: &str,
        _partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        if document_id(&document).is_none() {
            return Err(StoreError::MissingId);
        }

        let mut collections = self.lock();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        self.persist(&collections)?;

        Ok(document)
    }

    async fn query(&self, collection: &str, spec: &QuerySpec) -> Result<Vec<Value>, StoreError> {
        let collections = self.lock();

        let mut documents: Vec<Value> = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| spec.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        query::sort_documents(&mut documents, &spec.order_by);
        Ok(documents)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        _partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        let mut collections = self.lock();

        let documents = collections
            .get_mut(collection)
            .ok_or(StoreError::NotFound)?;
        let slot = documents
            .iter_mut()
            .find(|existing| document_id(existing) == Some(id))
            .ok_or(StoreError::NotFound)?;
        *slot = document.clone();

        self.persist(&collections)?;
        Ok(document)
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        _partition_key: &str,
    ) -> Result<(), StoreError> {
        let mut collections = self.lock();

        let documents = collections
            .get_mut(collection)
            .ok_or(StoreError::NotFound)?;
        let before = documents.len();
        documents.retain(|existing| document_id(existing) != Some(id));

        if documents.len() == before {
            return Err(StoreError::NotFound);
        }

        self.persist(&collections)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortDirection;
    use serde_json::json;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> FileStore {
        FileStore::open(dir.path().join("data.json")).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_query_roundtrip() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store
            .create("tasks", "task", json!({"id": "a", "userId": "u1"}))
            .await
            .unwrap();
        store
            .create("tasks", "task", json!({"id": "b", "userId": "u2"}))
            .await
            .unwrap();

        let mine = store
            .query("tasks", &QuerySpec::new().filter("userId", "u1"))
            .await
            .unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["id"], "a");
    }

    #[tokio::test]
    async fn test_create_rejects_documents_without_id() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let result = store.create("tasks", "task", json!({"title": "x"})).await;
        assert!(matches!(result, Err(StoreError::MissingId)));
    }

    #[tokio::test]
    async fn test_query_unknown_collection_is_empty() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let documents = store.query("nothing", &QuerySpec::new()).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_query_orders_documents() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        for (id, rank) in [("a", 2), ("b", 1), ("c", 3)] {
            store
                .create("items", "item", json!({"id": id, "rank": rank}))
                .await
                .unwrap();
        }

        let documents = store
            .query(
                "items",
                &QuerySpec::new().order_by("rank", SortDirection::Descending),
            )
            .await
            .unwrap();

        let ids: Vec<_> = documents.iter().map(|d| d["id"].clone()).collect();
        assert_eq!(ids, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_replace_overwrites_matching_document() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store
            .create("tasks", "task", json!({"id": "a", "title": "old"}))
            .await
            .unwrap();
        store
            .replace("tasks", "a", "task", json!({"id": "a", "title": "new"}))
            .await
            .unwrap();

        let documents = store.query("tasks", &QuerySpec::new()).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["title"], "new");
    }

    #[tokio::test]
    async fn test_replace_missing_document_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let result = store
            .replace("tasks", "ghost", "task", json!({"id": "ghost"}))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store
            .create("tasks", "task", json!({"id": "a"}))
            .await
            .unwrap();
        store.delete("tasks", "a", "task").await.unwrap();

        let result = store.delete("tasks", "a", "task").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .create("tasks", "task", json!({"id": "a", "title": "persisted"}))
                .await
                .unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let documents = store.query("tasks", &QuerySpec::new()).await.unwrap();
        assert_eq!(documents[0]["title"], "persisted");
    }

    #[test]
    fn test_malformed_file_is_fatal_at_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
