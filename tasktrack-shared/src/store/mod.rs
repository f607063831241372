/// Document store abstraction
///
/// Handlers persist domain documents through the [`DocumentStore`] trait,
/// which mirrors the container surface of a hosted document database:
/// create, query, replace-by-id, delete-by-id, all scoped by a named
/// collection and a partition key. Two backends implement it:
///
/// - [`PostgresStore`]: the managed backend, one JSONB row per document
/// - [`FileStore`]: a JSON-file fallback so development needs no database
///
/// The store handle is constructed once at startup and passed down through
/// application state; nothing in this crate holds a global connection.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_shared::models::task::{Task, TaskDraft};
/// use tasktrack_shared::store::{Collection, DocumentStore, FileStore, QuerySpec};
///
/// # async fn example() -> Result<(), tasktrack_shared::store::StoreError> {
/// let store: Arc<dyn DocumentStore> = Arc::new(FileStore::open("data.json")?);
/// let tasks: Collection<Task> = Collection::new(store);
///
/// let task = tasks
///     .create(&Task::create("user-1", TaskDraft { title: "x".into(), ..Default::default() }))
///     .await?;
///
/// let mine = tasks
///     .query(&QuerySpec::new().filter("userId", "user-1"))
///     .await?;
/// # Ok(())
/// # }
/// ```
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub mod file;
pub mod postgres;
pub mod query;

pub use file::FileStore;
pub use postgres::{PostgresConfig, PostgresStore};
pub use query::{QuerySpec, SortDirection};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with the requested id in the collection
    #[error("document not found")]
    NotFound,

    /// A document was created without a string `id` field
    #[error("document has no string id")]
    MissingId,

    /// Reading or writing the data file failed
    #[error("data file error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be serialized or deserialized
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database backend failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage backend for JSON documents grouped into named collections
///
/// All documents are JSON objects carrying a string `id`. `partition_key`
/// routes writes in partitioned backends; the file backend ignores it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends a document to a collection and returns the stored value.
    async fn create(
        &self,
        collection: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError>;

    /// Returns the documents matching every filter in `spec`, sorted by its
    /// order-by keys.
    async fn query(&self, collection: &str, spec: &QuerySpec) -> Result<Vec<Value>, StoreError>;

    /// Overwrites the document with the given id.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError>;

    /// Removes the document with the given id.
    async fn delete(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<(), StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// A domain type persisted as a document in a fixed collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the documents of this type live in
    const COLLECTION: &'static str;

    /// Document id
    fn id(&self) -> Uuid;

    /// Partition key for this document
    fn partition_key(&self) -> String;
}

/// Typed handle over one collection of a [`DocumentStore`]
///
/// Serializes and deserializes at the boundary so handlers work with domain
/// types rather than raw JSON.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Stores a new document and returns it as persisted.
    pub async fn create(&self, item: &T) -> Result<T, StoreError> {
        let document = serde_json::to_value(item)?;
        let stored = self
            .store
            .create(T::COLLECTION, &item.partition_key(), document)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Runs a query and decodes every match.
    pub async fn query(&self, spec: &QuerySpec) -> Result<Vec<T>, StoreError> {
        let documents = self.store.query(T::COLLECTION, spec).await?;
        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }

    /// Runs a query and returns the first match, if any.
    pub async fn find_one(&self, spec: &QuerySpec) -> Result<Option<T>, StoreError> {
        Ok(self.query(spec).await?.into_iter().next())
    }

    /// Overwrites the stored document with `item`.
    pub async fn replace(&self, item: &T) -> Result<T, StoreError> {
        let document = serde_json::to_value(item)?;
        let stored = self
            .store
            .replace(
                T::COLLECTION,
                &item.id().to_string(),
                &item.partition_key(),
                document,
            )
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Removes the document with the given id.
    pub async fn delete(&self, id: Uuid, partition_key: &str) -> Result<(), StoreError> {
        self.store
            .delete(T::COLLECTION, &id.to_string(), partition_key)
            .await
    }
}
