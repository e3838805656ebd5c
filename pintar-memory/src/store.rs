//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON values in maps guarded by an async-aware read-write lock.

use async_trait::async_trait;
use bson::{Bson, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use pintar_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StorageError, StorageResult},
};

/// Documents of one collection keyed by hex ObjectId. ObjectIds generated in one
/// process sort in creation order, so listing follows insertion order.
type CollectionMap = BTreeMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

const DEFAULT_DATABASE: &str = "memory";

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state; clones share
/// the same data.
///
/// # Example
///
/// ```ignore
/// use pintar_memory::InMemoryStore;
/// use pintar_core::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.insert_document(Bson::Document(doc! { "name": "Acme" }), "company").await?;
///     let docs = store.list_documents("company").await?;
///     assert_eq!(docs.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
    database: String,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::with_database(DEFAULT_DATABASE)
    }

    /// Creates a new empty store reporting `database` as its database name.
    pub fn with_database(database: &str) -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            database: database.to_string(),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String> {
        let Bson::Document(mut document) = document else {
            return Err(StorageError::InvalidDocument("Expected document".into()));
        };

        let id = ObjectId::new();
        document.insert("_id", id);

        let key = id.to_hex();
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), Bson::Document(document));

        Ok(key)
    }

    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .map(|documents| documents.values().cloned().collect())
                .unwrap_or_default()
        )
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        Ok(
            self.store
                .read()
                .await
                .keys()
                .cloned()
                .collect()
        )
    }

    fn database_name(&self) -> &str {
        &self.database
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use pintar_memory::InMemoryStore;
/// use pintar_core::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().database("scratch").build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    database: Option<String>,
}

impl InMemoryStoreBuilder {
    /// Sets the database name the store reports.
    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance. Always succeeds.
    async fn build(self) -> StorageResult<Self::Backend> {
        Ok(InMemoryStore::with_database(
            self.database.as_deref().unwrap_or(DEFAULT_DATABASE),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pintar_core::{
        record::Record,
        store::{DocumentStore, IntoDynDocumentStore},
        validate::{Fields, ValidationError},
    };
    use serde::Serialize;
    use serde_json::{Map, Value};

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Page {
        title: String,
        tags: Vec<String>,
    }

    impl Record for Page {
        const FIELDS: &'static [&'static str] = &["title", "tags"];

        fn collection_name() -> &'static str {
            "page"
        }

        fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError> {
            let mut fields = Fields::new(map);
            let title = fields.required_text("title");
            let tags = fields.text_list("tags");

            fields.finish((|| Some(Page { title: title?, tags }))())
        }
    }

    fn page(title: &str) -> Page {
        Page { title: title.to_string(), tags: vec!["a".into(), "b".into()] }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = InMemoryStore::new();

        let first = store.insert_document(Bson::Document(doc! { "n": 1 }), "c").await.unwrap();
        let second = store.insert_document(Bson::Document(doc! { "n": 2 }), "c").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 24);

        let docs = store.list_documents("c").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs[0].as_document().unwrap().get_object_id("_id").unwrap().to_hex(),
            first
        );
    }

    #[tokio::test]
    async fn insert_rejects_non_documents() {
        let store = InMemoryStore::new();

        let result = store.insert_document(Bson::String("x".into()), "c").await;
        assert!(matches!(result, Err(StorageError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn unknown_collection_lists_empty() {
        let store = InMemoryStore::new();

        assert!(store.list_documents("nothing").await.unwrap().is_empty());
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn typed_collection_round_trips() {
        let backend = InMemoryStore::new();
        let store = DocumentStore::new(&backend);
        let pages = store.typed_collection::<Page>();

        let id = pages.create(&page("one")).await.unwrap();
        assert!(!id.is_empty());

        assert_eq!(pages.list().await.unwrap(), vec![page("one")]);
        assert_eq!(store.list_collections().await.unwrap(), vec!["page".to_string()]);

        let raw = backend.list_documents("page").await.unwrap();
        let raw = raw[0].as_document().unwrap();
        assert!(raw.contains_key("_id"));
        assert!(raw.contains_key("created_at"));
        assert!(raw.contains_key("updated_at"));
    }

    #[tokio::test]
    async fn typed_list_drops_unknown_fields() {
        let store = DocumentStore::new(InMemoryStore::new()).into_dyn();

        store
            .collection("page")
            .insert(Bson::Document(doc! { "title": "raw", "owner": "someone", "views": 3 }))
            .await
            .unwrap();

        let pages = store.typed_collection::<Page>().list().await.unwrap();
        assert_eq!(pages, vec![Page { title: "raw".into(), tags: vec![] }]);
    }

    #[tokio::test]
    async fn typed_list_rejects_invalid_stored_records() {
        let store = DocumentStore::new(InMemoryStore::new()).into_dyn();

        store
            .collection("page")
            .insert(Bson::Document(doc! { "tags": ["x"] }))
            .await
            .unwrap();

        let result = store.typed_collection::<Page>().list().await;
        assert!(matches!(result, Err(StorageError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn builder_sets_database_name() {
        let store = InMemoryStore::builder().database("scratch").build().await.unwrap();
        assert_eq!(store.database_name(), "scratch");

        let store = DocumentStore::new(store).into_dyn();
        assert_eq!(store.database_name(), "scratch");
        store.shutdown().await.unwrap();
    }
}
