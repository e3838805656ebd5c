//! Main document store interface.
//!
//! - [`DocumentStore`] - Store bound to a specific backend implementation
//! - [`DynDocumentStore`] - Dynamic dispatch store for runtime backend selection
//!
//! # Example
//!
//! ```ignore
//! use pintar_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let companies = store.typed_collection::<Company>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::{Collection, DynCollection, DynTypedCollection, TypedCollection},
    error::StorageResult,
    record::Record,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified record type.
    ///
    /// The collection name is determined by the record type's `collection_name()` method.
    pub fn typed_collection<'a, R: Record>(&'a self) -> TypedCollection<'a, B, R> {
        TypedCollection::new(R::collection_name().to_string(), &self.backend)
    }

    /// Gets an untyped collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> StorageResult<Vec<String>> {
        StoreBackend::list_collections(&self.backend).await
    }

    /// Returns the name of the underlying database.
    pub fn database_name(&self) -> &str {
        StoreBackend::database_name(&self.backend)
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> StorageResult<()> {
        self.backend.shutdown().await
    }
}

/// A document store whose backend is chosen at runtime.
#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    /// Creates a new dynamic document store with the given backend trait object.
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified record type.
    pub fn typed_collection<'a, R: Record>(&'a self) -> DynTypedCollection<'a, R> {
        DynTypedCollection::new(R::collection_name().to_string(), &*self.backend)
    }

    /// Gets an untyped collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> DynCollection<'a> {
        DynCollection::new(name.to_string(), &*self.backend)
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> StorageResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Returns the name of the underlying database.
    pub fn database_name(&self) -> &str {
        self.backend.database_name()
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> StorageResult<()> {
        self.backend.shutdown_boxed().await
    }
}

/// Conversion trait for turning a document store into a dynamic owned store.
pub trait IntoDynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}
