//! Collection types for data-access operations.
//!
//! A collection is a named grouping of documents in the store. This module offers
//! untyped collections, which pass raw BSON through, and typed collections bound to a
//! [`Record`] type, which serialize on `create` and project + re-validate on `list`.
//!
//! # Collection Types
//!
//! - [`Collection`] - Untyped collection with explicit BSON documents
//! - [`TypedCollection`] - Record-typed collection
//! - [`DynCollection`] - Dynamic dispatch version of untyped collection
//! - [`DynTypedCollection`] - Dynamic dispatch version of typed collection
//!
//! # Example
//!
//! ```ignore
//! # async fn example(store: &pintar_core::store::DocumentStore<impl pintar_core::backend::StoreBackend>) -> pintar_core::error::StorageResult<()> {
//! let notes = store.typed_collection::<Note>();
//! let id = notes.create(&Note { text: "hello".into() }).await?;
//! let all = notes.list().await?;
//! # Ok(()) }
//! ```

use bson::{Bson, DateTime};
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    error::{StorageError, StorageResult},
    record::{Record, RecordExt},
};

/// Key holding the insertion time of a stored document.
pub const CREATED_AT: &str = "created_at";

/// Key holding the last write time of a stored document.
pub const UPDATED_AT: &str = "updated_at";

/// Serializes a record and stamps it with insertion timestamps.
fn stored_form<R: Record>(record: &R) -> StorageResult<Bson> {
    let mut document = match record.to_bson()? {
        Bson::Document(document) => document,
        other => {
            return Err(StorageError::Serialization(format!(
                "record for collection {} serialized to {:?}, expected a document",
                R::collection_name(),
                other.element_type()
            )));
        }
    };

    let now = DateTime::from_chrono(chrono::Utc::now());
    document.insert(CREATED_AT, now);
    document.insert(UPDATED_AT, now);

    Ok(Bson::Document(document))
}

fn read_all<R: Record>(raw: Vec<Bson>) -> StorageResult<Vec<R>> {
    raw.iter()
        .map(R::from_raw)
        .collect()
}

/// An untyped collection with a reference to a storage backend.
///
/// Documents are represented as BSON values; nothing is validated.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a raw document and returns its generated identifier.
    pub async fn insert(&self, document: Bson) -> StorageResult<String> {
        StoreBackend::insert_document(self.backend, document, self.name()).await
    }

    /// Retrieves every raw document in the collection.
    pub async fn list(&self) -> StorageResult<Vec<Bson>> {
        StoreBackend::list_documents(self.backend, self.name()).await
    }
}

/// An untyped collection backed by a dynamically dispatched backend.
#[derive(Debug)]
pub struct DynCollection<'a> {
    name: String,
    backend: &'a dyn DynStoreBackend,
}

impl<'a> DynCollection<'a> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a raw document and returns its generated identifier.
    pub async fn insert(&self, document: Bson) -> StorageResult<String> {
        DynStoreBackend::insert_document(self.backend, document, self.name()).await
    }

    /// Retrieves every raw document in the collection.
    pub async fn list(&self) -> StorageResult<Vec<Bson>> {
        DynStoreBackend::list_documents(self.backend, self.name()).await
    }
}

/// A collection bound to a [`Record`] type.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, R: Record> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<R>,
}

impl<'a, B: StoreBackend, R: Record> TypedCollection<'a, B, R> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persists one validated record and returns its generated identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization fails or the store is unreachable or
    /// rejects the insert.
    pub async fn create(&self, record: &R) -> StorageResult<String> {
        let id = StoreBackend::insert_document(self.backend, stored_form(record)?, self.name()).await?;

        debug!(collection = self.name(), %id, "record created");

        Ok(id)
    }

    /// Retrieves every record in the collection.
    ///
    /// Each stored document is reduced to the record's recognized fields and validated
    /// again; unknown keys are dropped silently.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on connectivity failure, or
    /// [`StorageError::InvalidDocument`] if a stored document is not a valid record.
    pub async fn list(&self) -> StorageResult<Vec<R>> {
        read_all(StoreBackend::list_documents(self.backend, self.name()).await?)
    }
}

/// A record-typed collection backed by a dynamically dispatched backend.
#[derive(Debug)]
pub struct DynTypedCollection<'a, R: Record> {
    name: String,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<R>,
}

impl<'a, R: Record> DynTypedCollection<'a, R> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persists one validated record and returns its generated identifier.
    pub async fn create(&self, record: &R) -> StorageResult<String> {
        let id = DynStoreBackend::insert_document(self.backend, stored_form(record)?, self.name()).await?;

        debug!(collection = self.name(), %id, "record created");

        Ok(id)
    }

    /// Retrieves every record in the collection, dropping unknown keys.
    pub async fn list(&self) -> StorageResult<Vec<R>> {
        read_all(DynStoreBackend::list_documents(self.backend, self.name()).await?)
    }
}
