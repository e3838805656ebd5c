//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations, so the
//! data-access layer works the same against the in-memory backend and MongoDB.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use pintar_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! let id = backend
//!     .insert_document(Bson::Document(doc! { "name": "Acme" }), "company")
//!     .await?;
//! let all = backend.list_documents("company").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::error::StorageResult;

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. Any pooling or locking is the implementation's business; callers add
/// none of their own.
///
/// # Error Handling
///
/// Operations return [`StorageResult<T>`](crate::error::StorageResult). Connectivity
/// problems and rejected operations are reported as
/// [`StorageError::Backend`](crate::error::StorageError::Backend).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts one document into a collection and returns its generated identifier.
    ///
    /// # Arguments
    ///
    /// * `document` - The BSON document to insert; must be a `Bson::Document`
    /// * `collection` - The name of the collection to insert into. Created automatically if it doesn't exist.
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String>;

    /// Retrieves every document of a collection, as stored.
    ///
    /// No filtering, pagination or ordering is applied. A collection that does not exist
    /// yields an empty vector.
    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> StorageResult<Vec<String>>;

    /// Returns the name of the database this backend writes to.
    fn database_name(&self) -> &str;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends holding external connections
    /// should override it.
    async fn shutdown(self) -> StorageResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String> {
        StoreBackend::insert_document(*self, document, collection).await
    }

    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>> {
        StoreBackend::list_documents(*self, collection).await
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        StoreBackend::list_collections(*self).await
    }

    fn database_name(&self) -> &str {
        StoreBackend::database_name(*self)
    }
}

/// Object-safe twin of [`StoreBackend`], for choosing the backend at runtime.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String>;
    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>>;
    async fn list_collections(&self) -> StorageResult<Vec<String>>;
    fn database_name(&self) -> &str;
    async fn shutdown_boxed(self: Box<Self>) -> StorageResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String> {
        StoreBackend::insert_document(self, document, collection).await
    }

    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>> {
        StoreBackend::list_documents(self, collection).await
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        StoreBackend::list_collections(self).await
    }

    fn database_name(&self) -> &str {
        StoreBackend::database_name(self)
    }

    async fn shutdown_boxed(self: Box<Self>) -> StorageResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StorageResult<Self::Backend>;
}
