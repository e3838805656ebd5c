//! Dokumen Pintar: a small HTTP API over three document collections.
//!
//! The service stores company profiles, product/app listings and intelligent
//! documents. Each entity is validated on the way in ([`models`]), persisted through
//! the generic data-access layer of `pintar-core`, and listed back through an
//! allow-list projection that drops unknown stored keys.
//!
//! # Quick Start
//!
//! ```ignore
//! use pintar::{AppState, config::Config, routes::create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = pintar::open_store(&config).await?;
//!     let app = create_router(AppState::new(store, config));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB storage (requires the default `mongodb` feature)

use std::sync::Arc;

use pintar_core::{
    backend::StoreBackendBuilder,
    error::{StorageError, StorageResult},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};
use tracing::{info, warn};

use crate::config::{Config, StoreKind};

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_utils;

pub use pintar_core::{backend, collection, record, store, validate};

/// In-memory storage backend.
pub mod memory {
    pub use pintar_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use pintar_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}

/// Message reported by CRUD endpoints when no store is configured.
pub const DATABASE_NOT_AVAILABLE: &str =
    "Database not available. Check DATABASE_URL and DATABASE_NAME environment variables.";

/// Shared state handed to every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    store: Option<Arc<DynDocumentStore>>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<DynDocumentStore>, config: Config) -> Self {
        Self {
            store: store.map(Arc::new),
            config: Arc::new(config),
        }
    }

    /// The configured store, or [`StorageError::Unavailable`] if there is none.
    pub fn store(&self) -> StorageResult<&DynDocumentStore> {
        self.store
            .as_deref()
            .ok_or_else(|| StorageError::Unavailable(DATABASE_NOT_AVAILABLE.to_string()))
    }

    /// The configured store, if any.
    pub fn try_store(&self) -> Option<&DynDocumentStore> {
        self.store.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shuts the store down and reports whether it did.
    ///
    /// Nothing happens when no store is configured, or when another clone of the
    /// state still shares the store.
    pub async fn shutdown(self) -> StorageResult<bool> {
        let Some(store) = self.store else {
            return Ok(false);
        };

        match Arc::try_unwrap(store) {
            Ok(store) => {
                store.shutdown().await?;
                Ok(true)
            }
            Err(store) => {
                warn!(
                    database = store.database_name(),
                    references = Arc::strong_count(&store),
                    "store still shared; skipping shutdown"
                );
                Ok(false)
            }
        }
    }
}

/// Opens the store selected by `config`.
///
/// Returns `Ok(None)` when MongoDB is selected but `DATABASE_URL` or `DATABASE_NAME`
/// is not set; the service then runs without a database and reports so.
pub async fn open_store(config: &Config) -> StorageResult<Option<DynDocumentStore>> {
    match config.store {
        StoreKind::Memory => {
            let mut builder = memory::InMemoryStore::builder();
            if let Some(name) = &config.database_name {
                builder = builder.database(name);
            }

            info!("using in-memory store");
            Ok(Some(DocumentStore::new(builder.build().await?).into_dyn()))
        }
        StoreKind::MongoDb => match (&config.database_url, &config.database_name) {
            (Some(url), Some(name)) => open_mongodb(url, name).await.map(Some),
            _ => {
                warn!("DATABASE_URL or DATABASE_NAME not set; running without a database");
                Ok(None)
            }
        },
    }
}

#[cfg(feature = "mongodb")]
async fn open_mongodb(url: &str, name: &str) -> StorageResult<DynDocumentStore> {
    let backend = mongodb::MongoDbStore::builder(url, name).build().await?;

    info!(database = name, "using mongodb store");
    Ok(DocumentStore::new(backend).into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn open_mongodb(_url: &str, _name: &str) -> StorageResult<DynDocumentStore> {
    Err(StorageError::Initialization(
        "built without the mongodb feature; set PINTAR_STORE=memory".to_string(),
    ))
}
