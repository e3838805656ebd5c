//! In-memory document storage backend for Dokumen Pintar.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend`
//! trait. It is meant for development and tests: nothing survives the process.
//!
//! # Quick Start
//!
//! ```ignore
//! use pintar_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use pintar_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let id = store.typed_collection::<Company>().create(&company).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pintar_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
