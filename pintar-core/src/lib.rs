//! Core of the Dokumen Pintar service: validation and a thin document data-access layer.
//!
//! This crate provides:
//!
//! - **Validation** ([`validate`]) - Field-level checks that turn untyped JSON into records
//! - **Records** ([`record`]) - The [`record::Record`] trait and its storage conversions
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by storage backends
//! - **Collections** ([`collection`]) - Generic create/list over a named collection
//! - **Document store** ([`store`]) - Entry point handing out collections
//! - **Error handling** ([`error`]) - Storage error and result types
//!
//! # Example
//!
//! ```ignore
//! use pintar_core::{record::Record, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend);
//! let id = store.typed_collection::<Company>().create(&company).await?;
//! let companies = store.typed_collection::<Company>().list().await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as pintar_core;

pub mod backend;
pub mod collection;
pub mod error;
pub mod record;
pub mod store;
pub mod validate;
