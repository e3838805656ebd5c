//! MongoDB backend implementation for Dokumen Pintar.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Connection pooling, retries and timeouts are left entirely to the MongoDB driver.
//!
//! To use this backend through the `pintar` crate, keep its `mongodb` feature enabled
//! (it is on by default).
//!
//! # Example
//!
//! ```ignore
//! use pintar_core::backend::StoreBackendBuilder;
//! use pintar_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "pintar")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pintar_mongodb;

pub mod store;
pub(crate) mod sanitizer;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
