use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};
use pintar_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StorageError, StorageResult},
};
use tracing::{debug, info};

use crate::sanitizer::KeySanitizer;

/// Document store backed by one MongoDB database.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeySanitizer::sanitize_string(collection_name))
    }

    fn prepare_document(&self, document: &Bson) -> StorageResult<Document> {
        document
            .as_document()
            .map(KeySanitizer::sanitize_document)
            .ok_or_else(|| StorageError::InvalidDocument("Expected document".into()))
    }

    fn restore_document(&self, document: &Document) -> Bson {
        Bson::Document(KeySanitizer::restore_document(document))
    }
}

/// Renders the identifier the server assigned to an inserted document.
fn inserted_id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> StorageResult<String> {
        let result = self.get_collection(collection)
            .insert_one(self.prepare_document(&document)?)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let id = inserted_id_string(result.inserted_id);
        debug!(collection, %id, "inserted document");

        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> StorageResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(doc! {})
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?
                .iter()
                .map(|doc| self.restore_document(doc))
                .collect()
        )
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        Ok(
            self.client
                .database(&self.database)
                .list_collection_names()
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?
                .iter()
                .map(|name| KeySanitizer::restore_string(name))
                .collect()
        )
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    async fn shutdown(self) -> StorageResult<()> {
        self.client.shutdown().await;
        info!(database = %self.database, "mongodb client shut down");

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and creates the client.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the first
    /// operation rather than here.
    async fn build(self) -> StorageResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| StorageError::Initialization(e.to_string()))?;
        options.app_name.get_or_insert_with(|| "pintar".to_string());

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| StorageError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
