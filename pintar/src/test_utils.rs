use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use bson::Bson;
use pintar_core::{
    backend::StoreBackend,
    error::{StorageError, StorageResult},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};
use pintar_memory::InMemoryStore;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, config::Config, routes::create_router};

pub(crate) const UNREACHABLE: &str =
    "No suitable servers found: server selection timeout exceeded while connecting to db:27017";

/// A backend whose server can never be reached.
#[derive(Debug, Default)]
pub(crate) struct FailingStore;

#[async_trait]
impl StoreBackend for FailingStore {
    async fn insert_document(&self, _document: Bson, _collection: &str) -> StorageResult<String> {
        Err(StorageError::Backend(UNREACHABLE.to_string()))
    }

    async fn list_documents(&self, _collection: &str) -> StorageResult<Vec<Bson>> {
        Err(StorageError::Backend(UNREACHABLE.to_string()))
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        Err(StorageError::Backend(UNREACHABLE.to_string()))
    }

    fn database_name(&self) -> &str {
        "unreachable"
    }
}

pub(crate) fn memory_store() -> DynDocumentStore {
    DocumentStore::new(InMemoryStore::new()).into_dyn()
}

pub(crate) fn failing_store() -> DynDocumentStore {
    DocumentStore::new(FailingStore).into_dyn()
}

pub(crate) fn app(store: Option<DynDocumentStore>) -> Router {
    create_router(AppState::new(store, Config::default()))
}

/// Sends one request through `router` and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub(crate) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
