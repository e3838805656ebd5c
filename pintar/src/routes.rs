use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::Json,
    routing::get,
};
use pintar_core::record::{Record, RecordExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{
    AppState,
    diagnostics::test_database,
    error::ApiError,
    models::{Company, Document, ProductApp},
};

pub const SERVICE_NAME: &str = "Dokumen Pintar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/test", get(test_database))
        .route(
            "/api/company",
            get(list_records::<Company>).post(create_record::<Company>),
        )
        .route(
            "/api/products",
            get(list_records::<ProductApp>).post(create_record::<ProductApp>),
        )
        .route(
            "/api/documents",
            get(list_records::<Document>).post(create_record::<Document>),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        name: SERVICE_NAME.to_string(),
        message: format!("Welcome to {SERVICE_NAME} API"),
    })
}

/// Validates the body as an `R` and stores it.
async fn create_record<R: Record>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let Json(body) = body?;
    let record = R::from_json(&body)?;

    let id = state
        .store()?
        .typed_collection::<R>()
        .create(&record)
        .await?;

    info!(collection = R::collection_name(), %id, "created record");

    Ok(Json(CreateResponse { id }))
}

async fn list_records<R: Record>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R>>, ApiError> {
    let records = state
        .store()?
        .typed_collection::<R>()
        .list()
        .await?;

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DATABASE_NOT_AVAILABLE,
        test_utils::{UNREACHABLE, app, failing_store, memory_store, send},
    };
    use axum::http::{Method, StatusCode};
    use bson::{Bson, doc};
    use serde_json::json;

    #[tokio::test]
    async fn root_reports_identity() {
        let router = app(None);

        let (status, body) = send(&router, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "name": "Dokumen Pintar", "message": "Welcome to Dokumen Pintar API" })
        );
    }

    #[tokio::test]
    async fn empty_collections_list_as_empty_arrays() {
        let router = app(Some(memory_store()));

        for uri in ["/api/company", "/api/products", "/api/documents"] {
            let (status, body) = send(&router, Method::GET, uri, None).await;
            assert_eq!((uri, status), (uri, StatusCode::OK));
            assert_eq!((uri, body), (uri, json!([])));
        }
    }

    #[tokio::test]
    async fn company_round_trips() {
        let router = app(Some(memory_store()));
        let company = json!({
            "name": "Acme",
            "tagline": "Smart documents",
            "description": "We read documents",
            "mission": "Less paperwork",
            "vision": "No paperwork",
            "website": "https://acme.example",
            "email": "hello@acme.example",
            "phone": "+62 21 555 0100",
            "address": "Jakarta",
            "logo_url": "https://cdn.acme.example/logo.png"
        });

        let (status, created) = send(&router, Method::POST, "/api/company", Some(company.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!created["id"].as_str().unwrap().is_empty());

        let (status, listed) = send(&router, Method::GET, "/api/company", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([company]));
    }

    #[tokio::test]
    async fn product_round_trips_with_nulls_for_absent_fields() {
        let router = app(Some(memory_store()));

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/products",
            Some(json!({ "name": "Scan", "category": "OCR" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = send(&router, Method::GET, "/api/products", None).await;
        assert_eq!(
            listed,
            json!([{
                "name": "Scan",
                "short_description": null,
                "category": "OCR",
                "pricing": null,
                "website": null
            }])
        );
    }

    #[tokio::test]
    async fn documents_get_default_tags() {
        let router = app(Some(memory_store()));

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/documents",
            Some(json!({ "title": "T", "content": "C" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(created["id"].is_string());

        let (_, listed) = send(&router, Method::GET, "/api/documents", None).await;
        assert_eq!(listed, json!([{ "title": "T", "content": "C", "tags": [] }]));
    }

    #[tokio::test]
    async fn missing_required_field_never_reaches_storage() {
        // A failing store would answer 500 if it were reached.
        let router = app(Some(failing_store()));

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/company",
            Some(json!({ "tagline": "no name" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({ "detail": [{ "loc": ["body", "name"], "msg": "Field required", "type": "missing" }] })
        );
    }

    #[tokio::test]
    async fn malformed_email_and_url_are_rejected() {
        let router = app(Some(memory_store()));

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/company",
            Some(json!({ "name": "Acme", "email": "acme", "website": "acme.example" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let locs: Vec<&Value> = body["detail"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| &d["loc"])
            .collect();
        assert_eq!(locs, vec![&json!(["body", "website"]), &json!(["body", "email"])]);

        let (_, listed) = send(&router, Method::GET, "/api/company", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn non_object_body_is_rejected() {
        let router = app(Some(memory_store()));

        let (status, body) = send(&router, Method::POST, "/api/documents", Some(json!(["T"]))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["type"], "object_type");
    }

    #[tokio::test]
    async fn unparsable_body_is_a_client_error() {
        let router = app(Some(memory_store()));
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/documents")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let response = tower::ServiceExt::oneshot(router, request).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn stored_unknown_fields_are_dropped() {
        let store = memory_store();
        store
            .collection("document")
            .insert(Bson::Document(doc! {
                "title": "Imported",
                "content": "From elsewhere",
                "tags": ["legacy"],
                "summary": "not part of the schema",
                "score": 0.9
            }))
            .await
            .unwrap();
        let router = app(Some(store));

        let (status, listed) = send(&router, Method::GET, "/api/documents", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            listed,
            json!([{ "title": "Imported", "content": "From elsewhere", "tags": ["legacy"] }])
        );
    }

    #[tokio::test]
    async fn storage_failures_are_server_errors() {
        let router = app(Some(failing_store()));

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/products",
            Some(json!({ "name": "Scan" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": format!("Backend error: {UNREACHABLE}") }));

        let (status, _) = send(&router, Method::GET, "/api/products", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_database_is_a_server_error() {
        let router = app(None);

        let (status, body) = send(&router, Method::GET, "/api/documents", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": DATABASE_NOT_AVAILABLE }));
    }

    #[tokio::test]
    async fn diagnostics_endpoint_responds() {
        let router = app(Some(memory_store()));

        let (status, body) = send(&router, Method::GET, "/test", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "✅ Running");
        assert_eq!(body["connection_status"], "Connected");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let router = app(Some(memory_store()));

        send(&router, Method::POST, "/api/company", Some(json!({ "name": "Acme" }))).await;
        send(&router, Method::POST, "/api/products", Some(json!({ "name": "Scan" }))).await;

        let (_, companies) = send(&router, Method::GET, "/api/company", None).await;
        let (_, products) = send(&router, Method::GET, "/api/products", None).await;
        let (_, documents) = send(&router, Method::GET, "/api/documents", None).await;

        assert_eq!(companies.as_array().unwrap().len(), 1);
        assert_eq!(products[0]["name"], "Scan");
        assert_eq!(documents, json!([]));
    }
}
