//! Database connectivity report served at `GET /test`.
//!
//! The report is observational: it never fails, and any storage error is folded into
//! the `database` line, its message cut to [`MAX_ERROR_CHARS`] characters.

use axum::{extract::State, response::Json};
use pintar_core::store::DynDocumentStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppState, config::Config};

/// Most collection names listed in a report.
pub const MAX_LISTED_COLLECTIONS: usize = 10;

/// Longest error excerpt included in a report.
pub const MAX_ERROR_CHARS: usize = 50;

const SET: &str = "✅ Set";
const NOT_SET: &str = "❌ Not Set";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// First `max` characters of `text`.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn marker(value: &Option<String>) -> String {
    match value {
        Some(_) => SET,
        None => NOT_SET,
    }
    .to_string()
}

impl Diagnostics {
    pub async fn probe(store: Option<&DynDocumentStore>, config: &Config) -> Self {
        let mut report = Diagnostics {
            backend: "✅ Running".to_string(),
            database: "⚠️  Available but not initialized".to_string(),
            database_url: marker(&config.database_url),
            database_name: marker(&config.database_name),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        };

        let Some(store) = store else {
            return report;
        };

        report.connection_status = "Connected".to_string();
        match store.list_collections().await {
            Ok(mut collections) => {
                collections.truncate(MAX_LISTED_COLLECTIONS);
                report.collections = collections;
                report.database = "✅ Connected & Working".to_string();
            }
            Err(err) => {
                debug!(%err, "collection listing failed");
                report.database = format!(
                    "⚠️  Connected but Error: {}",
                    truncate(err.message(), MAX_ERROR_CHARS)
                );
            }
        }

        report
    }
}

pub async fn test_database(State(state): State<AppState>) -> Json<Diagnostics> {
    Json(Diagnostics::probe(state.try_store(), state.config()).await)
}
