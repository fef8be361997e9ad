//! HTTP request handlers
//!
//! One handler per route. The document routes are generic: the collection
//! path segment is resolved against the record type registry, so a new
//! record type needs no handler changes.

use axum::extract::{Path, Query, State};
use axum::Json;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::graph::{self, GraphView};
use crate::schema::{self, TypeSummary};
use crate::store::{RawDocument, StoreError};

use super::error::ApiError;
use super::server::AppState;

/// Documents returned by a list call when no limit is given
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Collection names reported by the diagnostics endpoint, at most
const DIAGNOSTICS_COLLECTION_CAP: usize = 10;

/// Liveness probe
pub async fn root() -> Json<Value> {
    Json(json!({ "name": "Aufbau API", "status": "ok" }))
}

/// Static greeting used by frontend smoke checks
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the Aufbau backend!" }))
}

/// Store connectivity diagnostics.
///
/// Always responds 200; configuration and reachability problems are
/// reported in the body, not as an HTTP failure.
pub async fn diagnostics(State(state): State<AppState>) -> Json<Value> {
    let mut database = "not configured".to_string();
    let mut connection_status = "not connected";
    let mut collections = Vec::new();

    if let Some(store) = &state.store {
        match store.collection_names().await {
            Ok(mut names) => {
                names.truncate(DIAGNOSTICS_COLLECTION_CAP);
                collections = names;
                database = "connected".to_string();
                connection_status = "connected";
            }
            Err(e) => database = format!("unavailable: {}", e),
        }
    }

    Json(json!({
        "backend": "running",
        "database": database,
        "database_url": if state.database_url_set { "set" } else { "not set" },
        "database_name": if state.database_name_set { "set" } else { "not set" },
        "connection_status": connection_status,
        "collections": collections,
    }))
}

/// Registry introspection, in declaration order
pub async fn schema_summary() -> Json<IndexMap<&'static str, TypeSummary>> {
    Json(schema::summary())
}

/// Collection names for all registered record types
pub async fn collections() -> Json<Value> {
    Json(json!({ "collections": schema::collection_names() }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// List documents in a collection.
///
/// A storeless gateway or a failing store degrades to an empty listing;
/// only an unknown collection is an error.
pub async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let record_type = schema::resolve(&collection)
        .ok_or_else(|| ApiError::UnknownCollection(collection.clone()))?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let items: Vec<Value> = match &state.store {
        Some(store) => match store.find(&record_type.collection(), limit).await {
            Ok(documents) => documents.into_iter().map(serialize_document).collect(),
            Err(e) => {
                debug!("Degrading {} listing to empty: {}", record_type.collection(), e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Ok(Json(json!({ "items": items })))
}

#[derive(Debug, Deserialize)]
pub struct CreatePayload {
    pub data: Map<String, Value>,
}

/// Create one document in a collection.
///
/// The payload is validated against the record type before the store is
/// touched; store failures propagate to the caller.
pub async fn create_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(payload): Json<CreatePayload>,
) -> Result<Json<Value>, ApiError> {
    let record_type = schema::resolve(&collection)
        .ok_or_else(|| ApiError::UnknownCollection(collection.clone()))?;
    let record = record_type.validate(&payload.data)?;

    let store = state.store.as_ref().ok_or_else(|| {
        ApiError::Store(StoreError::Unavailable("no document store configured".to_string()))
    })?;
    let id = store.insert(&record_type.collection(), record).await?;

    Ok(Json(json!({ "_id": id })))
}

/// Graph projection of the stored records
pub async fn graph_view(State(state): State<AppState>) -> Json<GraphView> {
    match &state.store {
        Some(store) => Json(graph::assemble(store.as_ref()).await),
        None => Json(GraphView::default()),
    }
}

/// Render a raw document for the wire: `_id`, RFC 3339 `created_at`, then
/// the record fields as stored
fn serialize_document(document: RawDocument) -> Value {
    let mut rendered = Map::new();
    rendered.insert("_id".to_string(), Value::String(document.id));
    rendered.insert(
        "created_at".to_string(),
        Value::String(format_timestamp(document.created_at)),
    );
    for (name, value) in document.fields {
        rendered.insert(name, value);
    }
    Value::Object(rendered)
}

fn format_timestamp(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(timestamp) => timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}
