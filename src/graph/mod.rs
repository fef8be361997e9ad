//! Graph projection
//!
//! Projects stored records into a flat nodes/edges view for visualization.
//! Nodes come from a fixed set of record collections, edges from the
//! relationship collection. Assembly is best-effort: collections that
//! cannot be read are skipped and edge endpoints are taken at face value,
//! so dangling references survive into the output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::store::DocumentStore;

/// Collections whose documents become graph nodes
pub const NODE_COLLECTIONS: [&str; 5] = ["application", "process", "role", "dataasset", "risk"];

/// Collection whose documents become graph edges
pub const RELATIONSHIP_COLLECTION: &str = "relationship";

/// Per-collection document cap when assembling nodes
pub const NODE_FETCH_LIMIT: usize = 100;

/// Document cap when assembling edges
pub const EDGE_FETCH_LIMIT: usize = 500;

/// One node in the projected graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
}

/// One edge in the projected graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: String,
    pub id: String,
}

/// The assembled nodes/edges view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Assemble the graph view from the store.
///
/// Reads up to [`NODE_FETCH_LIMIT`] documents from each node collection and
/// up to [`EDGE_FETCH_LIMIT`] relationships. Unreadable collections are
/// logged and skipped; the worst case is an empty view, never a failure.
pub async fn assemble(store: &dyn DocumentStore) -> GraphView {
    let mut nodes = Vec::new();
    for collection in NODE_COLLECTIONS {
        match store.find(collection, NODE_FETCH_LIMIT).await {
            Ok(documents) => {
                for document in documents {
                    let label = node_label(&document.fields, collection);
                    nodes.push(GraphNode {
                        id: document.id,
                        node_type: collection.to_string(),
                        label,
                    });
                }
            }
            Err(e) => debug!("Skipping unreadable node collection {}: {}", collection, e),
        }
    }

    let mut edges = Vec::new();
    match store.find(RELATIONSHIP_COLLECTION, EDGE_FETCH_LIMIT).await {
        Ok(documents) => {
            for document in documents {
                let source = match endpoint(&document.fields, "source_id") {
                    Some(source) => source,
                    None => continue,
                };
                let target = match endpoint(&document.fields, "target_id") {
                    Some(target) => target,
                    None => continue,
                };
                let kind = document
                    .fields
                    .get("kind")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| "rel".to_string());
                edges.push(GraphEdge { source, target, kind, id: document.id });
            }
        }
        Err(e) => debug!("Skipping unreadable relationship collection: {}", e),
    }

    GraphView { nodes, edges }
}

/// Display label for a node: its `name`, else its `title`, else the
/// capitalized collection name
fn node_label(fields: &Map<String, Value>, collection: &str) -> String {
    string_field(fields, "name")
        .or_else(|| string_field(fields, "title"))
        .unwrap_or_else(|| capitalize(collection))
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Endpoint id for an edge. Scalars are stringified the way they would
/// print; null, arrays, objects and empty strings yield no endpoint.
fn endpoint(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match fields.get(key)? {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
