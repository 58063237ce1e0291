//! Input collection: gathering the values that flow into a node.
//!
//! Collection is tolerant by design. A node whose producers have not run yet
//! simply sees fewer inputs; only a structurally malformed edge list at the
//! raw editor boundary is an error.

use crate::error::CollectError;
use crate::graph::WorkflowEdge;
use ahash::AHashMap;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// The shared map of already-produced node outputs, keyed by node id.
pub type NodeOutputs = AHashMap<String, Value>;

/// One value flowing into a node over one edge. Transient: recomputed on
/// every resolution pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedInput {
    pub source_node_id: String,
    pub edge_id: String,
    pub value: String,
    /// Sort key for deterministic merging. All inputs of a single
    /// collection pass share the same stamp, so ties fall back to
    /// collection order (which is edge order).
    pub timestamp: u64,
    pub source_handle: Option<String>,
}

/// Collects the values flowing into `node_id` over the given edges.
///
/// Edges whose source has no entry in `outputs` are skipped: partial
/// availability means "no data yet", not failure. Zero matching edges yield
/// an empty, successful result.
pub fn collect(node_id: &str, edges: &[WorkflowEdge], outputs: &NodeOutputs) -> Vec<CollectedInput> {
    let timestamp = now_millis();
    let inputs: Vec<CollectedInput> = edges
        .iter()
        .filter(|edge| edge.target == node_id)
        .filter_map(|edge| {
            let value = outputs.get(&edge.source)?;
            Some(CollectedInput {
                source_node_id: edge.source.clone(),
                edge_id: edge.id.clone(),
                value: render_value(value),
                timestamp,
                source_handle: edge.source_handle.clone(),
            })
        })
        .collect();
    tracing::debug!(node = %node_id, inputs = inputs.len(), "collected inputs");
    inputs
}

/// Collects inputs from an edge list that is still raw editor JSON.
///
/// This is the only entry point that can fail: a value that is not an array
/// is a [`CollectError::MalformedEdgeList`]. Individual elements that do not
/// parse as edges are skipped with a warning, matching the engine's
/// tolerance of damaged saves.
pub fn collect_from_value(
    node_id: &str,
    edges: &Value,
    outputs: &NodeOutputs,
) -> Result<Vec<CollectedInput>, CollectError> {
    let raw = edges
        .as_array()
        .ok_or_else(|| CollectError::MalformedEdgeList {
            node_id: node_id.to_string(),
            found: json_kind(edges).to_string(),
        })?;

    let parsed: Vec<WorkflowEdge> = raw
        .iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(edge) => Some(edge),
            Err(err) => {
                tracing::warn!(node = %node_id, error = %err, "skipping malformed edge");
                None
            }
        })
        .collect();

    Ok(collect(node_id, &parsed, outputs))
}

/// Renders a node output as the string the merge engine operates on.
///
/// The rendering must be deterministic: integral numbers drop their
/// fractional part, booleans use their literal form, null is empty, and
/// structured values use compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
