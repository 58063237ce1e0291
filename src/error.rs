use crate::graph::NodeKind;
use thiserror::Error;

/// Errors that can occur while collecting a node's inbound values.
///
/// A node with zero connected edges or with producers that have not run yet
/// is not an error; only a malformed edge list at the raw editor boundary is.
#[derive(Error, Debug, Clone)]
pub enum CollectError {
    #[error("Edge list for node '{node_id}' is not an array (found {found})")]
    MalformedEdgeList { node_id: String, found: String },
}

/// Errors that can occur while resolving explicit parameter mappings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "Required parameter '{parameter_name}' has no output from source node '{source_node_id}'"
    )]
    MissingRequiredParameter {
        parameter_name: String,
        source_node_id: String,
    },
}

/// Per-node execution failures. Every variant names the node it belongs to;
/// a failure is reported for that node only and never aborts its siblings.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Node '{node_id}' ({kind}) received empty input")]
    EmptyInput { node_id: String, kind: NodeKind },

    #[error("Node '{node_id}' has no registered processor for kind '{kind}'")]
    UnregisteredKind { node_id: String, kind: String },

    #[error("Node '{node_id}' processing failed: {message}")]
    Processor {
        node_id: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ExecutionError {
    /// The node this failure belongs to.
    pub fn node_id(&self) -> &str {
        match self {
            ExecutionError::EmptyInput { node_id, .. }
            | ExecutionError::UnregisteredKind { node_id, .. }
            | ExecutionError::Processor { node_id, .. } => node_id,
        }
    }
}

/// Errors that can occur when converting a custom editor format into a
/// [`WorkflowGraph`](crate::graph::WorkflowGraph).
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid workflow data: {0}")]
    Validation(String),
}

/// Errors that can occur while saving or loading a workflow snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}
