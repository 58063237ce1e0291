use super::definition::{WorkflowEdge, WorkflowGraph, WorkflowNode};
use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::fs;

/// The persisted form of a workflow.
///
/// Nodes, edges, and every configuration object they embed round-trip
/// losslessly through this shape; it is the interchange format between the
/// engine and whatever storage medium the host chooses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    pub version: String,
}

impl WorkflowSnapshot {
    pub const CURRENT_VERSION: &str = "1.0";

    pub fn new(graph: WorkflowGraph) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
            version: Self::CURRENT_VERSION.to_string(),
        }
    }

    pub fn into_graph(self) -> WorkflowGraph {
        WorkflowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the snapshot to a file as JSON.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
