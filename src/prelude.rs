//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! flowmix crate. Import this module to get access to the core functionality
//! without having to import each type individually.

// Graph model and configuration
pub use crate::graph::{
    IntoWorkflow, MergeStrategy, MultiInputConfig, NodeData, NodeKind, ParameterMapping,
    WorkflowEdge, WorkflowGraph, WorkflowNode, WorkflowSnapshot,
};

// Execution
pub use crate::executor::{
    AgentClient, AgentRequest, ExecutionContext, ExecutionReport, NodeExecutor, NodeProcessor,
    NodeRunState,
};

// Collection and merging
pub use crate::collect::{CollectedInput, NodeOutputs, collect};
pub use crate::merge::merge;

// Schema discovery and binding assistance
pub use crate::compat::{CompatibilityLevel, CompatibilityResult};
pub use crate::recommend::{VisualParameterBinding, recommend_bindings};
pub use crate::schema::{ParamType, ParameterSchema, SchemaRegistry};

// Error types
pub use crate::error::{CollectError, ExecutionError, ResolveError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
