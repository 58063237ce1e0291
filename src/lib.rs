//! # Flowmix - Workflow Parameter Resolution and Multi-Input Merge Engine
//!
//! **Flowmix** is the execution core behind a node-based workflow editor: given
//! a directed graph of workflow nodes and edges, it decides what data each node
//! receives, how multiple upstream outputs collapse into a single value, how
//! named parameters bind across nodes of different shapes, and how type
//! mismatches between a producer and a consumer are detected, scored, and
//! optionally auto-converted.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic. It operates on a canonical internal model of
//! a workflow graph. The primary workflow is:
//!
//! 1.  **Load Your Data**: Parse whatever your canvas library persists into your own Rust structs.
//! 2.  **Convert to Flowmix's Model**: Implement the `IntoWorkflow` trait (or deserialize
//!     straight into `WorkflowSnapshot`) to obtain a `WorkflowGraph`.
//! 3.  **Execute**: Build a `NodeExecutor` with an `AgentClient` for the external model call,
//!     then invoke it per node in your chosen order. Each node's output lands in the shared
//!     output map and feeds its dependents.
//! 4.  **Assist**: Use the `schema`, `compat`, and `recommend` modules to discover parameters,
//!     check type compatibility, and rank automatic binding suggestions in the editor UI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowmix::prelude::*;
//!
//! // The seam to your model backend. Tests and demos can use a canned client.
//! struct EchoAgent;
//!
//! impl AgentClient for EchoAgent {
//!     fn complete(
//!         &self,
//!         request: AgentRequest<'_>,
//!     ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
//!         Ok(format!("echo: {}", request.input))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     // Load a persisted workflow and resolve it into the canonical model.
//!     let snapshot = WorkflowSnapshot::from_file("workflow.json")?;
//!     let mut graph = snapshot.into_graph();
//!     graph.prune_dangling_edges();
//!
//!     // Execute nodes in dependency order (the caller owns the order).
//!     let executor = NodeExecutor::builder(Box::new(EchoAgent)).build();
//!     let mut ctx = ExecutionContext::new("Hello there");
//!     let report = executor.execute_sequence(&graph.nodes, &graph.edges, &mut ctx);
//!
//!     for record in &report.records {
//!         match &record.output {
//!             Some(output) => println!("{} -> {}", record.node_id, output),
//!             None => println!("{} failed", record.node_id),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod collect;
pub mod compat;
pub mod error;
pub mod executor;
pub mod graph;
pub mod mapping;
pub mod merge;
pub mod prelude;
pub mod recommend;
pub mod schema;
