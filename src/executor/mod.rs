//! Node execution: building a node's effective input and dispatching to its
//! kind-specific processing step.
//!
//! The executor imposes no ordering of its own. The caller traverses nodes
//! in an order where producers run before consumers; when that order is
//! violated the missing producers simply contribute no input. Failures are
//! per node and never abort sibling nodes.

use crate::collect::{self, NodeOutputs};
use crate::error::ExecutionError;
use crate::graph::{ModelParams, WorkflowEdge, WorkflowNode};
use ahash::AHashMap;
use serde_json::Value;

mod processors;

pub use processors::{AgentClient, AgentRequest, NodeProcessor};
use processors::{AgentProcessor, InputProcessor, OutputProcessor};

/// Shared state of one workflow run: the externally supplied user text and
/// the output map the executor fills in as nodes complete.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    pub user_input: String,
    pub outputs: NodeOutputs,
}

impl ExecutionContext {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            outputs: NodeOutputs::new(),
        }
    }

    /// The output a node produced earlier in this run, if any.
    pub fn output_of(&self, node_id: &str) -> Option<&Value> {
        self.outputs.get(node_id)
    }
}

/// Where a node currently stands in its resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRunState {
    Pending,
    Collecting,
    Merging,
    Resolving,
    Processing,
    Completed,
    Failed,
}

/// The outcome of one node in a sequenced run.
#[derive(Debug)]
pub struct NodeRunRecord {
    pub node_id: String,
    pub state: NodeRunState,
    pub output: Option<String>,
    pub error: Option<ExecutionError>,
}

/// Per-run summary produced by [`NodeExecutor::execute_sequence`].
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub records: Vec<NodeRunRecord>,
}

impl ExecutionReport {
    pub fn completed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.state == NodeRunState::Completed)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &NodeRunRecord> {
        self.records
            .iter()
            .filter(|r| r.state == NodeRunState::Failed)
    }

    pub fn record(&self, node_id: &str) -> Option<&NodeRunRecord> {
        self.records.iter().find(|r| r.node_id == node_id)
    }
}

/// Executes workflow nodes by dispatching to kind-specific processors.
pub struct NodeExecutor {
    processors: AHashMap<String, Box<dyn NodeProcessor>>,
}

pub struct NodeExecutorBuilder {
    processors: AHashMap<String, Box<dyn NodeProcessor>>,
}

impl NodeExecutorBuilder {
    pub fn new(agent_client: Box<dyn AgentClient>) -> Self {
        let mut processors: AHashMap<String, Box<dyn NodeProcessor>> = AHashMap::new();
        let defaults: Vec<Box<dyn NodeProcessor>> = vec![
            Box::new(InputProcessor),
            Box::new(AgentProcessor::new(agent_client)),
            Box::new(OutputProcessor),
        ];
        for processor in defaults {
            processors.insert(processor.kind().to_string(), processor);
        }
        Self { processors }
    }

    /// Registers (or replaces) the processor for a node kind. Extension
    /// kinds get their processing step through this hook.
    pub fn with_processor(mut self, processor: Box<dyn NodeProcessor>) -> Self {
        self.processors
            .insert(processor.kind().to_string(), processor);
        self
    }

    pub fn build(self) -> NodeExecutor {
        NodeExecutor {
            processors: self.processors,
        }
    }
}

impl NodeExecutor {
    pub fn builder(agent_client: Box<dyn AgentClient>) -> NodeExecutorBuilder {
        NodeExecutorBuilder::new(agent_client)
    }

    /// Executes a single node: collects its inbound values, merges or
    /// resolves them into one effective input, runs the kind-specific
    /// processing step, and records the output in the shared map before
    /// returning.
    pub fn execute(
        &self,
        node: &WorkflowNode,
        edges: &[WorkflowEdge],
        ctx: &mut ExecutionContext,
    ) -> Result<String, ExecutionError> {
        let kind = node.effective_kind();
        let processor =
            self.processors
                .get(kind.tag())
                .ok_or_else(|| ExecutionError::UnregisteredKind {
                    node_id: node.id.clone(),
                    kind: kind.tag().to_string(),
                })?;

        let merged = if processor.takes_upstream_input() {
            let input = self.effective_input(node, edges, ctx);
            if input.is_empty() {
                return Err(ExecutionError::EmptyInput {
                    node_id: node.id.clone(),
                    kind,
                });
            }
            input
        } else {
            String::new()
        };

        tracing::info!(node = %node.id, kind = %kind, "processing node");
        let output = processor.process(node, &merged, ctx)?;

        // Written before any dependent runs; downstream reads of absent
        // keys are "no data", never an error.
        ctx.outputs
            .insert(node.id.clone(), Value::String(output.clone()));
        tracing::info!(node = %node.id, chars = output.len(), "node completed");
        Ok(output)
    }

    /// Executes nodes in the caller-chosen order, isolating failures: a
    /// failed node is recorded and its siblings still run.
    pub fn execute_sequence(
        &self,
        nodes: &[WorkflowNode],
        edges: &[WorkflowEdge],
        ctx: &mut ExecutionContext,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        for node in nodes {
            let record = match self.execute(node, edges, ctx) {
                Ok(output) => NodeRunRecord {
                    node_id: node.id.clone(),
                    state: NodeRunState::Completed,
                    output: Some(output),
                    error: None,
                },
                Err(err) => {
                    tracing::error!(node = %node.id, error = %err, "node failed");
                    NodeRunRecord {
                        node_id: node.id.clone(),
                        state: NodeRunState::Failed,
                        output: None,
                        error: Some(err),
                    }
                }
            };
            report.records.push(record);
        }
        report
    }

    /// Builds the node's effective input: collected upstream values run
    /// through the multi-input configuration, or the sole connected value
    /// when multi-input is disabled.
    fn effective_input(
        &self,
        node: &WorkflowNode,
        edges: &[WorkflowEdge],
        ctx: &ExecutionContext,
    ) -> String {
        tracing::debug!(node = %node.id, state = ?NodeRunState::Collecting, "resolving input");
        let inputs = collect::collect(&node.id, edges, &ctx.outputs);
        let config = node.data.multi_input().unwrap_or_default();
        if config.enabled {
            let state = if config.use_parameter_mapping {
                NodeRunState::Resolving
            } else {
                NodeRunState::Merging
            };
            tracing::debug!(node = %node.id, state = ?state, strategy = %config.strategy, "merging inputs");
            crate::merge::merge(&inputs, &config)
        } else {
            single_input(&inputs)
        }
    }
}

/// Multi-input disabled: the node takes the sole connected value verbatim.
fn single_input(inputs: &[collect::CollectedInput]) -> String {
    inputs
        .first()
        .map(|input| input.value.clone())
        .unwrap_or_default()
}

pub(crate) fn model_params(node: &WorkflowNode) -> Option<&ModelParams> {
    match &node.data {
        crate::graph::NodeData::Agent(data) => data.model.as_ref(),
        _ => None,
    }
}
