use super::{ExecutionContext, model_params};
use crate::error::ExecutionError;
use crate::graph::{ModelParams, WorkflowNode};

/// One request to the external model behind an agent node.
#[derive(Debug)]
pub struct AgentRequest<'a> {
    pub input: &'a str,
    pub model: Option<&'a ModelParams>,
}

/// The seam to the external model call. The host supplies its chat service
/// here; tests and the CLI use canned clients. The call may block (or, in
/// an async host, be driven from a blocking shim) — the engine only cares
/// about the returned text.
pub trait AgentClient: Send + Sync {
    fn complete(
        &self,
        request: AgentRequest<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Defines the contract for processing one node kind.
pub trait NodeProcessor: Send + Sync {
    /// The kind tag this processor answers for.
    fn kind(&self) -> &str;

    /// Whether the node consumes upstream input. Kinds that do fail with an
    /// empty-input diagnosis when the merged input is empty.
    fn takes_upstream_input(&self) -> bool {
        true
    }

    /// The kind-specific transformation. `input` is the merged effective
    /// input (empty for kinds that take none).
    fn process(
        &self,
        node: &WorkflowNode,
        input: &str,
        ctx: &ExecutionContext,
    ) -> Result<String, ExecutionError>;
}

/// Input nodes emit the externally supplied user text verbatim.
pub(super) struct InputProcessor;

impl NodeProcessor for InputProcessor {
    fn kind(&self) -> &str {
        "input"
    }

    fn takes_upstream_input(&self) -> bool {
        false
    }

    fn process(
        &self,
        _node: &WorkflowNode,
        _input: &str,
        ctx: &ExecutionContext,
    ) -> Result<String, ExecutionError> {
        Ok(ctx.user_input.clone())
    }
}

/// Agent nodes hand their merged input to the external model.
pub(super) struct AgentProcessor {
    client: Box<dyn AgentClient>,
}

impl AgentProcessor {
    pub(super) fn new(client: Box<dyn AgentClient>) -> Self {
        Self { client }
    }
}

impl NodeProcessor for AgentProcessor {
    fn kind(&self) -> &str {
        "agent"
    }

    fn process(
        &self,
        node: &WorkflowNode,
        input: &str,
        _ctx: &ExecutionContext,
    ) -> Result<String, ExecutionError> {
        let request = AgentRequest {
            input,
            model: model_params(node),
        };
        self.client
            .complete(request)
            .map_err(|source| ExecutionError::Processor {
                node_id: node.id.clone(),
                message: "agent call failed".to_string(),
                source: Some(source),
            })
    }
}

/// Output nodes pass their merged input through. Formatting according to
/// the node's display format belongs to the host UI.
pub(super) struct OutputProcessor;

impl NodeProcessor for OutputProcessor {
    fn kind(&self) -> &str {
        "output"
    }

    fn process(
        &self,
        _node: &WorkflowNode,
        input: &str,
        _ctx: &ExecutionContext,
    ) -> Result<String, ExecutionError> {
        Ok(input.to_string())
    }
}
