//! Common test utilities for building workflow graphs and canned inputs.
use flowmix::collect::{CollectedInput, NodeOutputs};
use flowmix::executor::{AgentClient, AgentRequest};
use flowmix::graph::{
    AgentNodeData, InputNodeData, MultiInputConfig, NodeData, OutputNodeData, ParameterMapping,
    WorkflowEdge, WorkflowNode,
};
use serde_json::Value;

#[allow(dead_code)]
pub fn input_node(id: &str) -> WorkflowNode {
    WorkflowNode::new(id, NodeData::Input(InputNodeData::default()))
}

#[allow(dead_code)]
pub fn agent_node(id: &str) -> WorkflowNode {
    WorkflowNode::new(id, NodeData::Agent(AgentNodeData::default()))
}

#[allow(dead_code)]
pub fn output_node(id: &str) -> WorkflowNode {
    WorkflowNode::new(id, NodeData::Output(OutputNodeData::default()))
}

/// An output node with an enabled multi-input configuration.
#[allow(dead_code)]
pub fn output_node_with_config(id: &str, config: MultiInputConfig) -> WorkflowNode {
    WorkflowNode::new(
        id,
        NodeData::Output(OutputNodeData {
            multi_input: Some(config),
            ..OutputNodeData::default()
        }),
    )
}

#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str) -> WorkflowEdge {
    WorkflowEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: None,
        target_handle: None,
    }
}

/// Builds an output map from `(node id, text)` pairs.
#[allow(dead_code)]
pub fn outputs(pairs: &[(&str, &str)]) -> NodeOutputs {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), Value::String(value.to_string())))
        .collect()
}

/// Builds a collected input directly, bypassing collection, for merge and
/// mapping tests that need explicit timestamps.
#[allow(dead_code)]
pub fn collected(source: &str, edge_id: &str, value: &str, timestamp: u64) -> CollectedInput {
    CollectedInput {
        source_node_id: source.to_string(),
        edge_id: edge_id.to_string(),
        value: value.to_string(),
        timestamp,
        source_handle: None,
    }
}

/// The standard three-input fixture: Hello / World / ! in timestamp order.
#[allow(dead_code)]
pub fn hello_world_inputs() -> Vec<CollectedInput> {
    vec![
        collected("node1", "edge1", "Hello", 1000),
        collected("node2", "edge2", "World", 2000),
        collected("node3", "edge3", "!", 3000),
    ]
}

#[allow(dead_code)]
pub fn mapping(parameter: &str, source: &str, required: bool) -> ParameterMapping {
    ParameterMapping {
        parameter_name: parameter.to_string(),
        source_node_id: source.to_string(),
        required,
        ..ParameterMapping::default()
    }
}

/// A deterministic agent client for executor tests.
#[allow(dead_code)]
pub struct EchoAgent;

#[allow(dead_code)]
impl EchoAgent {
    pub fn boxed() -> Box<dyn AgentClient> {
        Box::new(EchoAgent)
    }
}

impl AgentClient for EchoAgent {
    fn complete(
        &self,
        request: AgentRequest<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(format!("echo: {}", request.input))
    }
}

/// An agent client that always fails, for failure-isolation tests.
#[allow(dead_code)]
pub struct FailingAgent;

#[allow(dead_code)]
impl FailingAgent {
    pub fn boxed() -> Box<dyn AgentClient> {
        Box::new(FailingAgent)
    }
}

impl AgentClient for FailingAgent {
    fn complete(
        &self,
        _request: AgentRequest<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Err("model unavailable".into())
    }
}
