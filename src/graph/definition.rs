use super::config::MultiInputConfig;
use super::conversion::RawNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The kind of a workflow node.
///
/// The three built-in kinds cover the stock editor palette; everything a
/// plugin registers lands in the `Extension` arm, keyed by its lower-case
/// type tag. Schema and processor tables dispatch on [`NodeKind::tag`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Input,
    Agent,
    Output,
    Extension(String),
}

impl NodeKind {
    /// Parses a type tag. Unknown tags become `Extension`; matching is
    /// case-insensitive because persisted workflows are not.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "input" => NodeKind::Input,
            "agent" => NodeKind::Agent,
            "output" => NodeKind::Output,
            other => NodeKind::Extension(other.to_string()),
        }
    }

    /// The lower-case tag this kind serializes to.
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Agent => "agent",
            NodeKind::Output => "output",
            NodeKind::Extension(tag) => tag,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Model parameters an agent node forwards to the external model call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Payload of an input node: a prompt placeholder plus the text it last
/// produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_value: Option<String>,
}

/// Payload of an agent node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_value: Option<String>,
    #[serde(default, rename = "modelConfig", skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelParams>,
    #[serde(default, rename = "multiInputConfig", skip_serializing_if = "Option::is_none")]
    pub multi_input: Option<MultiInputConfig>,
}

/// How an output node renders its final value. A formatting hook for the
/// host UI; the engine itself passes the value through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Payload of an output node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default)]
    pub format: DisplayFormat,
    #[serde(default, rename = "multiInputConfig", skip_serializing_if = "Option::is_none")]
    pub multi_input: Option<MultiInputConfig>,
}

/// Payload of a plugin-registered node the engine has no native shape for.
/// The raw fields are kept verbatim so the snapshot round-trips losslessly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionNodeData {
    pub tag: String,
    pub fields: Map<String, Value>,
}

/// The type-specific payload of a workflow node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Input(InputNodeData),
    Agent(AgentNodeData),
    Output(OutputNodeData),
    Extension(ExtensionNodeData),
}

impl NodeData {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Input(_) => NodeKind::Input,
            NodeData::Agent(_) => NodeKind::Agent,
            NodeData::Output(_) => NodeKind::Output,
            NodeData::Extension(data) => NodeKind::Extension(data.tag.clone()),
        }
    }

    /// The node's multi-input configuration, if it carries one.
    ///
    /// Extension payloads keep their fields as raw JSON; a malformed
    /// `multiInputConfig` there is treated as absent rather than an error.
    pub fn multi_input(&self) -> Option<MultiInputConfig> {
        match self {
            NodeData::Input(_) => None,
            NodeData::Agent(data) => data.multi_input.clone(),
            NodeData::Output(data) => data.multi_input.clone(),
            NodeData::Extension(data) => data
                .fields
                .get("multiInputConfig")
                .and_then(|value| serde_json::from_value(value.clone()).ok()),
        }
    }
}

/// A single node of the workflow graph.
///
/// `kind` is the tag the editor declared on the node itself; the payload
/// carries its own tag, which wins when the two disagree (see
/// [`WorkflowNode::effective_kind`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct WorkflowNode {
    pub id: String,
    pub kind: NodeKind,
    pub data: NodeData,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        let kind = data.kind();
        Self {
            id: id.into(),
            kind,
            data,
        }
    }

    /// The kind the engine dispatches on. The payload's tag is
    /// authoritative; the declared `kind` only matters while deserializing
    /// workflows saved before payloads carried their own tag.
    pub fn effective_kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Whether the declared and payload tags disagree. Conversion already
    /// logs this; the helper exists so hosts can surface it in diagnostics.
    pub fn kind_diverged(&self) -> bool {
        self.kind != self.data.kind()
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// The canonical in-memory form of a workflow: resolved nodes plus edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

impl WorkflowGraph {
    /// Drops edges whose endpoints do not exist in the node list and
    /// returns how many were removed. Must run before execution; edges
    /// referencing deleted nodes are invalid.
    pub fn prune_dangling_edges(&mut self) -> usize {
        let before = self.edges.len();
        self.edges.retain(|edge| {
            let ok = self.nodes.iter().any(|n| n.id == edge.source)
                && self.nodes.iter().any(|n| n.id == edge.target);
            if !ok {
                tracing::warn!(
                    edge = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "pruning edge with missing endpoint"
                );
            }
            ok
        });
        before - self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
