use super::definition::{
    AgentNodeData, ExtensionNodeData, InputNodeData, NodeData, NodeKind, OutputNodeData,
    WorkflowEdge, WorkflowGraph, WorkflowNode,
};
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A trait for custom editor formats that can be converted into a
/// [`WorkflowGraph`].
///
/// The engine operates on its canonical model only. Hosts parse whatever
/// their canvas library persists, implement `IntoWorkflow` on the parsed
/// structs, and hand the result to the executor.
pub trait IntoWorkflow {
    /// Consumes the object and converts it into the canonical graph model.
    fn into_workflow(self) -> Result<WorkflowGraph, ConversionError>;
}

/// A workflow node as the editor persists it: a declared `type` tag plus a
/// free-form data map whose own `nodeType` field may repeat (or contradict)
/// the declared tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// The persisted workflow shape: raw nodes plus typed edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWorkflow {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<WorkflowEdge>,
}

impl IntoWorkflow for RawWorkflow {
    fn into_workflow(self) -> Result<WorkflowGraph, ConversionError> {
        Ok(WorkflowGraph {
            nodes: self.nodes.into_iter().map(WorkflowNode::from).collect(),
            edges: self.edges,
        })
    }
}

impl From<RawNode> for WorkflowNode {
    fn from(raw: RawNode) -> Self {
        let declared = raw.node_type.as_deref().map(NodeKind::from_tag);
        let data_tag = raw
            .data
            .get("nodeType")
            .and_then(Value::as_str)
            .map(NodeKind::from_tag);

        // The payload's tag is authoritative. Both tags being present and
        // disagreeing is a latent inconsistency in the saved workflow, so it
        // is surfaced, not silently resolved.
        let effective = match (&data_tag, &declared) {
            (Some(from_data), Some(from_node)) => {
                if from_data != from_node {
                    tracing::warn!(
                        node = %raw.id,
                        declared = %from_node,
                        data = %from_data,
                        "node type tags diverge; using the data tag"
                    );
                }
                from_data.clone()
            }
            (Some(from_data), None) => from_data.clone(),
            (None, Some(from_node)) => from_node.clone(),
            (None, None) => {
                tracing::warn!(node = %raw.id, "node carries no type tag");
                NodeKind::Extension("unknown".to_string())
            }
        };

        let data = parse_payload(&raw.id, &effective, raw.data);
        WorkflowNode {
            id: raw.id,
            kind: declared.unwrap_or_else(|| effective.clone()),
            data,
        }
    }
}

fn parse_payload(node_id: &str, kind: &NodeKind, fields: Map<String, Value>) -> NodeData {
    fn typed<T: serde::de::DeserializeOwned + Default>(node_id: &str, fields: Map<String, Value>) -> T {
        serde_json::from_value(Value::Object(fields)).unwrap_or_else(|err| {
            tracing::warn!(node = %node_id, error = %err, "malformed node payload; using defaults");
            T::default()
        })
    }

    match kind {
        NodeKind::Input => NodeData::Input(typed::<InputNodeData>(node_id, fields)),
        NodeKind::Agent => NodeData::Agent(typed::<AgentNodeData>(node_id, fields)),
        NodeKind::Output => NodeData::Output(typed::<OutputNodeData>(node_id, fields)),
        NodeKind::Extension(tag) => NodeData::Extension(ExtensionNodeData {
            tag: tag.clone(),
            fields,
        }),
    }
}

impl From<WorkflowNode> for RawNode {
    fn from(node: WorkflowNode) -> Self {
        let tag = node.data.kind().tag().to_string();
        let mut fields = match &node.data {
            NodeData::Input(data) => to_map(data),
            NodeData::Agent(data) => to_map(data),
            NodeData::Output(data) => to_map(data),
            NodeData::Extension(data) => data.fields.clone(),
        };
        fields.insert("nodeType".to_string(), Value::String(tag.clone()));
        RawNode {
            id: node.id,
            node_type: Some(tag),
            data: fields,
        }
    }
}

fn to_map<T: Serialize>(payload: &T) -> Map<String, Value> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
