use crate::recommend::VisualParameterBinding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The policy for collapsing several upstream values into one.
///
/// Persisted configurations may carry strategy strings this version does not
/// know; those deserialize into `Unknown` and merge like `Concat` with the
/// default separator instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MergeStrategy {
    #[default]
    Concat,
    Array,
    First,
    Last,
    Template,
    Unknown(String),
}

impl MergeStrategy {
    pub fn tag(&self) -> &str {
        match self {
            MergeStrategy::Concat => "concat",
            MergeStrategy::Array => "array",
            MergeStrategy::First => "first",
            MergeStrategy::Last => "last",
            MergeStrategy::Template => "template",
            MergeStrategy::Unknown(tag) => tag,
        }
    }
}

impl From<String> for MergeStrategy {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "concat" => MergeStrategy::Concat,
            "array" => MergeStrategy::Array,
            "first" => MergeStrategy::First,
            "last" => MergeStrategy::Last,
            "template" => MergeStrategy::Template,
            other => MergeStrategy::Unknown(other.to_string()),
        }
    }
}

impl From<MergeStrategy> for String {
    fn from(strategy: MergeStrategy) -> Self {
        strategy.tag().to_string()
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Whether a mapping was authored by hand or accepted from a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    #[default]
    Manual,
    Auto,
}

/// An explicit binding of one target parameter to one upstream node's output.
///
/// Mappings are replaced whole, never edited in place. Removing stale
/// mappings when their source node or edge disappears is the caller's job;
/// the engine performs no implicit cleanup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMapping {
    pub parameter_name: String,
    pub source_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_parameter_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub binding_mode: BindingMode,
    /// Snapshot of the recommendation this mapping was accepted from, kept
    /// for audit and debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_binding: Option<VisualParameterBinding>,
    /// Millisecond timestamp of the last whole-record replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<u64>,
}

/// Filters out structurally useless mappings from a persisted list.
///
/// Damaged saves are tolerated: a record without a parameter name or source
/// node cannot resolve anything, so it is dropped with a warning rather than
/// failing the whole configuration.
pub fn sanitize_mappings(mappings: &[ParameterMapping]) -> Vec<ParameterMapping> {
    mappings
        .iter()
        .filter(|mapping| {
            let ok = !mapping.parameter_name.is_empty() && !mapping.source_node_id.is_empty();
            if !ok {
                tracing::warn!(
                    parameter = %mapping.parameter_name,
                    source = %mapping.source_node_id,
                    "dropping parameter mapping with missing identifiers"
                );
            }
            ok
        })
        .cloned()
        .collect()
}

/// Per-node configuration for nodes with several inbound edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiInputConfig {
    #[serde(default)]
    pub strategy: MergeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// When false the node behaves as single-input and takes the sole
    /// connected value verbatim.
    #[serde(default)]
    pub enabled: bool,
    /// Switches the node from merge-strategy mode to explicit-mapping mode.
    #[serde(default)]
    pub use_parameter_mapping: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_mappings: Vec<ParameterMapping>,
}

impl Default for MultiInputConfig {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::Concat,
            separator: Some("\n".to_string()),
            template: None,
            enabled: false,
            use_parameter_mapping: false,
            parameter_mappings: Vec::new(),
        }
    }
}

impl MultiInputConfig {
    /// Whether a UI should accept this configuration as-is. The merge engine
    /// itself never rejects a config; it degrades instead.
    pub fn validate(&self) -> bool {
        match self.strategy {
            MergeStrategy::Unknown(_) => false,
            MergeStrategy::Template => self.template.as_deref().is_some_and(|t| !t.is_empty()),
            _ => true,
        }
    }
}
