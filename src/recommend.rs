//! Binding recommendations: ranking candidate parameter bindings between
//! two adjacent nodes by a confidence score.
//!
//! Confidence combines the compatibility verdict with name similarity
//! (Levenshtein over lower-cased names) and a token-overlap reading of the
//! parameter descriptions. The generator is pure apart from the schema
//! cache it reads through.

use crate::compat::{self, CompatibilityLevel};
use crate::graph::WorkflowNode;
use crate::schema::{ParamType, ParameterSchema, SchemaRegistry};
use serde::{Deserialize, Serialize};

/// Which side of a node a parameter sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamDirection {
    Input,
    Output,
}

/// One end of a proposed binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPoint {
    pub node_id: String,
    pub parameter_name: String,
    pub parameter_type: ParamType,
    pub direction: ParamDirection,
}

/// Whether a binding forwards the value as-is or through a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Direct,
    Transformed,
}

/// A system-suggested binding between a source output and a target input,
/// ranked by confidence. Accepted recommendations are snapshotted into
/// [`ParameterMapping::visual_binding`](crate::graph::ParameterMapping) for
/// audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParameterBinding {
    #[serde(rename = "sourceConnectionPoint")]
    pub source: ConnectionPoint,
    #[serde(rename = "targetConnectionPoint")]
    pub target: ConnectionPoint,
    pub binding_type: BindingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_expression: Option<String>,
    pub is_compatible: bool,
    pub confidence: f64,
}

/// Ranks candidate bindings from `source_node`'s outputs onto
/// `target_node`'s required inputs, best first.
pub fn recommend_bindings(
    registry: &mut SchemaRegistry,
    source_node: &WorkflowNode,
    target_node: &WorkflowNode,
) -> Vec<VisualParameterBinding> {
    let source_params = registry.output_schema(source_node);
    let target_params = registry.input_schema(target_node);

    let mut recommendations = Vec::new();

    for target_param in &target_params {
        // Only required inputs are worth auto-binding.
        if !target_param.required {
            continue;
        }

        for source_param in &source_params {
            let verdict = compat::check(source_param, target_param);
            if !verdict.is_compatible {
                continue;
            }

            let confidence = binding_confidence(source_param, target_param, verdict.level);
            recommendations.push(VisualParameterBinding {
                source: ConnectionPoint {
                    node_id: source_node.id.clone(),
                    parameter_name: source_param.name.clone(),
                    parameter_type: source_param.param_type.clone(),
                    direction: ParamDirection::Output,
                },
                target: ConnectionPoint {
                    node_id: target_node.id.clone(),
                    parameter_name: target_param.name.clone(),
                    parameter_type: target_param.param_type.clone(),
                    direction: ParamDirection::Input,
                },
                binding_type: if verdict.level == CompatibilityLevel::Exact {
                    BindingKind::Direct
                } else {
                    BindingKind::Transformed
                },
                transform_expression: verdict.transform_expression,
                is_compatible: true,
                confidence,
            });
        }
    }

    // Stable sort: equal-confidence candidates keep generation order, which
    // is itself deterministic (schema order).
    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    recommendations
}

/// `0.5 base + 0.3 exact-type + 0.2 name similarity + 0.1 description
/// similarity`, clamped to `[0, 1]`.
fn binding_confidence(
    source: &ParameterSchema,
    target: &ParameterSchema,
    level: CompatibilityLevel,
) -> f64 {
    let mut confidence = 0.5;

    if level == CompatibilityLevel::Exact {
        confidence += 0.3;
    }

    confidence += 0.2 * name_similarity(&source.name, &target.name);

    let source_desc = source.description.as_deref().unwrap_or(&source.name);
    let target_desc = target.description.as_deref().unwrap_or(&target.name);
    confidence += 0.1 * semantic_similarity(source_desc, target_desc);

    confidence.clamp(0.0, 1.0)
}

/// 1.0 for identical names (case-insensitive), 0.8 when one contains the
/// other, otherwise `1 - distance / max_length`.
pub(crate) fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.8;
    }

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein(&a, &b);
    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

/// Token-overlap ratio of two descriptions: `|intersection| / |union|` of
/// the lower-cased whitespace-split token sets, 0 when either is empty.
pub(crate) fn semantic_similarity(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;

    let tokens_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let tokens_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

/// Standard Levenshtein edit distance, single-row implementation.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=a.len()).collect();
    for (j, bc) in b.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = j + 1;
        for (i, ac) in a.iter().enumerate() {
            let substitution = previous_diagonal + usize::from(ac != bc);
            previous_diagonal = row[i + 1];
            row[i + 1] = substitution.min(row[i] + 1).min(previous_diagonal + 1);
        }
    }
    row[a.len()]
}
