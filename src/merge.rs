//! Merge strategies: collapsing several collected inputs into one value.
//!
//! This module never fails. Every strategy has a documented degradation:
//! unknown strategies merge like `Concat`, a failed array serialization
//! falls back to comma-joined concatenation, and a failed mapping
//! resolution falls back to the ordinary strategy path. Callers rely on
//! these fallbacks; they are policy, not accidents.

use crate::collect::CollectedInput;
use crate::graph::{MergeStrategy, MultiInputConfig};
use crate::mapping;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

const DEFAULT_SEPARATOR: &str = "\n";

/// Merges the collected inputs according to the node's configuration.
///
/// The empty input list yields the empty string for every strategy. Inputs
/// are sorted by timestamp (stable, so ties keep collection order) before
/// any strategy applies, which makes the merge deterministic across
/// permuted input lists.
pub fn merge(inputs: &[CollectedInput], config: &MultiInputConfig) -> String {
    if inputs.is_empty() {
        return String::new();
    }

    if config.use_parameter_mapping && !config.parameter_mappings.is_empty() {
        match mapping::resolve(inputs, &config.parameter_mappings) {
            Ok(parameters) => {
                let template = match config.template.as_deref() {
                    Some(t) if !t.is_empty() => t.to_string(),
                    _ => mapping::generate_template(&config.parameter_mappings),
                };
                return mapping::apply_parameters(&template, &parameters);
            }
            Err(err) => {
                tracing::warn!(error = %err, "parameter mapping failed, falling back to merge strategy");
            }
        }
    }

    let sorted = sort_by_timestamp(inputs);
    let separator = config.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);

    match &config.strategy {
        MergeStrategy::Concat => join_values(&sorted, separator),
        MergeStrategy::Array => {
            let values: Vec<&str> = sorted.iter().map(|input| input.value.as_str()).collect();
            render_array(&values)
        }
        MergeStrategy::First => sorted[0].value.clone(),
        MergeStrategy::Last => sorted[sorted.len() - 1].value.clone(),
        MergeStrategy::Template => {
            apply_template(config.template.as_deref().unwrap_or(""), &sorted)
        }
        MergeStrategy::Unknown(tag) => {
            tracing::warn!(strategy = %tag, "unknown merge strategy, falling back to concat");
            join_values(&sorted, DEFAULT_SEPARATOR)
        }
    }
}

fn sort_by_timestamp<'a>(inputs: &'a [CollectedInput]) -> Vec<&'a CollectedInput> {
    let mut sorted: Vec<&CollectedInput> = inputs.iter().collect();
    sorted.sort_by_key(|input| input.timestamp);
    sorted
}

fn join_values(inputs: &[&CollectedInput], separator: &str) -> String {
    inputs.iter().map(|input| input.value.as_str()).join(separator)
}

/// Serializes the ordered values as a JSON array; on failure, degrades to
/// comma-joined concatenation instead of raising.
fn render_array<T: Serialize + Display>(values: &[T]) -> String {
    match serde_json::to_string_pretty(values) {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::warn!(error = %err, "array serialization failed, falling back to concat");
            values.iter().map(|value| value.to_string()).join(", ")
        }
    }
}

/// Textual substitution over the configured template.
///
/// Supported placeholders: `{{0}}, {{1}}, …` for each sorted input's value,
/// `{{N.sourceNodeId}}` for the originating node id, `{{all}}` for all
/// values newline-joined, and `{{count}}` for the input count. Unmatched
/// placeholders stay verbatim; an empty template degrades to newline-joined
/// concatenation.
fn apply_template(template: &str, inputs: &[&CollectedInput]) -> String {
    if template.is_empty() {
        return join_values(inputs, DEFAULT_SEPARATOR);
    }

    let mut result = template.to_string();
    for (index, input) in inputs.iter().enumerate() {
        result = result.replace(&format!("{{{{{index}}}}}"), &input.value);
        result = result.replace(
            &format!("{{{{{index}.sourceNodeId}}}}"),
            &input.source_node_id,
        );
    }
    result = result.replace("{{all}}", &join_values(inputs, DEFAULT_SEPARATOR));
    result = result.replace("{{count}}", &inputs.len().to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;

    /// A value whose serialization always fails, to pin the array fallback.
    struct Unserializable(&'static str);

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("forced failure"))
        }
    }

    impl Display for Unserializable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    #[test]
    fn array_serialization_failure_falls_back_to_concat() {
        let values = [Unserializable("a"), Unserializable("b")];
        assert_eq!(render_array(&values), "a, b");
    }
}
