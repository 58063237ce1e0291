//! Explicit parameter mapping: binding named target parameters to specific
//! upstream outputs.

use crate::collect::CollectedInput;
use crate::error::ResolveError;
use crate::graph::ParameterMapping;
use ahash::AHashMap;
use itertools::Itertools;

/// Resolves each mapping against the collected inputs.
///
/// A mapping resolves to the value of the input whose source node matches.
/// Missing sources fail the pass only for required mappings; optional ones
/// fall back to their default (empty when unset).
pub fn resolve(
    inputs: &[CollectedInput],
    mappings: &[ParameterMapping],
) -> Result<AHashMap<String, String>, ResolveError> {
    let mut resolved = AHashMap::with_capacity(mappings.len());

    for mapping in mappings {
        let matching = inputs
            .iter()
            .find(|input| input.source_node_id == mapping.source_node_id);

        match matching {
            Some(input) => {
                resolved.insert(mapping.parameter_name.clone(), input.value.clone());
            }
            None if mapping.required => {
                return Err(ResolveError::MissingRequiredParameter {
                    parameter_name: mapping.parameter_name.clone(),
                    source_node_id: mapping.source_node_id.clone(),
                });
            }
            None => {
                resolved.insert(
                    mapping.parameter_name.clone(),
                    mapping.default_value.clone().unwrap_or_default(),
                );
            }
        }
    }

    Ok(resolved)
}

/// Builds the default template used when a node is in mapping mode but has
/// not authored a custom one: one `name: {{name}}` line per mapping, or the
/// literal `{{all}}` when there are no mappings.
pub fn generate_template(mappings: &[ParameterMapping]) -> String {
    if mappings.is_empty() {
        return "{{all}}".to_string();
    }

    mappings
        .iter()
        .map(|mapping| {
            format!(
                "{}: {{{{{}}}}}",
                mapping.parameter_name, mapping.parameter_name
            )
        })
        .join("\n")
}

/// Substitutes `{{name}}` placeholders with resolved parameter values.
/// Placeholders without a matching parameter are left verbatim.
pub fn apply_parameters(template: &str, parameters: &AHashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (name, value) in parameters {
        result = result.replace(&format!("{{{{{name}}}}}"), value);
    }
    result
}
