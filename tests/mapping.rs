//! Tests for the parameter mapping resolver.
mod common;
use common::*;
use flowmix::error::ResolveError;
use flowmix::graph::ParameterMapping;
use flowmix::mapping::{apply_parameters, generate_template, resolve};

#[test]
fn resolves_satisfied_mappings_to_upstream_values() {
    let inputs = hello_world_inputs();
    let mappings = vec![mapping("greeting", "node1", true), mapping("subject", "node2", false)];

    let resolved = resolve(&inputs, &mappings).expect("all mappings satisfied");

    assert_eq!(resolved.get("greeting").map(String::as_str), Some("Hello"));
    assert_eq!(resolved.get("subject").map(String::as_str), Some("World"));
}

#[test]
fn missing_required_source_fails_with_both_names() {
    let mappings = vec![mapping("userInput", "n1", true)];

    let err = resolve(&hello_world_inputs(), &mappings).unwrap_err();

    assert_eq!(
        err,
        ResolveError::MissingRequiredParameter {
            parameter_name: "userInput".to_string(),
            source_node_id: "n1".to_string(),
        }
    );
    assert!(err.to_string().contains("userInput"));
    assert!(err.to_string().contains("n1"));
}

#[test]
fn missing_optional_source_uses_default_value() {
    let mappings = vec![ParameterMapping {
        default_value: Some("fallback".to_string()),
        ..mapping("topic", "ghost", false)
    }];

    let resolved = resolve(&hello_world_inputs(), &mappings).expect("optional mapping");
    assert_eq!(resolved.get("topic").map(String::as_str), Some("fallback"));
}

#[test]
fn missing_optional_source_without_default_is_empty() {
    let mappings = vec![mapping("topic", "ghost", false)];

    let resolved = resolve(&hello_world_inputs(), &mappings).expect("optional mapping");
    assert_eq!(resolved.get("topic").map(String::as_str), Some(""));
}

#[test]
fn generated_template_lists_one_line_per_mapping() {
    let mappings = vec![mapping("greeting", "node1", true), mapping("subject", "node2", true)];

    assert_eq!(
        generate_template(&mappings),
        "greeting: {{greeting}}\nsubject: {{subject}}"
    );
}

#[test]
fn empty_mapping_list_generates_the_all_placeholder() {
    assert_eq!(generate_template(&[]), "{{all}}");
}

#[test]
fn apply_parameters_leaves_unknown_placeholders_verbatim() {
    let mut params = ahash::AHashMap::new();
    params.insert("name".to_string(), "flowmix".to_string());

    assert_eq!(
        apply_parameters("{{name}} / {{other}}", &params),
        "flowmix / {{other}}"
    );
}

#[test]
fn collect_then_resolve_round_trips_the_upstream_value() {
    // A fully satisfied required mapping returns exactly the upstream value.
    let edges = vec![edge("edge1", "producer", "sink")];
    let outputs = outputs(&[("producer", "the exact value")]);

    let inputs = flowmix::collect::collect("sink", &edges, &outputs);
    let resolved = resolve(&inputs, &[mapping("payload", "producer", true)]).expect("satisfied");

    assert_eq!(resolved.get("payload").map(String::as_str), Some("the exact value"));
}
