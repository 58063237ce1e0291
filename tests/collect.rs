//! Tests for the input collector.
mod common;
use common::*;
use flowmix::collect::{collect, collect_from_value, render_value};
use serde_json::json;

fn three_edges() -> Vec<flowmix::graph::WorkflowEdge> {
    vec![
        edge("edge1", "node1", "sink"),
        edge("edge2", "node2", "sink"),
        edge("edge3", "node3", "sink"),
    ]
}

#[test]
fn collects_all_connected_inputs_in_edge_order() {
    let edges = three_edges();
    let outputs = outputs(&[("node1", "Hello"), ("node2", "World"), ("node3", "!")]);

    let inputs = collect("sink", &edges, &outputs);

    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0].source_node_id, "node1");
    assert_eq!(inputs[0].value, "Hello");
    assert_eq!(inputs[0].edge_id, "edge1");
    assert_eq!(inputs[1].value, "World");
    assert_eq!(inputs[2].value, "!");
}

#[test]
fn all_inputs_of_one_pass_share_a_timestamp() {
    let edges = three_edges();
    let outputs = outputs(&[("node1", "a"), ("node2", "b"), ("node3", "c")]);

    let inputs = collect("sink", &edges, &outputs);

    assert!(inputs.iter().all(|i| i.timestamp == inputs[0].timestamp));
}

#[test]
fn zero_edges_is_empty_not_an_error() {
    let outputs = outputs(&[("node1", "Hello")]);
    let inputs = collect("sink", &[], &outputs);
    assert!(inputs.is_empty());
}

#[test]
fn missing_producers_are_skipped() {
    let edges = three_edges();
    // node2 has not executed yet.
    let outputs = outputs(&[("node1", "Hello"), ("node3", "!")]);

    let inputs = collect("sink", &edges, &outputs);

    assert_eq!(inputs.len(), 2);
    assert!(inputs.iter().any(|i| i.source_node_id == "node1"));
    assert!(inputs.iter().any(|i| i.source_node_id == "node3"));
    assert!(!inputs.iter().any(|i| i.source_node_id == "node2"));
}

#[test]
fn edges_targeting_other_nodes_are_ignored() {
    let edges = vec![edge("edge1", "node1", "sink"), edge("edge2", "node1", "elsewhere")];
    let outputs = outputs(&[("node1", "Hello")]);

    let inputs = collect("sink", &edges, &outputs);
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].edge_id, "edge1");
}

#[test]
fn raw_edge_list_must_be_an_array() {
    let outputs = outputs(&[("node1", "Hello")]);

    let err = collect_from_value("sink", &json!({"not": "an array"}), &outputs).unwrap_err();
    assert!(err.to_string().contains("sink"));

    let err = collect_from_value("sink", &json!(42), &outputs).unwrap_err();
    assert!(err.to_string().contains("number"));
}

#[test]
fn raw_edge_list_skips_malformed_elements() {
    let outputs = outputs(&[("node1", "Hello")]);
    let edges = json!([
        {"id": "edge1", "source": "node1", "target": "sink"},
        {"id": "edge2"},
        17
    ]);

    let inputs = collect_from_value("sink", &edges, &outputs).expect("array edge list");
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].value, "Hello");
}

#[test]
fn values_are_rendered_deterministically() {
    assert_eq!(render_value(&json!("text")), "text");
    assert_eq!(render_value(&json!(42.0)), "42");
    assert_eq!(render_value(&json!(2.5)), "2.5");
    assert_eq!(render_value(&json!(true)), "true");
    assert_eq!(render_value(&json!(null)), "");
    assert_eq!(render_value(&json!(["a", "b"])), r#"["a","b"]"#);
    assert_eq!(render_value(&json!({"k": 1})), r#"{"k":1}"#);
}

#[test]
fn non_string_outputs_are_coerced_during_collection() {
    let edges = vec![edge("edge1", "node1", "sink")];
    let mut outputs = flowmix::collect::NodeOutputs::new();
    outputs.insert("node1".to_string(), json!(7));

    let inputs = collect("sink", &edges, &outputs);
    assert_eq!(inputs[0].value, "7");
}
