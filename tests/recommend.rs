//! Tests for the binding recommendation generator.
mod common;
use common::*;
use flowmix::graph::WorkflowNode;
use flowmix::recommend::{BindingKind, ParamDirection, recommend_bindings};
use flowmix::schema::{ParamType, ParameterSchema, SchemaProvider, SchemaRegistry};

#[test]
fn input_to_agent_recommends_the_text_binding() {
    let mut registry = SchemaRegistry::builder().build();
    let source = input_node("n1");
    let target = agent_node("n2");

    let bindings = recommend_bindings(&mut registry, &source, &target);

    assert_eq!(bindings.len(), 1);
    let binding = &bindings[0];
    assert_eq!(binding.source.node_id, "n1");
    assert_eq!(binding.source.parameter_name, "userInput");
    assert_eq!(binding.source.direction, ParamDirection::Output);
    assert_eq!(binding.target.node_id, "n2");
    assert_eq!(binding.target.parameter_name, "text");
    assert_eq!(binding.target.direction, ParamDirection::Input);
    assert_eq!(binding.binding_type, BindingKind::Direct);
    assert!(binding.is_compatible);
    // Base 0.5 + exact 0.3; names differ, so confidence sits above 0.8.
    assert!(binding.confidence >= 0.8 && binding.confidence <= 1.0);
}

#[test]
fn terminal_nodes_produce_no_recommendations() {
    let mut registry = SchemaRegistry::builder().build();

    // Output nodes expose no outputs, input nodes require no inputs.
    let bindings = recommend_bindings(&mut registry, &output_node("n1"), &agent_node("n2"));
    assert!(bindings.is_empty());

    let bindings = recommend_bindings(&mut registry, &agent_node("n1"), &input_node("n2"));
    assert!(bindings.is_empty());
}

/// A plugin-registered node kind with several typed outputs.
struct SensorProvider;

impl SchemaProvider for SensorProvider {
    fn kind(&self) -> &str {
        "sensor"
    }

    fn input_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        Vec::new()
    }

    fn output_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("text", ParamType::String)
                .with_description("reading rendered as text"),
            ParameterSchema::new("reading", ParamType::Number)
                .with_description("numeric sensor reading"),
            ParameterSchema::new("payload", ParamType::Object)
                .with_description("full reading payload"),
        ]
    }
}

fn sensor_node(id: &str) -> WorkflowNode {
    let raw: flowmix::graph::RawNode = serde_json::from_value(serde_json::json!({
        "id": id,
        "type": "sensor",
        "data": { "nodeType": "sensor" }
    }))
    .expect("raw node");
    WorkflowNode::from(raw)
}

#[test]
fn recommendations_rank_exact_name_matches_first() {
    let mut registry = SchemaRegistry::builder()
        .with_provider(Box::new(SensorProvider))
        .build();

    let source = sensor_node("sensor1");
    let target = agent_node("agent1");

    let bindings = recommend_bindings(&mut registry, &source, &target);

    // "payload" (object -> string) is partial but still compatible;
    // "reading" converts; "text" matches the target name exactly.
    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings[0].source.parameter_name, "text");
    assert_eq!(bindings[0].binding_type, BindingKind::Direct);
    assert!(bindings[0].confidence > bindings[1].confidence);
    assert!(bindings[1].confidence >= bindings[2].confidence);

    // Descending order throughout.
    for pair in bindings.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}

#[test]
fn non_exact_pairs_carry_a_transform_expression() {
    let mut registry = SchemaRegistry::builder()
        .with_provider(Box::new(SensorProvider))
        .build();

    let bindings = recommend_bindings(&mut registry, &sensor_node("s"), &agent_node("a"));
    let reading = bindings
        .iter()
        .find(|b| b.source.parameter_name == "reading")
        .expect("number output is convertible");

    assert_eq!(reading.binding_type, BindingKind::Transformed);
    assert_eq!(reading.transform_expression.as_deref(), Some("String({{value}})"));
}

#[test]
fn confidence_is_clamped_to_unit_interval() {
    let mut registry = SchemaRegistry::builder().build();

    // agent.response (string) -> output.content (string): exact type plus
    // some token overlap; must never exceed 1.0.
    let bindings = recommend_bindings(&mut registry, &agent_node("a"), &output_node("o"));
    assert_eq!(bindings.len(), 1);
    assert!(bindings[0].confidence <= 1.0);
    assert!(bindings[0].confidence >= 0.5);
}

#[test]
fn bindings_round_trip_through_json() {
    let mut registry = SchemaRegistry::builder().build();
    let bindings = recommend_bindings(&mut registry, &input_node("n1"), &agent_node("n2"));

    let json = serde_json::to_string(&bindings).expect("serialize");
    assert!(json.contains("sourceConnectionPoint"));
    let back: Vec<flowmix::recommend::VisualParameterBinding> =
        serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, bindings);
}
