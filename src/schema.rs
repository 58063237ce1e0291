//! Parameter schema discovery: what named inputs and outputs a node exposes.
//!
//! Discovery is a lookup table keyed by node kind, extensible by the plugin
//! layer through [`SchemaProvider`] trait objects. The registry owns the
//! per-node schema cache; hosts clear it whenever they change the provider
//! set, so there is no hidden module-level state to invalidate.

use crate::graph::{NodeData, NodeKind, WorkflowNode};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Normalized parameter types. Aliases collapse at parse time (`int`,
/// `integer`, `float`, `double` → `Number`; `str` → `String`; `bool` →
/// `Boolean`; `dict` → `Object`; `list`, `arr` → `Array`); anything else is
/// carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Other(String),
}

impl ParamType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "string" | "str" => ParamType::String,
            "number" | "int" | "integer" | "float" | "double" => ParamType::Number,
            "boolean" | "bool" => ParamType::Boolean,
            "object" | "dict" => ParamType::Object,
            "array" | "list" | "arr" => ParamType::Array,
            other => ParamType::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
            ParamType::Other(tag) => tag,
        }
    }

    /// The type of a JSON value, for field-scan discovery on extension nodes.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::String(_) => ParamType::String,
            Value::Number(_) => ParamType::Number,
            Value::Bool(_) => ParamType::Boolean,
            Value::Object(_) => ParamType::Object,
            Value::Array(_) => ParamType::Array,
            Value::Null => ParamType::Other("null".to_string()),
        }
    }
}

impl From<String> for ParamType {
    fn from(tag: String) -> Self {
        ParamType::from_tag(&tag)
    }
}

impl From<ParamType> for String {
    fn from(ty: ParamType) -> Self {
        ty.tag().to_string()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Describes one named parameter a node exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSchema {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            default_value: None,
            enum_values: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_enum(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Defines the contract for discovering the parameters of one node kind.
pub trait SchemaProvider: Send + Sync {
    /// The kind tag this provider answers for.
    fn kind(&self) -> &str;
    fn input_schema(&self, node: &WorkflowNode) -> Vec<ParameterSchema>;
    fn output_schema(&self, node: &WorkflowNode) -> Vec<ParameterSchema>;
}

struct InputSchemaProvider;

impl SchemaProvider for InputSchemaProvider {
    fn kind(&self) -> &str {
        "input"
    }

    // Input nodes take no data-flow inputs; they emit the user's text.
    fn input_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        Vec::new()
    }

    fn output_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("userInput", ParamType::String)
                .required()
                .with_description("Text captured from the user"),
        ]
    }
}

struct AgentSchemaProvider;

impl SchemaProvider for AgentSchemaProvider {
    fn kind(&self) -> &str {
        "agent"
    }

    fn input_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("text", ParamType::String)
                .required()
                .with_description("Text handed to the agent"),
        ]
    }

    fn output_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("response", ParamType::String)
                .required()
                .with_description("Text generated by the agent"),
        ]
    }
}

struct OutputSchemaProvider;

impl SchemaProvider for OutputSchemaProvider {
    fn kind(&self) -> &str {
        "output"
    }

    fn input_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("content", ParamType::String)
                .required()
                .with_description("Content to present"),
        ]
    }

    // Output nodes are terminal.
    fn output_schema(&self, _node: &WorkflowNode) -> Vec<ParameterSchema> {
        Vec::new()
    }
}

/// Fallback discovery for extension nodes without a registered provider:
/// data fields whose names mention "input" or "output" become optional
/// parameters typed by their JSON value.
struct FieldScanProvider;

impl FieldScanProvider {
    fn scan(node: &WorkflowNode, needle: &str) -> Vec<ParameterSchema> {
        let NodeData::Extension(data) = &node.data else {
            return Vec::new();
        };
        data.fields
            .iter()
            .filter(|(name, _)| name.to_ascii_lowercase().contains(needle))
            .map(|(name, value)| {
                ParameterSchema::new(name.clone(), ParamType::of_value(value))
                    .with_default(value.clone())
            })
            .collect()
    }
}

impl SchemaProvider for FieldScanProvider {
    fn kind(&self) -> &str {
        "*"
    }

    fn input_schema(&self, node: &WorkflowNode) -> Vec<ParameterSchema> {
        Self::scan(node, "input")
    }

    fn output_schema(&self, node: &WorkflowNode) -> Vec<ParameterSchema> {
        Self::scan(node, "output")
    }
}

/// The schema lookup table plus its cache.
///
/// Schemas are immutable for the lifetime of a resolution pass and cached by
/// `(direction, node id, kind)`. The cache belongs to this registry and to
/// nothing else; call [`SchemaRegistry::clear_cache`] after changing the
/// provider set.
pub struct SchemaRegistry {
    providers: AHashMap<String, Box<dyn SchemaProvider>>,
    fallback: FieldScanProvider,
    cache: AHashMap<String, Vec<ParameterSchema>>,
}

pub struct SchemaRegistryBuilder {
    providers: AHashMap<String, Box<dyn SchemaProvider>>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        let mut providers: AHashMap<String, Box<dyn SchemaProvider>> = AHashMap::new();
        let defaults: Vec<Box<dyn SchemaProvider>> = vec![
            Box::new(InputSchemaProvider),
            Box::new(AgentSchemaProvider),
            Box::new(OutputSchemaProvider),
        ];
        for provider in defaults {
            providers.insert(provider.kind().to_string(), provider);
        }
        Self { providers }
    }

    /// Registers (or replaces) the provider for a node kind.
    pub fn with_provider(mut self, provider: Box<dyn SchemaProvider>) -> Self {
        self.providers.insert(provider.kind().to_string(), provider);
        self
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            providers: self.providers,
            fallback: FieldScanProvider,
            cache: AHashMap::new(),
        }
    }
}

impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// The named input parameters `node` exposes.
    pub fn input_schema(&mut self, node: &WorkflowNode) -> Vec<ParameterSchema> {
        self.cached(node, "input", |provider, node| provider.input_schema(node))
    }

    /// The named output parameters `node` exposes.
    pub fn output_schema(&mut self, node: &WorkflowNode) -> Vec<ParameterSchema> {
        self.cached(node, "output", |provider, node| provider.output_schema(node))
    }

    /// Drops every cached schema. Must be called when the provider set
    /// changes; nothing else invalidates the cache.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn has_provider(&self, kind: &NodeKind) -> bool {
        self.providers.contains_key(kind.tag())
    }

    fn cached(
        &mut self,
        node: &WorkflowNode,
        direction: &str,
        discover: impl Fn(&dyn SchemaProvider, &WorkflowNode) -> Vec<ParameterSchema>,
    ) -> Vec<ParameterSchema> {
        let kind = node.effective_kind();
        let key = format!("{direction}-{}-{}", node.id, kind.tag());
        if let Some(schemas) = self.cache.get(&key) {
            return schemas.clone();
        }

        let provider: &dyn SchemaProvider = match self.providers.get(kind.tag()) {
            Some(provider) => provider.as_ref(),
            None => &self.fallback,
        };
        let schemas = discover(provider, node);
        self.cache.insert(key, schemas.clone());
        schemas
    }
}
