//! Type compatibility: how safely a value of one parameter type can serve a
//! parameter of another type.
//!
//! The verdicts come from a fixed matrix over the five normalized types.
//! Equal normalized types are always `Exact` (the matrix diagonal
//! generalized to custom types); every pair the matrix does not list is
//! `Incompatible`.

use crate::schema::{ParamType, ParameterSchema};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility level of a (source, target) type pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityLevel {
    Exact,
    Convertible,
    Partial,
    Incompatible,
}

impl CompatibilityLevel {
    /// The weight each level contributes to scoring.
    pub fn score(self) -> f64 {
        match self {
            CompatibilityLevel::Exact => 1.0,
            CompatibilityLevel::Convertible => 0.8,
            CompatibilityLevel::Partial => 0.6,
            CompatibilityLevel::Incompatible => 0.0,
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CompatibilityLevel::Exact => "exact",
            CompatibilityLevel::Convertible => "convertible",
            CompatibilityLevel::Partial => "partial",
            CompatibilityLevel::Incompatible => "incompatible",
        };
        f.write_str(tag)
    }
}

/// The verdict for one (source, target) parameter pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub is_compatible: bool,
    pub score: f64,
    pub level: CompatibilityLevel,
    pub transform_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

/// Looks up the compatibility level for a normalized type pair.
pub fn level_for(source: &ParamType, target: &ParamType) -> CompatibilityLevel {
    use CompatibilityLevel::*;
    use ParamType::*;

    if source == target {
        return Exact;
    }

    match (source, target) {
        (String, Number) | (String, Boolean) => Convertible,
        (String, Object) | (String, Array) => Partial,
        (Number, String) => Convertible,
        (Number, Boolean) => Partial,
        (Boolean, String) => Convertible,
        (Boolean, Number) => Partial,
        (Object, String) | (Object, Array) => Partial,
        (Array, String) | (Array, Object) => Partial,
        _ => Incompatible,
    }
}

/// Generates the conversion expression for a type pair, keyed
/// `"<source>_to_<target>"`. Pairs without a listed conversion get the
/// identity expression.
pub fn transform_expression(source: &ParamType, target: &ParamType) -> String {
    let key = format!("{}_to_{}", source.tag(), target.tag());
    let expression = match key.as_str() {
        "number_to_string" => "String({{value}})",
        "boolean_to_string" => "{{value}} ? \"true\" : \"false\"",
        "object_to_string" => "JSON.stringify({{value}})",
        "array_to_string" => "{{value}}.join(\", \")",
        "string_to_number" => "Number({{value}})",
        "boolean_to_number" => "{{value}} ? 1 : 0",
        "string_to_boolean" => "{{value}} === \"true\" || {{value}} === \"1\" || {{value}} === \"yes\"",
        "number_to_boolean" => "{{value}} !== 0",
        "string_to_object" => "JSON.parse({{value}})",
        "array_to_object" => "Object.fromEntries({{value}}.map((v, i) => [i, v]))",
        "string_to_array" => "{{value}}.split(\",\")",
        "object_to_array" => "Object.values({{value}})",
        _ => "{{value}}",
    };
    expression.to_string()
}

/// Checks whether `source` can serve `target`.
pub fn check(source: &ParameterSchema, target: &ParameterSchema) -> CompatibilityResult {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    let level = level_for(&source.param_type, &target.param_type);
    let score = level.score();

    if target.required && !source.required && source.default_value.is_none() {
        warnings.push("Target parameter is required, but the source is optional with no default".to_string());
        recommendations.push(
            "Set a default on the source parameter or guarantee the source always produces a value"
                .to_string(),
        );
    }

    if let (Some(source_values), Some(target_values)) = (&source.enum_values, &target.enum_values) {
        let common: Vec<&String> = target_values
            .iter()
            .filter(|value| source_values.contains(*value))
            .collect();
        if common.is_empty() {
            warnings.push("Enum value sets do not intersect".to_string());
            recommendations
                .push("Review the enum values or add a conversion step".to_string());
        } else if common.len() < source_values.len().min(target_values.len()) {
            warnings.push("Enum value sets only partially overlap".to_string());
        }
    }

    if let (Some(source_default), Some(target_default)) =
        (&source.default_value, &target.default_value)
    {
        if source_default != target_default {
            warnings.push("Declared defaults differ".to_string());
        }
    }

    match level {
        CompatibilityLevel::Convertible => recommendations
            .push("Conversion required; a transform expression was generated".to_string()),
        CompatibilityLevel::Partial => recommendations.push(
            "Partially compatible; validate the data shape or add error handling".to_string(),
        ),
        CompatibilityLevel::Incompatible => recommendations.push(
            "Incompatible types; a custom conversion or a different parameter is needed".to_string(),
        ),
        CompatibilityLevel::Exact => {}
    }

    let transform_required = level != CompatibilityLevel::Exact;
    CompatibilityResult {
        is_compatible: score > 0.0,
        score,
        level,
        transform_required,
        transform_expression: transform_required
            .then(|| transform_expression(&source.param_type, &target.param_type)),
        warnings,
        recommendations,
    }
}

/// Checks every (source, target) pair and returns the verdicts keyed by
/// source name, then target name.
pub fn batch_check(
    sources: &[ParameterSchema],
    targets: &[ParameterSchema],
) -> AHashMap<String, AHashMap<String, CompatibilityResult>> {
    let mut results: AHashMap<String, AHashMap<String, CompatibilityResult>> = AHashMap::new();
    for source in sources {
        let per_source = results.entry(source.name.clone()).or_default();
        for target in targets {
            per_source.insert(target.name.clone(), check(source, target));
        }
    }
    results
}

/// One target parameter paired with its best-scoring source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMatch {
    pub source: ParameterSchema,
    pub target: ParameterSchema,
    pub compatibility: CompatibilityResult,
}

/// For each target parameter, picks the source scoring at or above
/// `min_score` (if any), then sorts the matches best first.
pub fn find_best_matches(
    sources: &[ParameterSchema],
    targets: &[ParameterSchema],
    min_score: f64,
) -> Vec<ParameterMatch> {
    let mut matches = Vec::new();

    for target in targets {
        let mut best: Option<ParameterMatch> = None;
        for source in sources {
            let compatibility = check(source, target);
            if compatibility.score < min_score {
                continue;
            }
            let better = best
                .as_ref()
                .is_none_or(|current| compatibility.score > current.compatibility.score);
            if better {
                best = Some(ParameterMatch {
                    source: source.clone(),
                    target: target.clone(),
                    compatibility,
                });
            }
        }
        if let Some(found) = best {
            matches.push(found);
        }
    }

    matches.sort_by(|a, b| b.compatibility.score.total_cmp(&a.compatibility.score));
    matches
}

/// A caller-owned cache of compatibility levels keyed by type pair.
///
/// Levels depend only on the normalized types, so the cache is safe across
/// schemas; clear it if the matrix ever becomes configurable.
#[derive(Default)]
pub struct CompatibilityCache {
    levels: AHashMap<(ParamType, ParamType), CompatibilityLevel>,
}

impl CompatibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&mut self, source: &ParamType, target: &ParamType) -> CompatibilityLevel {
        if let Some(level) = self.levels.get(&(source.clone(), target.clone())) {
            return *level;
        }
        let level = level_for(source, target);
        self.levels.insert((source.clone(), target.clone()), level);
        level
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// The outcome of vetting a transform expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

static DANGEROUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)eval\s*\(",
        r"(?i)function\s*\(",
        r"=>\s*\{",
        r"(?i)import\s+",
        r"(?i)require\s*\(",
        r"(?i)document\.",
        r"(?i)window\.",
        r"(?i)global\.",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static pattern"))
    .collect()
});

/// Vets a transform expression before the host stores or evaluates it:
/// flags host-language escape hatches, unbalanced brackets, and a missing
/// `{{value}}` placeholder.
pub fn validate_transform_expression(expression: &str) -> ExpressionCheck {
    let mut errors = Vec::new();
    let mut suggestions = Vec::new();

    for pattern in DANGEROUS_PATTERNS.iter() {
        if pattern.is_match(expression) {
            errors.push(format!(
                "Expression contains a potentially unsafe construct: {}",
                pattern.as_str()
            ));
        }
    }

    if !expression.contains("{{value}}") {
        suggestions
            .push("Include the {{value}} placeholder to reference the source value".to_string());
    }

    let open = expression.matches('(').count();
    let close = expression.matches(')').count();
    if open != close {
        errors.push("Unbalanced parentheses".to_string());
    }

    ExpressionCheck {
        is_valid: errors.is_empty(),
        errors,
        suggestions,
    }
}
