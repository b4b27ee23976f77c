//! Isomorphic structures: shape-preserving rewrites applied uniformly at
//! every level of a nested entity.
//!
//! Each structure pairs a transformation with an applicability predicate.
//! Inapplicable input passes through unchanged; only an unknown structure id
//! is an error, and that check lives in the service.

use serde_json::{Map, Value};
use types::Entity;

/// The closed set of isomorphic structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsomorphicStructure {
    /// Deep identity rewrite of mappings and sequences
    Recursion,
    /// Key truncation beyond a length threshold, applied at every level
    Compression,
    /// Structural summary plus per-domain adapter observations
    MetaObservation,
}

impl IsomorphicStructure {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "recursion" => Some(IsomorphicStructure::Recursion),
            "compression" => Some(IsomorphicStructure::Compression),
            "meta_observation" => Some(IsomorphicStructure::MetaObservation),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            IsomorphicStructure::Recursion => "recursion",
            IsomorphicStructure::Compression => "compression",
            IsomorphicStructure::MetaObservation => "meta_observation",
        }
    }

    /// Whether the structure's rewrite applies to this entity shape.
    /// Compression is total; the other two only reshape mappings.
    pub fn applies_to(&self, entity: &Entity) -> bool {
        match self {
            IsomorphicStructure::Compression => true,
            IsomorphicStructure::Recursion | IsomorphicStructure::MetaObservation => {
                entity.is_object()
            }
        }
    }
}

/// Rebuild a nested value by applying the rewrite to every mapping value and
/// sequence element, leaving scalars untouched. The identity scaffold for
/// structure-specific specializations.
pub fn deep_rewrite(entity: &Entity) -> Entity {
    match entity {
        Value::Object(map) => {
            let rebuilt: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), deep_rewrite(value)))
                .collect();
            Value::Object(rebuilt)
        }
        Value::Array(items) => Value::Array(items.iter().map(deep_rewrite).collect()),
        scalar => scalar.clone(),
    }
}

/// Truncate keys longer than `threshold` characters, marking the cut with
/// `ellipsis`, recursing through nested mappings and sequences.
pub fn compress(entity: &Entity, threshold: usize, ellipsis: &str) -> Entity {
    match entity {
        Value::Object(map) => {
            let compressed: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    (
                        compress_key(key, threshold, ellipsis),
                        compress(value, threshold, ellipsis),
                    )
                })
                .collect();
            Value::Object(compressed)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| compress(item, threshold, ellipsis))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn compress_key(key: &str, threshold: usize, ellipsis: &str) -> String {
    if key.chars().count() > threshold {
        let truncated: String = key.chars().take(threshold).collect();
        format!("{truncated}{ellipsis}")
    } else {
        key.to_string()
    }
}

/// JSON shape name used in meta-observation summaries
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
