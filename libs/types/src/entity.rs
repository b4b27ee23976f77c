//! Untyped entity values and their canonical normalized form.
//!
//! An entity is an arbitrarily nested value (mapping, sequence, or scalar)
//! with no fixed schema; `serde_json::Value` gives adapters an exhaustive
//! sum type to match on. The normalized form is the mapping-typed interchange
//! representation every adapter can produce and reconstruct from.

use serde_json::{Map, Value};

/// Opaque nested value passed between domains. Always moved or cloned by
/// value across transformations; no aliasing survives normalize/denormalize.
pub type Entity = Value;

/// Canonical mapping-typed interchange representation.
pub type NormalizedForm = Map<String, Value>;

/// Reserved key under which non-mapping entities are wrapped when normalized.
pub const VALUE_KEY: &str = "value";

/// Normalize an entity into mapping form.
///
/// Mapping entities pass through key-for-key; anything else is wrapped under
/// [`VALUE_KEY`]. Never fails on well-formed input.
pub fn wrap_entity(entity: &Entity) -> NormalizedForm {
    match entity {
        Value::Object(map) => map.clone(),
        other => {
            let mut form = Map::with_capacity(1);
            form.insert(VALUE_KEY.to_string(), other.clone());
            form
        }
    }
}

/// Reconstruct an entity from its normalized form.
///
/// A form carrying exactly the reserved key unwraps to the raw value; every
/// other form is already the entity. The round trip is lossy-safe rather than
/// bit-exact: every key present in the form is preserved.
pub fn unwrap_entity(form: NormalizedForm) -> Entity {
    if form.len() == 1 {
        if let Some(inner) = form.get(VALUE_KEY) {
            return inner.clone();
        }
    }
    Value::Object(form)
}
