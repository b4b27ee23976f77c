//! Representational domain adapter.
//!
//! Entities in this domain are symbolic structures carrying anchors and
//! references: an anchor registers a reusable value under a derived name, a
//! reference points back at it. Reference resolution is deliberately weak --
//! an unregistered anchor yields no value rather than an error.

use crate::metrics::CounterSet;
use crate::DomainAdapter;
use config::SystemConfig;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use types::{unwrap_entity, wrap_entity, Domain, DomainError, Entity, NormalizedForm, Result};

const SUPPORTED: [Domain; 3] = [
    Domain::Representational,
    Domain::Computational,
    Domain::Cognitive,
];

/// Prefix marking an anchored value's key inside a structure
const ANCHOR_MARK: char = '&';
/// Prefix marking a symbolic reference string
const REFERENCE_MARK: char = '*';

/// Adapter for the representational domain.
pub struct RepresentationalAdapter {
    counters: CounterSet,
    anchors: DashMap<String, Entity>,
    /// Anchor name -> keys that reference it
    reference_graph: DashMap<String, Vec<String>>,
    anchor_min_string_len: usize,
}

impl RepresentationalAdapter {
    pub fn new(config: Arc<SystemConfig>) -> Self {
        let anchor_min_string_len = config.domain_u64(
            Domain::Representational,
            "anchor.min_string_len",
            config::defaults::representational::ANCHOR_MIN_STRING_LEN,
        ) as usize;
        Self {
            counters: CounterSet::new(&[
                "anchor_definitions",
                "reference_resolutions",
                "structure_transformations",
                "validation_failures",
            ]),
            anchors: DashMap::new(),
            reference_graph: DashMap::new(),
            anchor_min_string_len,
        }
    }

    /// Weak anchor lookup: an unregistered anchor yields `None`, never an
    /// error.
    pub fn resolve_anchor(&self, anchor: &str) -> Option<Entity> {
        self.counters.incr("reference_resolutions");
        self.anchors.get(anchor).map(|entry| entry.clone())
    }

    /// Number of live anchors in the registry
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    fn is_anchor_candidate(&self, value: &Value) -> bool {
        match value {
            Value::Object(_) | Value::Array(_) => true,
            Value::String(s) => s.len() > self.anchor_min_string_len,
            _ => false,
        }
    }

    fn register_anchor(&self, anchor: String, value: Entity, dependent: &str) {
        self.anchors.insert(anchor.clone(), value);
        self.reference_graph
            .entry(anchor)
            .or_default()
            .push(dependent.to_string());
        self.counters.incr("anchor_definitions");
    }

    fn transform_to_representational(&self, entity: &Entity) -> Entity {
        let mut structure = NormalizedForm::new();
        let mut anchors = NormalizedForm::new();
        let mut references = NormalizedForm::new();

        if let Value::Object(source) = entity {
            for (key, value) in source {
                if let Some(anchor) = read_anchor_marker(value) {
                    // Value already carries an anchor marker: record the
                    // symbolic reference instead of re-anchoring.
                    references.insert(key.clone(), json!(format!("{REFERENCE_MARK}{anchor}")));
                    self.counters.incr("reference_resolutions");
                    structure.insert(key.clone(), value.clone());
                } else if self.is_anchor_candidate(value) {
                    let anchor = anchor_name(key, value);
                    self.register_anchor(anchor.clone(), value.clone(), key);
                    anchors.insert(anchor.clone(), value.clone());
                    let mut marked = NormalizedForm::new();
                    marked.insert(format!("{ANCHOR_MARK}{anchor}"), value.clone());
                    structure.insert(key.clone(), Value::Object(marked));
                } else {
                    structure.insert(key.clone(), value.clone());
                }
            }
        }

        json!({
            "structure": structure,
            "anchors": anchors,
            "references": references,
        })
    }

    fn transform_to_computational(&self, representational: &NormalizedForm) -> Entity {
        let mut data_structure = NormalizedForm::new();
        if let Some(Value::Object(structure)) = representational.get("structure") {
            for (key, value) in structure {
                if let Some(anchor) = read_anchor_marker(value) {
                    // Weak resolution: a missing anchor contributes no value.
                    if let Some(resolved) = self.resolve_anchor(&anchor) {
                        data_structure.insert(key.clone(), resolved);
                    }
                } else {
                    data_structure.insert(key.clone(), value.clone());
                }
            }
        }

        let mut pointers = NormalizedForm::new();
        if let Some(Value::Object(references)) = representational.get("references") {
            for (key, value) in references {
                if let Some(reference) = read_reference(value) {
                    pointers.insert(
                        key.clone(),
                        json!({"pointer": reference, "type": "reference"}),
                    );
                }
            }
        }

        let mut metadata = NormalizedForm::new();
        if let Some(anchors) = representational.get("anchors") {
            metadata.insert(
                "anchor_count".into(),
                json!(anchors.as_object().map(|m| m.len()).unwrap_or(0)),
            );
        }

        json!({
            "data_structure": data_structure,
            "pointers": pointers,
            "metadata": metadata,
        })
    }

    fn transform_to_cognitive(&self, representational: &NormalizedForm) -> Entity {
        let mut chunks = Vec::new();
        if let Some(Value::Object(structure)) = representational.get("structure") {
            for (key, value) in structure {
                let associations: Vec<String> = value
                    .as_object()
                    .map(|map| map.keys().map(|k| format!("{key}.{k}")).collect())
                    .unwrap_or_default();
                chunks.push(json!({
                    "concept": key,
                    "content": value,
                    "associations": associations,
                }));
            }
        }

        let mut associations = Vec::new();
        if let Some(Value::Object(references)) = representational.get("references") {
            for (key, value) in references {
                if let Some(reference) = read_reference(value) {
                    associations.push(json!(format!("{key} -> {reference}")));
                }
            }
        }

        let hierarchy = representational
            .get("structure")
            .map(|structure| {
                json!({
                    "root": {
                        "content": structure,
                        "children": [],
                    }
                })
            })
            .unwrap_or_else(|| json!({}));

        json!({
            "chunks": chunks,
            "associations": associations,
            "hierarchy": hierarchy,
        })
    }

    fn as_representational_map<'a>(&self, entity: &'a Entity) -> Result<&'a NormalizedForm> {
        entity.as_object().ok_or_else(|| {
            DomainError::invalid_entity(
                Domain::Representational,
                "representational entity must be a mapping",
            )
        })
    }
}

impl DomainAdapter for RepresentationalAdapter {
    fn primary_domain(&self) -> Domain {
        Domain::Representational
    }

    fn identifier(&self) -> &str {
        "representational"
    }

    fn supported_domains(&self) -> &[Domain] {
        &SUPPORTED
    }

    fn to_normalized_form(&self, entity: &Entity) -> Result<NormalizedForm> {
        Ok(wrap_entity(entity))
    }

    fn from_normalized_form(&self, form: NormalizedForm) -> Entity {
        unwrap_entity(form)
    }

    fn validate_for_domain(&self, entity: &Entity, domain: Domain) -> Result<()> {
        if domain != Domain::Representational {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                domain,
                "entity not valid for representational domain",
            ));
        }
        let Some(map) = entity.as_object() else {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                Domain::Representational,
                "entity must be a mapping",
            ));
        };
        if !map.contains_key("structure") {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                Domain::Representational,
                "missing required 'structure' key",
            ));
        }
        Ok(())
    }

    fn transform_between_domains(
        &self,
        entity: &Entity,
        source: Domain,
        target: Domain,
    ) -> Result<Entity> {
        self.counters.incr("structure_transformations");

        if target == Domain::Representational && source != Domain::Representational {
            return Ok(self.transform_to_representational(entity));
        }
        if source == Domain::Representational {
            let representational = self.as_representational_map(entity)?;
            return match target {
                Domain::Computational => Ok(self.transform_to_computational(representational)),
                Domain::Cognitive => Ok(self.transform_to_cognitive(representational)),
                Domain::Representational => Ok(entity.clone()),
            };
        }
        Err(DomainError::unsupported_transformation(source, target))
    }

    fn domain_metrics(&self, _domain: Domain) -> NormalizedForm {
        let mut snapshot = self.counters.snapshot();
        snapshot.insert("active_anchors".into(), json!(self.anchors.len()));
        let graph_size: usize = self
            .reference_graph
            .iter()
            .map(|entry| entry.value().len())
            .sum();
        snapshot.insert("reference_graph_size".into(), json!(graph_size));
        snapshot
    }

    fn optimization_strategy(&self, domain: Domain) -> NormalizedForm {
        let mut strategy = NormalizedForm::new();
        if domain == Domain::Representational {
            strategy.insert("compression_strategy".into(), json!("reference-based"));
            strategy.insert("anchor_placement".into(), json!("optimal"));
            strategy.insert("reference_resolution".into(), json!("lazy"));
            strategy.insert("structure_sharing".into(), json!(true));
        }
        strategy
    }
}

/// Derive a stable anchor name from a key and the anchored value
fn anchor_name(key: &str, value: &Value) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let mut hasher = DefaultHasher::new();
    value.to_string().hash(&mut hasher);
    format!("{}_{:x}", sanitized, hasher.finish())
}

/// If the value is a single-key mapping whose key carries the anchor mark,
/// return the anchor name
fn read_anchor_marker(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    let key = map.keys().next()?;
    key.strip_prefix(ANCHOR_MARK).map(str::to_string)
}

fn read_reference(value: &Value) -> Option<String> {
    value
        .as_str()
        .and_then(|s| s.strip_prefix(REFERENCE_MARK))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter() -> RepresentationalAdapter {
        RepresentationalAdapter::new(Arc::new(SystemConfig::new()))
    }

    #[test]
    fn composite_values_become_anchors() {
        let adapter = adapter();
        let entity = json!({
            "scalar": 1,
            "nested": {"a": true},
            "list": [1, 2, 3],
        });
        let result = adapter
            .transform_between_domains(&entity, Domain::Computational, Domain::Representational)
            .unwrap();

        // Scalars stay inline, composites move behind anchor markers
        assert_eq!(result["structure"]["scalar"], json!(1));
        assert!(read_anchor_marker(&result["structure"]["nested"]).is_some());
        assert!(read_anchor_marker(&result["structure"]["list"]).is_some());
        assert_eq!(result["anchors"].as_object().unwrap().len(), 2);
        assert_eq!(adapter.anchor_count(), 2);
    }

    #[test]
    fn long_strings_are_anchor_candidates() {
        let adapter = adapter();
        let long = "x".repeat(150);
        let entity = json!({"doc": long, "short": "y"});
        let result = adapter
            .transform_between_domains(&entity, Domain::Cognitive, Domain::Representational)
            .unwrap();
        assert!(read_anchor_marker(&result["structure"]["doc"]).is_some());
        assert_eq!(result["structure"]["short"], json!("y"));
    }

    #[test]
    fn round_trip_resolves_anchors_weakly() {
        let adapter = adapter();
        let entity = json!({"payload": {"k": "v"}, "n": 5});
        let representational = adapter
            .transform_between_domains(&entity, Domain::Computational, Domain::Representational)
            .unwrap();
        let computational = adapter
            .transform_between_domains(
                &representational,
                Domain::Representational,
                Domain::Computational,
            )
            .unwrap();
        assert_eq!(computational["data_structure"]["payload"], json!({"k": "v"}));
        assert_eq!(computational["data_structure"]["n"], json!(5));
    }

    #[test]
    fn unregistered_anchor_yields_no_value() {
        let adapter = adapter();
        assert!(adapter.resolve_anchor("never_registered").is_none());

        let entity = json!({
            "structure": {"ghost": {"&missing_anchor": {}}},
            "references": {},
            "anchors": {},
        });
        let computational = adapter
            .transform_between_domains(&entity, Domain::Representational, Domain::Computational)
            .unwrap();
        // Missing anchor contributes no key, and no error is raised
        assert!(computational["data_structure"]
            .as_object()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn references_become_pointers() {
        let adapter = adapter();
        let entity = json!({
            "structure": {},
            "references": {"alias": "*target_anchor"},
        });
        let computational = adapter
            .transform_between_domains(&entity, Domain::Representational, Domain::Computational)
            .unwrap();
        assert_eq!(
            computational["pointers"]["alias"],
            json!({"pointer": "target_anchor", "type": "reference"})
        );
    }

    #[test]
    fn cognitive_projection_builds_chunks_and_associations() {
        let adapter = adapter();
        let entity = json!({
            "structure": {"topic": {"sub": 1}},
            "references": {"alias": "*anchor_a"},
        });
        let cognitive = adapter
            .transform_between_domains(&entity, Domain::Representational, Domain::Cognitive)
            .unwrap();
        let chunks = cognitive["chunks"].as_array().unwrap();
        assert_eq!(chunks[0]["concept"], json!("topic"));
        assert_eq!(chunks[0]["associations"], json!(["topic.sub"]));
        assert_eq!(cognitive["associations"], json!(["alias -> anchor_a"]));
        assert!(cognitive["hierarchy"]["root"]["content"].is_object());
    }

    #[test]
    fn validation_requires_structure_key() {
        let adapter = adapter();
        let err = adapter.validate(&json!({"other": 1})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidEntity { .. }));
        assert_eq!(adapter.counters.get("validation_failures"), 1);
        assert!(adapter.validate(&json!({"structure": {}})).is_ok());
    }

    #[test]
    fn metrics_report_anchor_gauges() {
        let adapter = adapter();
        adapter
            .transform_between_domains(
                &json!({"big": {"a": 1}}),
                Domain::Computational,
                Domain::Representational,
            )
            .unwrap();
        let metrics = adapter.domain_metrics(Domain::Representational);
        assert_eq!(metrics["active_anchors"], json!(1));
        assert_eq!(metrics["anchor_definitions"], json!(1));
        assert_eq!(metrics["reference_graph_size"], json!(1));
    }
}
