//! Computational domain adapter.
//!
//! Optimizes for throughput with a read-through cache over normalization and
//! graph-shaped transforms toward the cognitive domain: top-level keys become
//! typed nodes, nested-key relationships become weighted edges.

use crate::metrics::CounterSet;
use crate::DomainAdapter;
use config::SystemConfig;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;
use types::{unwrap_entity, wrap_entity, Domain, DomainError, Entity, NormalizedForm, Result};

const SUPPORTED: [Domain; 2] = [Domain::Computational, Domain::Cognitive];

/// Cached normalization result with the time it was computed
#[derive(Debug, Clone)]
struct CachedForm {
    form: NormalizedForm,
    cached_at: SystemTime,
}

/// Adapter for the computational domain.
pub struct ComputationalAdapter {
    config: Arc<SystemConfig>,
    counters: CounterSet,
    cache: DashMap<u64, CachedForm>,
    cache_max: usize,
}

impl ComputationalAdapter {
    pub fn new(config: Arc<SystemConfig>) -> Self {
        let cache_max = config.get_u64("cache.max_size", config::defaults::cache::MAX_SIZE) as usize;
        Self {
            config,
            counters: CounterSet::new(&[
                "transformations",
                "cache_hits",
                "cache_misses",
                "validation_failures",
            ]),
            cache: DashMap::new(),
            cache_max,
        }
    }

    /// Age of a cached entry, for external cache-policy collaborators
    pub fn cache_entry_age(&self, entity: &Entity) -> Option<std::time::Duration> {
        let key = content_hash(entity);
        self.cache
            .get(&key)
            .and_then(|entry| entry.cached_at.elapsed().ok())
    }

    fn transform_to_graph(&self, entity: &Entity) -> Entity {
        let mut graph = NormalizedForm::new();
        if let Value::Object(map) = entity {
            let nodes: Vec<Value> = map
                .iter()
                .map(|(key, value)| {
                    json!({
                        "id": key,
                        "value": value,
                        "type": node_type(value),
                    })
                })
                .collect();

            let mut connections = Vec::new();
            for (key, value) in map {
                if let Value::Object(nested) = value {
                    for sub_key in nested.keys() {
                        connections.push(json!({
                            "source": key,
                            "target": sub_key,
                            "weight": connection_weight(key, sub_key),
                        }));
                    }
                }
            }

            let mut weights = NormalizedForm::new();
            for (key, value) in map {
                weights.insert(key.clone(), json!(node_weight(value)));
            }

            graph.insert("nodes".into(), Value::Array(nodes));
            graph.insert("connections".into(), Value::Array(connections));
            graph.insert("weights".into(), Value::Object(weights));
        }
        Value::Object(graph)
    }

    fn transform_from_graph(&self, entity: &Entity) -> Entity {
        let mut form = NormalizedForm::new();
        if let Value::Object(graph) = entity {
            let mut structure = NormalizedForm::new();
            if let Some(Value::Array(nodes)) = graph.get("nodes") {
                for node in nodes {
                    if let (Some(Value::String(id)), Some(value)) =
                        (node.get("id"), node.get("value"))
                    {
                        structure.insert(id.clone(), value.clone());
                    }
                }
            }

            let mut operations = Vec::new();
            if let Some(Value::Array(connections)) = graph.get("connections") {
                for conn in connections {
                    if let (Some(source), Some(target)) = (conn.get("source"), conn.get("target")) {
                        operations.push(json!(format!(
                            "connect({}, {})",
                            as_plain_str(source),
                            as_plain_str(target)
                        )));
                    }
                }
            }

            let mut metadata = NormalizedForm::new();
            if let Some(weights) = graph.get("weights") {
                metadata.insert("weights".into(), weights.clone());
            }

            form.insert("structure".into(), Value::Object(structure));
            form.insert("operations".into(), Value::Array(operations));
            form.insert("metadata".into(), Value::Object(metadata));
        }
        Value::Object(form)
    }
}

impl DomainAdapter for ComputationalAdapter {
    fn primary_domain(&self) -> Domain {
        Domain::Computational
    }

    fn identifier(&self) -> &str {
        "computational"
    }

    fn supported_domains(&self) -> &[Domain] {
        &SUPPORTED
    }

    /// Read-through cached normalization: a hit returns the cached form
    /// unchanged, a miss computes and inserts.
    fn to_normalized_form(&self, entity: &Entity) -> Result<NormalizedForm> {
        let key = content_hash(entity);
        if let Some(cached) = self.cache.get(&key) {
            self.counters.incr("cache_hits");
            return Ok(cached.form.clone());
        }

        self.counters.incr("cache_misses");
        let form = wrap_entity(entity);
        if self.cache.len() < self.cache_max {
            self.cache.insert(
                key,
                CachedForm {
                    form: form.clone(),
                    cached_at: SystemTime::now(),
                },
            );
        } else {
            debug!(cache_max = self.cache_max, "normalization cache full, entry not cached");
        }
        Ok(form)
    }

    fn from_normalized_form(&self, form: NormalizedForm) -> Entity {
        unwrap_entity(form)
    }

    fn validate_for_domain(&self, entity: &Entity, domain: Domain) -> Result<()> {
        if domain != Domain::Computational {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                domain,
                "entity not valid for computational domain",
            ));
        }
        if !entity.is_object() {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                Domain::Computational,
                "entity must be a mapping",
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
        self.counters.incr("transformations");
        match (source, target) {
            (Domain::Computational, Domain::Cognitive) => Ok(self.transform_to_graph(entity)),
            (Domain::Cognitive, Domain::Computational) => Ok(self.transform_from_graph(entity)),
            _ => Err(DomainError::unsupported_transformation(source, target)),
        }
    }

    fn domain_metrics(&self, _domain: Domain) -> NormalizedForm {
        let mut snapshot = self.counters.snapshot();
        snapshot.insert("cached_forms".into(), json!(self.cache.len()));
        snapshot
    }

    fn optimization_strategy(&self, domain: Domain) -> NormalizedForm {
        let mut strategy = NormalizedForm::new();
        if domain == Domain::Computational {
            strategy.insert(
                "cache_strategy".into(),
                self.config
                    .domain_setting_or(Domain::Computational, "cache.policy", json!("lru")),
            );
            strategy.insert("parallelization".into(), json!(true));
            strategy.insert("batch_size".into(), json!(100));
            strategy.insert("optimization_level".into(), json!("aggressive"));
        }
        strategy
    }
}

/// Deterministic content hash over the serialized entity
fn content_hash(entity: &Entity) -> u64 {
    let mut hasher = DefaultHasher::new();
    entity.to_string().hash(&mut hasher);
    hasher.finish()
}

fn node_type(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "numeric",
        Value::String(_) => "symbolic",
        Value::Object(_) => "composite",
        Value::Array(_) => "sequence",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

fn node_weight(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(1.0),
        Value::Array(items) => items.len() as f64,
        Value::Object(map) => map.len() as f64,
        _ => 1.0,
    }
}

// Adapter-supplied edge-weight heuristic: longer shared key context binds
// tighter. Deterministic so transforms stay reproducible under test.
fn connection_weight(source: &str, target: &str) -> f64 {
    let shared = source
        .chars()
        .zip(target.chars())
        .take_while(|(a, b)| a == b)
        .count();
    (1 + shared) as f64 / (1 + source.len().max(target.len())) as f64
}

fn as_plain_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
