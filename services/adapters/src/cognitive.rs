//! Cognitive domain adapter.
//!
//! Models bounded working memory with attention-gated insertion and an
//! unbounded long-term store. Entities transformed into this domain gain
//! working-memory, attentional-focus, and meta-cognitive components; the
//! reverse transforms project those components into the computational or
//! representational shape.

use crate::metrics::CounterSet;
use crate::DomainAdapter;
use config::SystemConfig;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use types::{unwrap_entity, wrap_entity, Domain, DomainError, Entity, NormalizedForm, Result};

const SUPPORTED: [Domain; 3] = [
    Domain::Cognitive,
    Domain::Computational,
    Domain::Representational,
];

/// Adapter for the cognitive domain.
pub struct CognitiveAdapter {
    counters: CounterSet,
    /// Bounded, insertion-ordered working memory; oldest entries evict into
    /// long-term memory when capacity is exceeded.
    working_memory: RwLock<VecDeque<(String, Entity)>>,
    long_term_memory: DashMap<String, Entity>,
    attention_threshold: f64,
    working_capacity: usize,
    key_seq: AtomicU64,
}

impl CognitiveAdapter {
    pub fn new(config: Arc<SystemConfig>) -> Self {
        let attention_threshold = config.domain_f64(
            Domain::Cognitive,
            "attention.threshold",
            config::defaults::cognitive::ATTENTION_THRESHOLD,
        );
        let working_capacity = config.domain_u64(
            Domain::Cognitive,
            "memory.working_capacity",
            config::defaults::cognitive::WORKING_MEMORY_CAPACITY,
        ) as usize;
        Self {
            counters: CounterSet::new(&[
                "working_memory_access",
                "long_term_memory_access",
                "attentional_shifts",
                "meta_cognitive_events",
                "validation_failures",
            ]),
            working_memory: RwLock::new(VecDeque::new()),
            long_term_memory: DashMap::new(),
            attention_threshold,
            working_capacity,
            key_seq: AtomicU64::new(0),
        }
    }

    /// Number of chunks currently held in working memory
    pub fn working_memory_len(&self) -> usize {
        self.working_memory.read().len()
    }

    /// Number of entries consolidated into long-term memory
    pub fn long_term_memory_len(&self) -> usize {
        self.long_term_memory.len()
    }

    fn generate_memory_key(&self, entity: &Entity) -> String {
        let mut hasher = DefaultHasher::new();
        entity.to_string().hash(&mut hasher);
        let seq = self.key_seq.fetch_add(1, Ordering::Relaxed);
        format!("{:x}-{}", hasher.finish(), seq)
    }

    // Insert first, then trim the overflow: the loop only runs while the
    // deque is non-empty, so it terminates for any configured capacity
    // (capacity 0 consolidates straight to long-term memory).
    fn remember(&self, key: String, form: Entity) {
        let mut memory = self.working_memory.write();
        memory.push_back((key, form));
        while memory.len() > self.working_capacity {
            let Some((evicted_key, evicted)) = memory.pop_front() else {
                break;
            };
            debug!(key = %evicted_key, "working memory full, consolidating to long-term");
            self.long_term_memory.insert(evicted_key, evicted);
            self.counters.incr("long_term_memory_access");
        }
        self.counters.incr("attentional_shifts");
    }

    fn transform_to_cognitive(&self, entity: &Entity) -> Entity {
        let focus = attentional_focus(entity);
        let chunks = make_chunks(entity, self.working_capacity);

        let mut cognitive = NormalizedForm::new();
        cognitive.insert(
            "working_memory".into(),
            json!({
                "focus": focus,
                "capacity": self.working_capacity,
                "chunks": chunks,
            }),
        );
        cognitive.insert("attentional_focus".into(), json!(focus));
        cognitive.insert(
            "meta_cognitive_state".into(),
            json!({
                "awareness": awareness(entity),
                "reflection": {"source_shape": shape_name(entity)},
                "adaptation": adaptation(entity),
            }),
        );
        let cognitive = Value::Object(cognitive);

        // Access is counted on every path; insertion is attention-gated.
        self.counters.incr("working_memory_access");
        if focus >= self.attention_threshold {
            let key = self.generate_memory_key(entity);
            self.remember(key, cognitive.clone());
        }
        cognitive
    }

    fn transform_to_computational(&self, cognitive: &NormalizedForm) -> Entity {
        self.counters.incr("working_memory_access");
        let mut form = NormalizedForm::new();

        if let Some(working) = cognitive.get("working_memory") {
            form.insert(
                "active_nodes".into(),
                working.get("chunks").cloned().unwrap_or(json!([])),
            );
            form.insert(
                "processing_state".into(),
                json!({
                    "focus": cognitive.get("attentional_focus").cloned().unwrap_or(Value::Null),
                    "processing_depth": processing_depth(cognitive),
                }),
            );
        }
        if let Some(meta) = cognitive.get("meta_cognitive_state") {
            form.insert("meta_data".into(), meta.clone());
        }
        Value::Object(form)
    }

    fn transform_to_representational(&self, cognitive: &NormalizedForm) -> Entity {
        self.counters.incr("working_memory_access");
        let mut form = NormalizedForm::new();
        form.insert(
            "cognitive_state".into(),
            json!({
                "attention": cognitive.get("attentional_focus").cloned().unwrap_or(Value::Null),
                "awareness": cognitive
                    .get("meta_cognitive_state")
                    .and_then(|m| m.get("awareness"))
                    .cloned()
                    .unwrap_or(Value::Null),
            }),
        );
        form.insert(
            "memory_contents".into(),
            cognitive
                .get("working_memory")
                .cloned()
                .unwrap_or(json!({})),
        );
        let vectors: Vec<Value> = cognitive
            .get("working_memory")
            .and_then(|w| w.get("chunks"))
            .and_then(Value::as_array)
            .map(|chunks| {
                chunks
                    .iter()
                    .map(|chunk| {
                        json!({
                            "concept": chunk.get("concept").cloned().unwrap_or(Value::Null),
                            "salience": chunk.get("salience").cloned().unwrap_or(json!(0.0)),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        form.insert("attention_vectors".into(), Value::Array(vectors));
        Value::Object(form)
    }

    fn as_cognitive_map<'a>(&self, entity: &'a Entity) -> Result<&'a NormalizedForm> {
        entity.as_object().ok_or_else(|| {
            DomainError::invalid_entity(Domain::Cognitive, "cognitive entity must be a mapping")
        })
    }
}

impl DomainAdapter for CognitiveAdapter {
    fn primary_domain(&self) -> Domain {
        Domain::Cognitive
    }

    fn identifier(&self) -> &str {
        "cognitive"
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
        if domain != Domain::Cognitive {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                domain,
                "entity not valid for cognitive domain",
            ));
        }
        if !entity.is_object() {
            self.counters.incr("validation_failures");
            return Err(DomainError::invalid_entity(
                Domain::Cognitive,
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
        self.counters.incr("meta_cognitive_events");

        if target == Domain::Cognitive && source != Domain::Cognitive {
            return Ok(self.transform_to_cognitive(entity));
        }
        if source == Domain::Cognitive {
            let cognitive = self.as_cognitive_map(entity)?;
            return match target {
                Domain::Computational => Ok(self.transform_to_computational(cognitive)),
                Domain::Representational => Ok(self.transform_to_representational(cognitive)),
                Domain::Cognitive => Ok(entity.clone()),
            };
        }
        Err(DomainError::unsupported_transformation(source, target))
    }

    fn domain_metrics(&self, _domain: Domain) -> NormalizedForm {
        let mut snapshot = self.counters.snapshot();
        snapshot.insert("working_memory_size".into(), json!(self.working_memory_len()));
        snapshot.insert(
            "long_term_memory_size".into(),
            json!(self.long_term_memory.len()),
        );
        snapshot
    }

    fn optimization_strategy(&self, domain: Domain) -> NormalizedForm {
        let mut strategy = NormalizedForm::new();
        if domain == Domain::Cognitive {
            strategy.insert("attention_allocation".into(), json!("adaptive"));
            strategy.insert("memory_strategy".into(), json!("hierarchical"));
            strategy.insert("learning_rate".into(), json!(0.01));
            strategy.insert("meta_cognition_enabled".into(), json!(true));
        }
        strategy
    }
}

// Attention heuristic: richer structure draws more focus. Mappings score by
// breadth, sequences by length, scalars stay below the default threshold.
fn attentional_focus(entity: &Entity) -> f64 {
    match entity {
        Value::Object(map) => (0.6 + 0.05 * map.len() as f64).min(1.0),
        Value::Array(items) => (0.4 + 0.05 * items.len() as f64).min(0.9),
        Value::String(s) if s.len() > 32 => 0.5,
        _ => 0.3,
    }
}

fn awareness(entity: &Entity) -> f64 {
    match entity {
        Value::Object(map) if !map.is_empty() => {
            (0.5 + 0.1 * depth(entity).min(5) as f64).min(1.0)
        }
        _ => 0.4,
    }
}

fn adaptation(entity: &Entity) -> f64 {
    if entity.is_object() || entity.is_array() {
        0.9
    } else {
        0.5
    }
}

fn depth(entity: &Entity) -> usize {
    match entity {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn shape_name(entity: &Entity) -> &'static str {
    match entity {
        Value::Object(_) => "mapping",
        Value::Array(_) => "sequence",
        _ => "scalar",
    }
}

fn processing_depth(cognitive: &NormalizedForm) -> f64 {
    cognitive
        .get("working_memory")
        .and_then(|w| w.get("chunks"))
        .and_then(Value::as_array)
        .map(|chunks| (0.5 + 0.05 * chunks.len() as f64).min(1.0))
        .unwrap_or(0.5)
}

/// Chunk a source entity into at most `capacity` working-memory chunks
fn make_chunks(entity: &Entity, capacity: usize) -> Vec<Value> {
    match entity {
        Value::Object(map) => map
            .iter()
            .take(capacity)
            .map(|(key, value)| {
                json!({
                    "concept": key,
                    "content": value,
                    "salience": node_salience(value),
                })
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .take(capacity)
            .enumerate()
            .map(|(index, value)| {
                json!({
                    "concept": format!("item_{index}"),
                    "content": value,
                    "salience": node_salience(value),
                })
            })
            .collect(),
        other => vec![json!({
            "concept": "value",
            "content": other,
            "salience": node_salience(other),
        })],
    }
}

fn node_salience(value: &Value) -> f64 {
    match value {
        Value::Object(map) => (0.5 + 0.1 * map.len() as f64).min(1.0),
        Value::Array(items) => (0.4 + 0.1 * items.len() as f64).min(1.0),
        Value::Null => 0.1,
        _ => 0.3,
    }
}
