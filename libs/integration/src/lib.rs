//! # Triad Integration Service - Cross-Domain Orchestration
//!
//! ## Purpose
//! Carries entities across domain boundaries through a fixed set of
//! integration points, applies isomorphic structures (shape-preserving
//! rewrites), and resolves technology names to adapter/connector pairs
//! through the [`TechnologyRegistry`].
//!
//! ## Integration Points
//! - **Adapters**: registered per domain with
//!   [`IntegrationService::register_domain_adapter`]
//! - **Registry**: injected at construction; the composition root owns the
//!   single logical instance and shares it by `Arc` clone
//! - **Callers**: invoke [`IntegrationService::transform`] with a point, or
//!   [`IntegrationService::transform_through_integration_point`] with
//!   technology names
//!
//! ## Architecture Role
//! ```text
//! transform(point) ─┬─ pairwise: source.normalize → target.denormalize
//!                   └─ meta: fan through all adapters + structures
//! apply_isomorphic_structure(id) ── recursion | compression | meta_observation
//! technology names ── TechnologyRegistry ── Arc<dyn DomainAdapter>
//! ```

mod point;
mod registry;
mod structures;

pub use point::IntegrationPoint;
pub use registry::{LoopbackConnector, TechnologyConnector, TechnologyRegistry};
pub use structures::IsomorphicStructure;

use adapters::DomainAdapter;
use config::{defaults, SystemConfig};
use dashmap::DashMap;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use types::{Domain, DomainError, Entity, NormalizedForm, Result};

/// Orchestrates cross-domain transformations.
pub struct IntegrationService {
    domain_adapters: DashMap<Domain, Arc<dyn DomainAdapter>>,
    registry: Arc<TechnologyRegistry>,
    key_compression_threshold: usize,
    key_ellipsis: String,
}

impl IntegrationService {
    pub fn new(config: Arc<SystemConfig>, registry: Arc<TechnologyRegistry>) -> Self {
        let key_compression_threshold = config.get_u64(
            "integration.key_compression_threshold",
            defaults::integration::KEY_COMPRESSION_THRESHOLD,
        ) as usize;
        Self {
            domain_adapters: DashMap::new(),
            registry,
            key_compression_threshold,
            key_ellipsis: defaults::integration::KEY_ELLIPSIS.to_string(),
        }
    }

    /// Register an adapter under its primary domain, replacing any previous
    /// registration for that domain
    pub fn register_domain_adapter(&self, adapter: Arc<dyn DomainAdapter>) {
        let domain = adapter.primary_domain();
        debug!(%domain, adapter = adapter.identifier(), "domain adapter registered");
        self.domain_adapters.insert(domain, adapter);
    }

    pub fn domain_adapter(&self, domain: Domain) -> Option<Arc<dyn DomainAdapter>> {
        self.domain_adapters.get(&domain).map(|entry| entry.clone())
    }

    /// Shared registry handle
    pub fn registry(&self) -> &Arc<TechnologyRegistry> {
        &self.registry
    }

    /// Register a technology adapter in the shared registry
    pub fn register_technology_adapter(&self, technology: &str, adapter: Arc<dyn DomainAdapter>) {
        self.registry.register_adapter(technology, adapter);
    }

    /// Register a technology connector in the shared registry
    pub fn register_technology_connector(
        &self,
        technology: &str,
        connector: Arc<dyn TechnologyConnector>,
    ) {
        self.registry.register_connector(technology, connector);
    }

    /// Carry an entity across an integration point.
    ///
    /// Pairwise points normalize with the source domain's adapter and
    /// denormalize with the target's; a missing adapter for either end
    /// fails with [`DomainError::UnsupportedTransformation`].
    pub fn transform(&self, point: IntegrationPoint, entity: &Entity) -> Result<Entity> {
        match point.domain_pair() {
            Some((source, target)) => {
                let source_adapter = self
                    .domain_adapter(source)
                    .ok_or_else(|| DomainError::unsupported_transformation(source, target))?;
                let target_adapter = self
                    .domain_adapter(target)
                    .ok_or_else(|| DomainError::unsupported_transformation(source, target))?;
                self.transform_pairwise(&*source_adapter, &*target_adapter, entity)
            }
            None => self.meta_integration(entity),
        }
    }

    fn transform_pairwise(
        &self,
        source: &dyn DomainAdapter,
        target: &dyn DomainAdapter,
        entity: &Entity,
    ) -> Result<Entity> {
        let normalized = source.to_normalized_form(entity)?;
        Ok(target.from_normalized_form(normalized))
    }

    /// Fan an entity through every registered adapter and all isomorphic
    /// structures, merging the views into one composite mapping.
    fn meta_integration(&self, entity: &Entity) -> Result<Entity> {
        let mut composite = NormalizedForm::new();

        for (domain, adapter) in self.adapters_in_order() {
            let view = adapter.to_normalized_form(entity)?;
            composite.insert(domain.as_str().to_string(), Value::Object(view));
        }

        for structure in [
            IsomorphicStructure::Recursion,
            IsomorphicStructure::Compression,
            IsomorphicStructure::MetaObservation,
        ] {
            composite.insert(
                structure.id().to_string(),
                self.apply_isomorphic_structure(structure.id(), entity)?,
            );
        }

        Ok(Value::Object(composite))
    }

    /// Apply an isomorphic structure by id.
    ///
    /// Unknown ids fail with [`DomainError::UnknownStructure`]; input the
    /// structure does not apply to passes through unchanged.
    pub fn apply_isomorphic_structure(&self, id: &str, entity: &Entity) -> Result<Entity> {
        let structure = IsomorphicStructure::from_id(id).ok_or_else(|| {
            DomainError::UnknownStructure { id: id.to_string() }
        })?;
        if !structure.applies_to(entity) {
            return Ok(entity.clone());
        }
        match structure {
            IsomorphicStructure::Recursion => Ok(structures::deep_rewrite(entity)),
            IsomorphicStructure::Compression => Ok(structures::compress(
                entity,
                self.key_compression_threshold,
                &self.key_ellipsis,
            )),
            IsomorphicStructure::MetaObservation => Ok(self.meta_observation(entity)),
        }
    }

    /// Summary mapping: runtime shape, timestamp, structural stats for
    /// mappings, and a domain-keyed snapshot of every registered adapter's
    /// metrics.
    fn meta_observation(&self, entity: &Entity) -> Entity {
        let mut observation = NormalizedForm::new();
        observation.insert(
            "type".into(),
            json!(structures::value_type_name(entity)),
        );
        observation.insert("timestamp_ms".into(), json!(now_millis()));

        if let Value::Object(map) = entity {
            observation.insert("size".into(), json!(map.len()));
            observation.insert(
                "keys".into(),
                Value::Array(map.keys().map(|key| json!(key)).collect()),
            );

            let mut value_types: BTreeMap<&'static str, u64> = BTreeMap::new();
            for value in map.values() {
                *value_types.entry(structures::value_type_name(value)).or_default() += 1;
            }
            observation.insert("value_types".into(), json!(value_types));
        }

        let mut domain_observations = NormalizedForm::new();
        for (domain, adapter) in self.adapters_in_order() {
            domain_observations.insert(
                domain.as_str().to_string(),
                Value::Object(adapter.domain_metrics(domain)),
            );
        }
        observation.insert("domain_observations".into(), Value::Object(domain_observations));

        Value::Object(observation)
    }

    /// Snapshot one registered adapter's metrics for an external collector.
    ///
    /// Fails with [`DomainError::MetricCollection`] when no adapter is
    /// registered for the domain; the error stays at this boundary and the
    /// collector moves on to the next domain.
    pub fn collect_domain_metrics(&self, domain: Domain) -> Result<NormalizedForm> {
        let adapter = self.domain_adapter(domain).ok_or_else(|| {
            DomainError::metric_collection(format!("no adapter registered for {domain} domain"))
        })?;
        Ok(adapter.domain_metrics(domain))
    }

    /// Transform through a named point using registry-resolved technologies.
    ///
    /// Both technology names must be fully supported (connector and adapter
    /// present), otherwise [`DomainError::UnsupportedTechnology`] names the
    /// first missing one. The meta point ignores the resolved pair and fans
    /// across all registered domain adapters.
    pub fn transform_through_integration_point(
        &self,
        source_technology: &str,
        target_technology: &str,
        entity: &Entity,
        point: IntegrationPoint,
    ) -> Result<Entity> {
        for technology in [source_technology, target_technology] {
            if !self.registry.is_technology_supported(technology) {
                return Err(DomainError::UnsupportedTechnology {
                    technology: technology.to_string(),
                });
            }
        }
        // Supported implies adapter presence, so these lookups succeed.
        let source = self.registry.adapter(source_technology).ok_or_else(|| {
            DomainError::UnsupportedTechnology {
                technology: source_technology.to_string(),
            }
        })?;
        let target = self.registry.adapter(target_technology).ok_or_else(|| {
            DomainError::UnsupportedTechnology {
                technology: target_technology.to_string(),
            }
        })?;

        match point.domain_pair() {
            Some(_) => self.transform_pairwise(&*source, &*target, entity),
            None => self.meta_integration(entity),
        }
    }

    /// Registered adapters sorted by domain for deterministic fan-out
    fn adapters_in_order(&self) -> Vec<(Domain, Arc<dyn DomainAdapter>)> {
        let mut pairs: Vec<(Domain, Arc<dyn DomainAdapter>)> = self
            .domain_adapters
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        pairs.sort_by_key(|(domain, _)| *domain);
        pairs
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::{CognitiveAdapter, ComputationalAdapter, RepresentationalAdapter};
    use serde_json::json;

    fn config() -> Arc<SystemConfig> {
        Arc::new(SystemConfig::new())
    }

    fn service_with_all_adapters() -> IntegrationService {
        let config = config();
        let registry = Arc::new(TechnologyRegistry::with_builtins(&config));
        let service = IntegrationService::new(config.clone(), registry);
        service.register_domain_adapter(Arc::new(CognitiveAdapter::new(config.clone())));
        service.register_domain_adapter(Arc::new(ComputationalAdapter::new(config.clone())));
        service.register_domain_adapter(Arc::new(RepresentationalAdapter::new(config)));
        service
    }

    #[test]
    fn pairwise_point_preserves_mapping_keys() {
        let service = service_with_all_adapters();
        let entity = json!({"signal": 0.4, "label": "probe"});

        let transformed = service
            .transform(IntegrationPoint::ComputationalCognitive, &entity)
            .unwrap();

        let map = transformed.as_object().unwrap();
        assert!(map.contains_key("signal"));
        assert!(map.contains_key("label"));
    }

    #[test]
    fn missing_adapter_is_an_unsupported_transformation() {
        let config = config();
        let registry = Arc::new(TechnologyRegistry::new());
        let service = IntegrationService::new(config.clone(), registry);
        service.register_domain_adapter(Arc::new(ComputationalAdapter::new(config)));

        let result = service.transform(IntegrationPoint::ComputationalCognitive, &json!({}));
        assert_eq!(
            result,
            Err(DomainError::unsupported_transformation(
                Domain::Computational,
                Domain::Cognitive
            ))
        );
    }

    #[test]
    fn meta_integration_merges_domain_views_and_structures() {
        let service = service_with_all_adapters();
        let entity = json!({"payload": 1});

        let composite = service
            .transform(IntegrationPoint::MetaIntegration, &entity)
            .unwrap();
        let map = composite.as_object().unwrap();

        for domain in Domain::ALL {
            assert!(map.contains_key(domain.as_str()), "missing {domain} view");
        }
        for id in ["recursion", "compression", "meta_observation"] {
            assert!(map.contains_key(id), "missing {id} result");
        }
    }

    #[test]
    fn unknown_structure_id_errors() {
        let service = service_with_all_adapters();
        let result = service.apply_isomorphic_structure("unknown_id", &json!({}));
        assert_eq!(
            result,
            Err(DomainError::UnknownStructure {
                id: "unknown_id".into()
            })
        );
    }

    #[test]
    fn inapplicable_input_passes_through_unchanged() {
        let service = service_with_all_adapters();
        assert_eq!(
            service
                .apply_isomorphic_structure("compression", &json!(42))
                .unwrap(),
            json!(42)
        );
        assert_eq!(
            service
                .apply_isomorphic_structure("recursion", &json!([1, 2]))
                .unwrap(),
            json!([1, 2])
        );
    }

    #[test]
    fn compression_uses_the_configured_threshold() {
        let config = Arc::new(
            SystemConfig::from_toml_str(
                "[integration]\nkey_compression_threshold = 4\n",
            )
            .unwrap(),
        );
        let registry = Arc::new(TechnologyRegistry::new());
        let service = IntegrationService::new(config, registry);

        let compressed = service
            .apply_isomorphic_structure("compression", &json!({"abcdef": 1, "abc": 2}))
            .unwrap();
        assert_eq!(compressed, json!({"abcd...": 1, "abc": 2}));
    }

    #[test]
    fn meta_observation_summarizes_mapping_shape() {
        let service = service_with_all_adapters();
        let entity = json!({"a": 1, "b": "text", "c": [1], "d": 2});

        let observed = service
            .apply_isomorphic_structure("meta_observation", &entity)
            .unwrap();
        let map = observed.as_object().unwrap();

        assert_eq!(map["type"], json!("object"));
        assert_eq!(map["size"], json!(4));
        assert_eq!(map["keys"], json!(["a", "b", "c", "d"]));
        assert_eq!(
            map["value_types"],
            json!({"array": 1, "number": 2, "string": 1})
        );
        assert!(map["timestamp_ms"].is_u64());

        let observations = map["domain_observations"].as_object().unwrap();
        for domain in Domain::ALL {
            assert!(observations.contains_key(domain.as_str()));
        }
    }

    #[test]
    fn metric_collection_fails_only_for_unregistered_domains() {
        let config = config();
        let registry = Arc::new(TechnologyRegistry::new());
        let service = IntegrationService::new(config.clone(), registry);
        service.register_domain_adapter(Arc::new(ComputationalAdapter::new(config)));

        let snapshot = service
            .collect_domain_metrics(Domain::Computational)
            .unwrap();
        assert!(snapshot.contains_key("cache_hits"));

        let err = service.collect_domain_metrics(Domain::Cognitive).unwrap_err();
        assert!(matches!(err, DomainError::MetricCollection { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn unregistered_technology_is_rejected() {
        let service = service_with_all_adapters();
        let result = service.transform_through_integration_point(
            "computational",
            "fortran",
            &json!({}),
            IntegrationPoint::ComputationalCognitive,
        );
        assert_eq!(
            result,
            Err(DomainError::UnsupportedTechnology {
                technology: "fortran".into()
            })
        );
    }

    #[test]
    fn technology_transform_uses_registry_adapters() {
        let service = service_with_all_adapters();
        let entity = json!({"k": true});

        let transformed = service
            .transform_through_integration_point(
                "representational",
                "computational",
                &entity,
                IntegrationPoint::RepresentationalComputational,
            )
            .unwrap();
        assert!(transformed.as_object().unwrap().contains_key("k"));
    }
}
