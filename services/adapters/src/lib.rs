//! # Triad Domain Adapters - Entity Transformation Layer
//!
//! ## Purpose
//!
//! Adapters convert opaque nested entities between their native domain shape
//! and the canonical normalized form, validate domain-specific structural
//! requirements, and perform pairwise cross-domain transforms. One adapter
//! per domain, all behind the [`DomainAdapter`] contract.
//!
//! ## Integration Points
//!
//! - **Input**: entities from the event bus or direct integration-point calls
//! - **Output**: normalized forms consumed by the target domain's adapter
//! - **Monitoring**: atomic counter sets snapshotted by metric collectors
//! - **Configuration**: domain-scoped policy (thresholds, capacities) from
//!   [`config::SystemConfig`]
//!
//! ## Architecture Role
//!
//! ```text
//! Entity → source.to_normalized_form → NormalizedForm → target.from_normalized_form → Entity
//!             ↓                                             ↓
//!        validate / metrics                          validate / metrics
//! ```
//!
//! ## Adapter Principles
//!
//! Adapters ARE transformers, validators, and metric reporters. Adapters are
//! NOT routers (the bus owns delivery) and NOT optimization engines: the
//! [`DomainAdapter::optimization_strategy`] hint is purely descriptive and is
//! never interpreted by this crate.
//!
//! Numeric heuristics inside each adapter (attention scores, node weights,
//! anchor thresholds) are domain-supplied policy behind the contract, not
//! core logic; callers only rely on the contract being invoked correctly.

pub mod cognitive;
pub mod computational;
pub mod metrics;
pub mod representational;

pub use cognitive::CognitiveAdapter;
pub use computational::ComputationalAdapter;
pub use metrics::CounterSet;
pub use representational::RepresentationalAdapter;

use types::{Domain, Entity, NormalizedForm, Result};

/// Contract every domain adapter implements.
///
/// Implementations are `Send + Sync`: all state behind the trait supports
/// concurrent read-heavy, write-light access, and every method runs to
/// completion on the caller's thread.
pub trait DomainAdapter: Send + Sync {
    /// The one domain this adapter validates against and transforms through
    fn primary_domain(&self) -> Domain;

    /// Stable identifier used for registry keys and metric tags
    fn identifier(&self) -> &str;

    /// Domains this adapter can participate in transformations with
    fn supported_domains(&self) -> &[Domain];

    /// Produce the canonical mapping form of a native entity.
    ///
    /// Total on well-formed input: non-mapping entities wrap under the
    /// reserved [`types::VALUE_KEY`].
    fn to_normalized_form(&self, entity: &Entity) -> Result<NormalizedForm>;

    /// Reconstruct a native entity from its normalized form.
    ///
    /// A form carrying exactly the reserved key unwraps to the raw value;
    /// any other form is returned as the entity unchanged.
    fn from_normalized_form(&self, form: NormalizedForm) -> Entity;

    /// Validate against this adapter's primary domain
    fn validate(&self, entity: &Entity) -> Result<()> {
        self.validate_for_domain(entity, self.primary_domain())
    }

    /// Validate an entity's shape for a specific domain.
    ///
    /// Fails with [`types::DomainError::InvalidEntity`] when `domain` is not
    /// this adapter's primary domain or the structural check fails; failures
    /// increment the adapter's validation-failure counter before returning.
    fn validate_for_domain(&self, entity: &Entity, domain: Domain) -> Result<()>;

    /// Transform an entity between two domains.
    ///
    /// Either `source` or `target` must equal the primary domain; the pair
    /// must be one this adapter knows, otherwise
    /// [`types::DomainError::UnsupportedTransformation`] is returned.
    fn transform_between_domains(
        &self,
        entity: &Entity,
        source: Domain,
        target: Domain,
    ) -> Result<Entity>;

    /// Pure predicate: both domains are in the supported set
    fn supports_transformation(&self, source: Domain, target: Domain) -> bool {
        self.supported_domains().contains(&source) && self.supported_domains().contains(&target)
    }

    /// Read-only snapshot of this adapter's counters and gauges.
    ///
    /// Non-blocking, side-effect-free, and safe to call concurrently with
    /// mutation; the snapshot may be stale but is always consistent.
    fn domain_metrics(&self, domain: Domain) -> NormalizedForm;

    /// Static, declarative hint describing how callers should treat this
    /// domain (cache policy, parallelization, strategy name). Consumed by
    /// optimization-layer collaborators, never interpreted here.
    fn optimization_strategy(&self, domain: Domain) -> NormalizedForm;
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::SystemConfig;
    use serde_json::json;
    use std::sync::Arc;

    fn all_adapters() -> Vec<Arc<dyn DomainAdapter>> {
        let config = Arc::new(SystemConfig::new());
        vec![
            Arc::new(ComputationalAdapter::new(config.clone())),
            Arc::new(CognitiveAdapter::new(config.clone())),
            Arc::new(RepresentationalAdapter::new(config)),
        ]
    }

    #[test]
    fn supported_pairs_are_symmetric_predicates() {
        for adapter in all_adapters() {
            let supported = adapter.supported_domains();
            for &d1 in supported {
                for &d2 in supported {
                    if d1 != d2 {
                        assert!(
                            adapter.supports_transformation(d1, d2),
                            "{} should support {d1} -> {d2}",
                            adapter.identifier()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_preserves_normalized_keys() {
        let entity = json!({"alpha": 1, "beta": [true, null], "gamma": {"inner": "x"}});
        for adapter in all_adapters() {
            let form = adapter.to_normalized_form(&entity).unwrap();
            let keys: Vec<_> = form.keys().cloned().collect();
            let back = adapter.from_normalized_form(form);
            let restored = back.as_object().unwrap();
            for key in &keys {
                assert!(
                    restored.contains_key(key),
                    "{} dropped key {key}",
                    adapter.identifier()
                );
            }
        }
    }

    #[test]
    fn scalars_wrap_and_unwrap_through_every_adapter() {
        for adapter in all_adapters() {
            let form = adapter.to_normalized_form(&json!("just a string")).unwrap();
            assert_eq!(form.len(), 1);
            assert_eq!(adapter.from_normalized_form(form), json!("just a string"));
        }
    }

    #[test]
    fn validate_rejects_foreign_domain() {
        let config = Arc::new(SystemConfig::new());
        let adapter = ComputationalAdapter::new(config);
        let err = adapter
            .validate_for_domain(&json!({}), Domain::Cognitive)
            .unwrap_err();
        assert!(matches!(
            err,
            types::DomainError::InvalidEntity { domain: Domain::Cognitive, .. }
        ));
    }
}
