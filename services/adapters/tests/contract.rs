//! Contract conformance across all three adapters: consistent validation,
//! metrics, and strategy surfaces regardless of internal strategy.

use adapters::{
    CognitiveAdapter, ComputationalAdapter, DomainAdapter, RepresentationalAdapter,
};
use config::SystemConfig;
use serde_json::json;
use std::sync::Arc;
use types::Domain;

fn all_adapters() -> Vec<Arc<dyn DomainAdapter>> {
    let config = Arc::new(SystemConfig::new());
    vec![
        Arc::new(CognitiveAdapter::new(config.clone())),
        Arc::new(ComputationalAdapter::new(config.clone())),
        Arc::new(RepresentationalAdapter::new(config)),
    ]
}

#[test]
fn unsupported_domains_are_rejected_symmetrically() {
    let config = Arc::new(SystemConfig::new());
    let adapter = ComputationalAdapter::new(config);
    // Representational is outside this adapter's supported set.
    assert!(!adapter.supports_transformation(Domain::Computational, Domain::Representational));
    assert!(!adapter.supports_transformation(Domain::Representational, Domain::Computational));
}

#[test]
fn validation_against_a_foreign_domain_fails_and_counts() {
    for adapter in all_adapters() {
        let foreign = Domain::ALL
            .into_iter()
            .find(|&domain| domain != adapter.primary_domain())
            .unwrap();
        assert!(adapter.validate_for_domain(&json!({}), foreign).is_err());

        let metrics = adapter.domain_metrics(adapter.primary_domain());
        assert!(
            metrics["validation_failures"].as_u64().unwrap() >= 1,
            "{} did not count the failure",
            adapter.identifier()
        );
    }
}

#[test]
fn metric_snapshots_are_side_effect_free() {
    for adapter in all_adapters() {
        let first = adapter.domain_metrics(adapter.primary_domain());
        let second = adapter.domain_metrics(adapter.primary_domain());
        assert_eq!(first, second, "{} snapshot mutated state", adapter.identifier());
    }
}

#[test]
fn optimization_strategies_cover_the_primary_domain_only() {
    for adapter in all_adapters() {
        let primary = adapter.primary_domain();
        assert!(
            !adapter.optimization_strategy(primary).is_empty(),
            "{} has no strategy for its own domain",
            adapter.identifier()
        );
        let foreign = Domain::ALL
            .into_iter()
            .find(|&domain| domain != primary)
            .unwrap();
        assert!(adapter.optimization_strategy(foreign).is_empty());
    }
}
