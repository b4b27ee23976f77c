//! End-to-end wiring: event bus deliveries routed through the integration
//! service, with builtin adapters resolved from the technology registry.

use bus::{EventBus, Payload};
use config::SystemConfig;
use integration::{IntegrationPoint, IntegrationService, TechnologyRegistry};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use types::Domain;

fn composition_root() -> (Arc<SystemConfig>, Arc<TechnologyRegistry>, Arc<IntegrationService>) {
    let config = Arc::new(SystemConfig::new());
    let registry = Arc::new(TechnologyRegistry::with_builtins(&config));
    let service = Arc::new(IntegrationService::new(config.clone(), registry.clone()));
    for domain in Domain::ALL {
        let adapter = registry
            .adapter(domain.as_str())
            .expect("builtin adapter registered");
        service.register_domain_adapter(adapter);
    }
    (config, registry, service)
}

#[test]
fn bus_transformer_routes_through_an_integration_point() {
    let (config, _registry, service) = composition_root();
    let bus = EventBus::new(config);

    let routed = service.clone();
    bus.register_domain_transformer(
        Domain::Cognitive,
        Arc::new(move |payload: Payload, _source: Domain, _target: Domain| {
            let entity = Value::Object(payload);
            match routed.transform(IntegrationPoint::ComputationalCognitive, &entity) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    let mut wrapped = Payload::new();
                    wrapped.insert("value".into(), other);
                    wrapped
                }
                Err(_) => match entity {
                    Value::Object(map) => map,
                    _ => Payload::new(),
                },
            }
        }),
    );

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    bus.subscribe(
        "computational.update",
        Some(Domain::Cognitive),
        Arc::new(move |payload| {
            *sink.lock() = Some(payload);
            Ok(())
        }),
    )
    .unwrap();

    let mut payload = Payload::new();
    payload.insert("signal".into(), json!(0.9));
    let outcome = bus.publish("computational.update", payload).unwrap();

    assert_eq!(outcome.domain, Domain::Computational);
    assert_eq!(outcome.delivered, 1);

    let delivered = seen.lock().clone().expect("subscriber reached");
    assert!(delivered.contains_key("signal"));

    let metrics = bus.metrics();
    assert_eq!(metrics["domain_transformations"], json!(1));
}

#[test]
fn registry_resolved_transform_matches_direct_transform() {
    let (_config, _registry, service) = composition_root();
    let entity = json!({"structure": {"root": 1}});

    let direct = service
        .transform(IntegrationPoint::RepresentationalComputational, &entity)
        .unwrap();
    let via_registry = service
        .transform_through_integration_point(
            "representational",
            "computational",
            &entity,
            IntegrationPoint::RepresentationalComputational,
        )
        .unwrap();

    assert_eq!(direct, via_registry);
}

#[test]
fn meta_integration_observes_adapter_activity() {
    let (_config, _registry, service) = composition_root();

    // Drive some adapter traffic first so the observations carry counts.
    service
        .transform(IntegrationPoint::ComputationalCognitive, &json!({"n": 1}))
        .unwrap();

    let composite = service
        .transform(IntegrationPoint::MetaIntegration, &json!({"n": 2}))
        .unwrap();
    let observation = composite["meta_observation"].as_object().unwrap();
    let domains = observation["domain_observations"].as_object().unwrap();

    for domain in Domain::ALL {
        assert!(domains[domain.as_str()].is_object());
    }
}
