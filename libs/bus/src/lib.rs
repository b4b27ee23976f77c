//! # Triad Event Bus - Domain-Aware Publish/Subscribe
//!
//! ## Purpose
//! Routes typed events between producers and subscribers across the three
//! processing domains. Every published event is classified into a source
//! domain; subscribers declare a target domain at registration, and payloads
//! crossing domains run through the ordered transformer chain registered for
//! the subscriber's domain before delivery.
//!
//! ## Integration Points
//! - **Producers**: call [`EventBus::publish`] with an event type and payload
//! - **Subscribers**: register handlers with [`EventBus::subscribe`]
//! - **Transformers**: append to per-domain chains with
//!   [`EventBus::register_domain_transformer`]
//! - **Monitoring**: snapshot counters through [`EventBus::metrics`]
//!
//! ## Architecture Role
//! ```text
//! publish → classify domain → per subscriber:
//!             │                   ├─ same domain: deliver as-is
//!             │                   └─ cross domain: transformer chain → deliver
//!             └─ metrics (totals, per-domain, latency)
//! ```
//!
//! ## Delivery Semantics
//! Every publish runs to completion on the caller's thread; there is no
//! queueing, retry, or persistence. Delivery is best-effort per subscriber:
//! a failing handler is caught, logged, and counted, and never blocks the
//! remaining subscribers. Subscriber and transformer registries take a
//! snapshot at iteration start, so concurrent registration never corrupts an
//! in-flight publish.

mod classify;
mod metrics;

pub use classify::classify_domain;
pub use metrics::BusMetrics;

use config::SystemConfig;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use types::{Domain, DomainError, NormalizedForm, Result};

/// Event payload delivered to subscribers
pub type Payload = NormalizedForm;

/// Subscriber callback. Errors are isolated per delivery: they are logged
/// and counted, never propagated to the publisher or other subscribers.
pub type Listener = Arc<dyn Fn(Payload) -> anyhow::Result<()> + Send + Sync>;

/// A payload rewrite applied when an event crosses into a subscriber's
/// domain. Transformers chain: each receives the full payload the previous
/// one returned, and none may short-circuit the chain.
pub trait DomainTransformer: Send + Sync {
    fn transform(&self, payload: Payload, source: Domain, target: Domain) -> Payload;
}

impl<F> DomainTransformer for F
where
    F: Fn(Payload, Domain, Domain) -> Payload + Send + Sync,
{
    fn transform(&self, payload: Payload, source: Domain, target: Domain) -> Payload {
        self(payload, source, target)
    }
}

/// Token identifying one subscription entry.
///
/// Subscribing the same handler twice yields two distinct tokens and two
/// independent deliveries; unsubscribing removes exactly the named entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: u64,
    domain: Domain,
    handler: Listener,
}

/// Result of one publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Domain the event was classified into
    pub domain: Domain,
    /// Subscribers that received the payload
    pub delivered: usize,
    /// Subscribers whose handler returned an error
    pub failed: usize,
}

/// Domain-aware event bus.
pub struct EventBus {
    subscribers: DashMap<String, Vec<Arc<Subscriber>>>,
    transformers: DashMap<Domain, Vec<Arc<dyn DomainTransformer>>>,
    metrics: BusMetrics,
    next_id: AtomicU64,
    default_domain: Domain,
}

impl EventBus {
    pub fn new(config: Arc<SystemConfig>) -> Self {
        let smoothing = config.get_f64(
            "bus.latency_smoothing",
            config::defaults::bus::LATENCY_SMOOTHING,
        );
        Self {
            subscribers: DashMap::new(),
            transformers: DashMap::new(),
            metrics: BusMetrics::new(smoothing),
            next_id: AtomicU64::new(0),
            default_domain: Domain::Computational,
        }
    }

    /// Publish an event, classifying its domain and delivering to every
    /// current subscriber of `event_type`.
    pub fn publish(&self, event_type: &str, payload: Payload) -> Result<PublishOutcome> {
        if event_type.is_empty() {
            return Err(DomainError::null_argument("event type"));
        }
        let started = Instant::now();
        self.metrics.record_event();

        let event_domain = classify_domain(event_type, &payload, self.default_domain);
        self.metrics.record_domain_event(event_domain);

        // Snapshot the subscriber list; registrations after this point do
        // not see this publish.
        let subscribers: Vec<Arc<Subscriber>> = self
            .subscribers
            .get(event_type)
            .map(|entry| entry.clone())
            .unwrap_or_default();

        let mut delivered = 0;
        let mut failed = 0;
        for subscriber in &subscribers {
            let final_payload = if subscriber.domain == event_domain {
                payload.clone()
            } else {
                self.transform_payload(payload.clone(), event_domain, subscriber.domain)
            };
            match (subscriber.handler)(final_payload) {
                Ok(()) => delivered += 1,
                Err(error) => {
                    // Isolated failure: log, count, keep delivering.
                    failed += 1;
                    self.metrics.record_delivery_failure();
                    warn!(
                        event_type,
                        subscriber = subscriber.id,
                        %error,
                        "subscriber delivery failed"
                    );
                }
            }
        }

        self.metrics.record_latency(started.elapsed().as_nanos() as u64);
        Ok(PublishOutcome {
            domain: event_domain,
            delivered,
            failed,
        })
    }

    /// Run the target domain's transformer chain over a payload
    fn transform_payload(&self, payload: Payload, source: Domain, target: Domain) -> Payload {
        self.metrics.record_transformation();
        let chain: Vec<Arc<dyn DomainTransformer>> = self
            .transformers
            .get(&target)
            .map(|entry| entry.clone())
            .unwrap_or_default();

        let mut transformed = payload;
        for transformer in &chain {
            transformed = transformer.transform(transformed, source, target);
        }
        transformed
    }

    /// Subscribe a handler to an event type.
    ///
    /// `domain` is the subscriber's target domain; unspecified defaults to
    /// the bus default (computational).
    pub fn subscribe(
        &self,
        event_type: &str,
        domain: Option<Domain>,
        handler: Listener,
    ) -> Result<SubscriptionId> {
        if event_type.is_empty() {
            return Err(DomainError::null_argument("event type"));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Arc::new(Subscriber {
            id,
            domain: domain.unwrap_or(self.default_domain),
            handler,
        });
        self.subscribers
            .entry(event_type.to_string())
            .or_default()
            .push(subscriber);
        self.metrics.record_subscribe();
        debug!(event_type, id, "subscriber registered");
        Ok(SubscriptionId(id))
    }

    /// Remove exactly one subscription entry
    pub fn unsubscribe(&self, event_type: &str, id: SubscriptionId) {
        let mut removed = false;
        if let Some(mut entry) = self.subscribers.get_mut(event_type) {
            let before = entry.len();
            entry.retain(|subscriber| subscriber.id != id.0);
            removed = entry.len() != before;
        }
        if removed {
            self.metrics.record_unsubscribe();
            debug!(event_type, id = id.0, "subscriber removed");
        }
    }

    /// Append a transformer to a target domain's ordered chain
    pub fn register_domain_transformer(
        &self,
        domain: Domain,
        transformer: Arc<dyn DomainTransformer>,
    ) {
        self.transformers.entry(domain).or_default().push(transformer);
    }

    /// Consistent (possibly stale) snapshot of all bus counters
    pub fn metrics(&self) -> NormalizedForm {
        self.metrics.snapshot()
    }

    /// The same snapshot as timestamped [`types::Metric`] records
    pub fn metric_records(&self) -> Vec<types::Metric> {
        self.metrics.records()
    }
}
