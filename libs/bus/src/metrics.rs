//! Bus-level operational counters.
//!
//! All counters are relaxed atomics: increments are wait-free on the publish
//! path and [`BusMetrics::snapshot`] reads a consistent-enough view for
//! monitoring. Latency is a smoothed moving average over publish durations.

use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use types::{Domain, Metric, MetricKind, NormalizedForm};

pub struct BusMetrics {
    total_events: AtomicU64,
    domain_events: [AtomicU64; Domain::ALL.len()],
    transformations: AtomicU64,
    delivery_failures: AtomicU64,
    active_subscribers: AtomicU64,
    /// Smoothed publish latency in nanoseconds, 0 until the first sample
    latency_ns: AtomicU64,
    smoothing: f64,
}

impl BusMetrics {
    pub fn new(smoothing: f64) -> Self {
        Self {
            total_events: AtomicU64::new(0),
            domain_events: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            transformations: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            active_subscribers: AtomicU64::new(0),
            latency_ns: AtomicU64::new(0),
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn record_event(&self) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_domain_event(&self, domain: Domain) {
        self.domain_events[domain as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transformation(&self) {
        self.transformations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subscribe(&self) {
        self.active_subscribers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unsubscribe(&self) {
        self.active_subscribers.fetch_sub(1, Ordering::Relaxed);
    }

    /// Fold a new latency sample into the moving average. A lost race
    /// between concurrent publishes drops one sample, which is acceptable
    /// for a monitoring value.
    pub fn record_latency(&self, sample_ns: u64) {
        let old = self.latency_ns.load(Ordering::Relaxed);
        let new = if old == 0 {
            sample_ns
        } else {
            (old as f64 * (1.0 - self.smoothing) + sample_ns as f64 * self.smoothing) as u64
        };
        self.latency_ns.store(new, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> NormalizedForm {
        let mut form = NormalizedForm::new();
        form.insert(
            "total_events".into(),
            json!(self.total_events.load(Ordering::Relaxed)),
        );
        for domain in Domain::ALL {
            form.insert(
                format!("events.{}", domain.as_str()),
                json!(self.domain_events[domain as usize].load(Ordering::Relaxed)),
            );
        }
        form.insert(
            "domain_transformations".into(),
            json!(self.transformations.load(Ordering::Relaxed)),
        );
        form.insert(
            "delivery_failures".into(),
            json!(self.delivery_failures.load(Ordering::Relaxed)),
        );
        form.insert(
            "active_subscribers".into(),
            json!(self.active_subscribers.load(Ordering::Relaxed)),
        );
        form.insert(
            "event_latency_ns".into(),
            json!(self.latency_ns.load(Ordering::Relaxed)),
        );
        form
    }

    /// The same snapshot as timestamped [`Metric`] records, for external
    /// collectors that store measurements rather than raw maps
    pub fn records(&self) -> Vec<Metric> {
        let mut records = vec![Metric::counter(
            "total_events",
            self.total_events.load(Ordering::Relaxed),
        )];
        for domain in Domain::ALL {
            records.push(
                Metric::builder(
                    format!("events.{}", domain.as_str()),
                    self.domain_events[domain as usize].load(Ordering::Relaxed) as f64,
                )
                .kind(MetricKind::Counter)
                .domain(domain)
                .build(),
            );
        }
        records.push(Metric::counter(
            "domain_transformations",
            self.transformations.load(Ordering::Relaxed),
        ));
        records.push(Metric::counter(
            "delivery_failures",
            self.delivery_failures.load(Ordering::Relaxed),
        ));
        records.push(
            Metric::builder(
                "active_subscribers",
                self.active_subscribers.load(Ordering::Relaxed) as f64,
            )
            .build(),
        );
        records.push(
            Metric::builder(
                "event_latency_ns",
                self.latency_ns.load(Ordering::Relaxed) as f64,
            )
            .kind(MetricKind::Timer)
            .build(),
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_latency_sample_seeds_the_average() {
        let metrics = BusMetrics::new(0.5);
        metrics.record_latency(1_000);
        assert_eq!(metrics.snapshot()["event_latency_ns"], json!(1_000));
    }

    #[test]
    fn later_samples_blend() {
        let metrics = BusMetrics::new(0.5);
        metrics.record_latency(1_000);
        metrics.record_latency(3_000);
        assert_eq!(metrics.snapshot()["event_latency_ns"], json!(2_000));
    }

    #[test]
    fn records_carry_kinds_and_domain_tags() {
        let metrics = BusMetrics::new(0.5);
        metrics.record_event();
        metrics.record_domain_event(Domain::Cognitive);

        let records = metrics.records();
        let cognitive = records
            .iter()
            .find(|metric| metric.name == "events.cognitive")
            .unwrap();
        assert_eq!(cognitive.kind, MetricKind::Counter);
        assert_eq!(cognitive.domain, Some(Domain::Cognitive));
        assert_eq!(cognitive.value, 1.0);

        let latency = records
            .iter()
            .find(|metric| metric.name == "event_latency_ns")
            .unwrap();
        assert_eq!(latency.kind, MetricKind::Timer);
    }

    #[test]
    fn subscriber_gauge_moves_both_ways() {
        let metrics = BusMetrics::new(0.5);
        metrics.record_subscribe();
        metrics.record_subscribe();
        metrics.record_unsubscribe();
        assert_eq!(metrics.snapshot()["active_subscribers"], json!(1));
    }
}
