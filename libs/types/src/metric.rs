//! Immutable metric records reported by adapters and the event bus.
//!
//! A `Metric` is built once and never mutated; its lifecycle ends when the
//! collecting component discards it. Mutable counters live with their owners
//! as atomics and are snapshotted into these records on read.

use crate::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Measurement kinds supported by metric consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Timer,
}

/// A single metric measurement with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name, dotted (e.g. `events.cognitive`)
    pub name: String,
    /// Measured value
    pub value: f64,
    /// Measurement kind
    pub kind: MetricKind,
    /// When the measurement was taken
    pub timestamp: SystemTime,
    /// Domain tag, when the metric is domain-scoped
    pub domain: Option<Domain>,
    /// Free-form key/value tags
    pub tags: BTreeMap<String, String>,
}

impl Metric {
    /// Start building a metric; kind defaults to [`MetricKind::Gauge`]
    pub fn builder(name: impl Into<String>, value: f64) -> MetricBuilder {
        MetricBuilder {
            name: name.into(),
            value,
            kind: MetricKind::Gauge,
            domain: None,
            tags: BTreeMap::new(),
        }
    }

    /// Shorthand for a plain counter sample
    pub fn counter(name: impl Into<String>, value: u64) -> Self {
        Metric::builder(name, value as f64)
            .kind(MetricKind::Counter)
            .build()
    }
}

/// Builder for [`Metric`] records
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    name: String,
    value: f64,
    kind: MetricKind,
    domain: Option<Domain>,
    tags: BTreeMap<String, String>,
}

impl MetricBuilder {
    pub fn kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Finalize; the timestamp is taken here
    pub fn build(self) -> Metric {
        Metric {
            name: self.name,
            value: self.value,
            kind: self.kind,
            timestamp: SystemTime::now(),
            domain: self.domain,
            tags: self.tags,
        }
    }
}
