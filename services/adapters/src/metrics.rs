//! Atomic counter sets backing adapter metric snapshots.
//!
//! Counters mutate lock-free on the hot path; consumers read a consistent
//! (possibly stale) snapshot keyed by counter name.

use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use types::NormalizedForm;

/// Named monotonic counters with relaxed-ordering increments.
#[derive(Debug, Default)]
pub struct CounterSet {
    counters: DashMap<&'static str, AtomicU64>,
}

impl CounterSet {
    /// Pre-register counters so snapshots report zeroes before first use
    pub fn new(names: &[&'static str]) -> Self {
        let counters = DashMap::with_capacity(names.len());
        for &name in names {
            counters.insert(name, AtomicU64::new(0));
        }
        Self { counters }
    }

    /// Increment by one, registering the counter on first touch
    pub fn incr(&self, name: &'static str) {
        self.counters
            .entry(name)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value, zero if never touched
    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Snapshot all counters into a mapping, sorted by name for stable output
    pub fn snapshot(&self) -> NormalizedForm {
        let mut entries: Vec<(&'static str, u64)> = self
            .counters
            .iter()
            .map(|entry| (*entry.key(), entry.value().load(Ordering::Relaxed)))
            .collect();
        entries.sort_by_key(|(name, _)| *name);

        let mut form = NormalizedForm::new();
        for (name, value) in entries {
            form.insert(name.to_string(), json!(value));
        }
        form
    }
}
