//! Technology registry: adapter and connector lookup keyed by technology
//! name.
//!
//! One logical instance exists per process, owned by the composition root
//! and shared by `Arc` clone. Registration is last-write-wins with no
//! duplicate detection; a technology counts as supported only when both an
//! adapter and a connector are registered under its name.

use adapters::{
    CognitiveAdapter, ComputationalAdapter, DomainAdapter, RepresentationalAdapter,
};
use config::SystemConfig;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Opaque technology connector.
///
/// The core never inspects connector internals; it only stores and hands
/// them back by name.
pub trait TechnologyConnector: Send + Sync {
    /// Technology name this connector bridges to
    fn technology(&self) -> &str;
}

/// Built-in connector that bridges a technology to itself.
pub struct LoopbackConnector {
    technology: String,
}

impl LoopbackConnector {
    pub fn new(technology: impl Into<String>) -> Self {
        Self {
            technology: technology.into(),
        }
    }
}

impl TechnologyConnector for LoopbackConnector {
    fn technology(&self) -> &str {
        &self.technology
    }
}

/// Registry of technology-specific adapters and connectors.
pub struct TechnologyRegistry {
    adapters: DashMap<String, Arc<dyn DomainAdapter>>,
    connectors: DashMap<String, Arc<dyn TechnologyConnector>>,
}

impl TechnologyRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            adapters: DashMap::new(),
            connectors: DashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in domain adapters and a
    /// loopback connector per technology, keyed by adapter identifier.
    pub fn with_builtins(config: &Arc<SystemConfig>) -> Self {
        let registry = Self::new();
        let builtins: [Arc<dyn DomainAdapter>; 3] = [
            Arc::new(CognitiveAdapter::new(config.clone())),
            Arc::new(ComputationalAdapter::new(config.clone())),
            Arc::new(RepresentationalAdapter::new(config.clone())),
        ];
        for adapter in builtins {
            let technology = adapter.identifier().to_string();
            registry.register_connector(&technology, Arc::new(LoopbackConnector::new(&technology)));
            registry.register_adapter(&technology, adapter);
        }
        registry
    }

    /// Register an adapter under a technology name, replacing any previous
    /// registration
    pub fn register_adapter(&self, technology: &str, adapter: Arc<dyn DomainAdapter>) {
        debug!(technology, "technology adapter registered");
        self.adapters.insert(technology.to_string(), adapter);
    }

    /// Register a connector under a technology name, replacing any previous
    /// registration
    pub fn register_connector(&self, technology: &str, connector: Arc<dyn TechnologyConnector>) {
        debug!(technology, "technology connector registered");
        self.connectors.insert(technology.to_string(), connector);
    }

    pub fn adapter(&self, technology: &str) -> Option<Arc<dyn DomainAdapter>> {
        self.adapters.get(technology).map(|entry| entry.clone())
    }

    pub fn connector(&self, technology: &str) -> Option<Arc<dyn TechnologyConnector>> {
        self.connectors.get(technology).map(|entry| entry.clone())
    }

    /// Names of every technology with a registered connector, sorted
    pub fn supported_technologies(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .connectors
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// True only when both a connector and an adapter exist for the name
    pub fn is_technology_supported(&self, technology: &str) -> bool {
        self.connectors.contains_key(technology) && self.adapters.contains_key(technology)
    }
}

impl Default for TechnologyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
