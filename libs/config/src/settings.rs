//! Runtime settings store with global and domain-scoped scopes.
//!
//! Keys are dotted strings; values are JSON values so callers can store
//! anything the entity model can express. Domain-scoped lookups fall back to
//! the global scope before applying the caller's default.

use crate::defaults;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use types::Domain;

/// Errors raised while loading configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config references unknown domain: {0}")]
    UnknownDomain(String),
}

/// System-wide configuration with domain awareness.
///
/// Read-heavy and write-light; both scopes sit behind `RwLock`ed maps so
/// concurrent readers never block each other.
#[derive(Debug)]
pub struct SystemConfig {
    settings: RwLock<HashMap<String, Value>>,
    domain_settings: RwLock<HashMap<Domain, HashMap<String, Value>>>,
}

impl SystemConfig {
    /// Construct with built-in defaults for every scope
    pub fn new() -> Self {
        let config = Self {
            settings: RwLock::new(HashMap::new()),
            domain_settings: RwLock::new(HashMap::new()),
        };
        config.set_defaults();
        config
    }

    fn set_defaults(&self) {
        {
            let mut settings = self.settings.write();
            settings.insert("cache.enabled".into(), json!(defaults::cache::ENABLED));
            settings.insert("cache.max_size".into(), json!(defaults::cache::MAX_SIZE));
            settings.insert(
                "cache.expiration_secs".into(),
                json!(defaults::cache::EXPIRATION_SECS),
            );
            settings.insert(
                "monitoring.enabled".into(),
                json!(defaults::monitoring::ENABLED),
            );
            settings.insert(
                "monitoring.metrics_interval_ms".into(),
                json!(defaults::monitoring::METRICS_INTERVAL_MS),
            );
            settings.insert(
                "bus.max_queue_size".into(),
                json!(defaults::bus::MAX_QUEUE_SIZE),
            );
            settings.insert(
                "bus.latency_smoothing".into(),
                json!(defaults::bus::LATENCY_SMOOTHING),
            );
        }

        let mut domains = self.domain_settings.write();
        let computational = domains.entry(Domain::Computational).or_default();
        computational.insert("optimization.strategy".into(), json!("performance"));
        computational.insert("cache.policy".into(), json!("lru"));
        computational.insert("validation.level".into(), json!("strict"));

        let cognitive = domains.entry(Domain::Cognitive).or_default();
        cognitive.insert("optimization.strategy".into(), json!("adaptive"));
        cognitive.insert("learning.enabled".into(), json!(true));
        cognitive.insert(
            "attention.threshold".into(),
            json!(defaults::cognitive::ATTENTION_THRESHOLD),
        );
        cognitive.insert(
            "memory.working_capacity".into(),
            json!(defaults::cognitive::WORKING_MEMORY_CAPACITY),
        );

        let representational = domains.entry(Domain::Representational).or_default();
        representational.insert("optimization.strategy".into(), json!("space"));
        representational.insert("compression.enabled".into(), json!(true));
        representational.insert(
            "anchor.min_string_len".into(),
            json!(defaults::representational::ANCHOR_MIN_STRING_LEN),
        );
    }

    /// Load settings from a TOML file, merged over the defaults.
    ///
    /// Top-level tables flatten into dotted keys; a `[domains.<name>]` table
    /// feeds the named domain's scope. Unknown domain names are rejected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    /// Load settings from a TOML string, merged over the defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: toml::Value = raw.parse()?;
        let config = Self::new();

        if let toml::Value::Table(table) = parsed {
            for (key, value) in table {
                if key == "domains" {
                    config.merge_domain_table(value)?;
                } else {
                    config.merge_flattened(&key, value);
                }
            }
        }
        Ok(config)
    }

    fn merge_domain_table(&self, value: toml::Value) -> Result<(), ConfigError> {
        let toml::Value::Table(domains) = value else {
            return Ok(());
        };
        for (name, table) in domains {
            let domain =
                Domain::from_str(&name).map_err(|_| ConfigError::UnknownDomain(name.clone()))?;
            if let toml::Value::Table(entries) = table {
                for (key, entry) in entries {
                    for (flat_key, value) in flatten_entries(&key, entry) {
                        self.set_domain_setting(domain, flat_key, value);
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_flattened(&self, prefix: &str, value: toml::Value) {
        for (key, json) in flatten_entries(prefix, value) {
            self.set(key, json);
        }
    }

    /// Set a global setting
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.settings.write().insert(key.into(), value);
    }

    /// Get a global setting
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings.read().get(key).cloned()
    }

    /// Get a global setting, falling back to the supplied default
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Typed accessor: floating point
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
    }

    /// Typed accessor: unsigned integer
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get(key).and_then(|v| v.as_u64()).unwrap_or(default)
    }

    /// Typed accessor: boolean
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    /// True when `<feature>.enabled` is set and truthy
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.get_bool(&format!("{feature}.enabled"), false)
    }

    /// Set a domain-scoped setting
    pub fn set_domain_setting(&self, domain: Domain, key: impl Into<String>, value: Value) {
        self.domain_settings
            .write()
            .entry(domain)
            .or_default()
            .insert(key.into(), value);
    }

    /// Get a domain-scoped setting; falls back to the global scope
    pub fn domain_setting(&self, domain: Domain, key: &str) -> Option<Value> {
        let scoped = self
            .domain_settings
            .read()
            .get(&domain)
            .and_then(|map| map.get(key).cloned());
        scoped.or_else(|| self.get(key))
    }

    /// Get a domain-scoped setting with a default
    pub fn domain_setting_or(&self, domain: Domain, key: &str, default: Value) -> Value {
        self.domain_setting(domain, key).unwrap_or(default)
    }

    /// Typed domain accessor: floating point
    pub fn domain_f64(&self, domain: Domain, key: &str, default: f64) -> f64 {
        self.domain_setting(domain, key)
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    /// Typed domain accessor: unsigned integer
    pub fn domain_u64(&self, domain: Domain, key: &str, default: u64) -> u64 {
        self.domain_setting(domain, key)
            .and_then(|v| v.as_u64())
            .unwrap_or(default)
    }

    /// Snapshot of one domain's scope
    pub fn domain_settings(&self, domain: Domain) -> HashMap<String, Value> {
        self.domain_settings
            .read()
            .get(&domain)
            .cloned()
            .unwrap_or_default()
    }

    /// Bulk-merge global settings
    pub fn merge(&self, new_settings: HashMap<String, Value>) {
        self.settings.write().extend(new_settings);
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => json!(i),
        toml::Value::Float(f) => json!(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect(),
        ),
    }
}

fn flatten_entries(prefix: &str, value: toml::Value) -> Vec<(String, Value)> {
    match value {
        toml::Value::Table(table) => table
            .into_iter()
            .flat_map(|(key, inner)| flatten_entries(&format!("{prefix}.{key}"), inner))
            .collect(),
        other => vec![(prefix.to_string(), to_json(other))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_present() {
        let config = SystemConfig::new();
        assert!(config.get_bool("cache.enabled", false));
        assert_eq!(config.get_u64("cache.max_size", 0), 10_000);
        assert_eq!(
            config.domain_f64(Domain::Cognitive, "attention.threshold", 0.0),
            0.75
        );
        assert_eq!(
            config.domain_u64(Domain::Cognitive, "memory.working_capacity", 0),
            7
        );
    }

    #[test]
    fn domain_lookup_falls_back_to_global() {
        let config = SystemConfig::new();
        config.set("shared.flag", json!(true));
        assert_eq!(
            config.domain_setting(Domain::Computational, "shared.flag"),
            Some(json!(true))
        );
    }

    #[test]
    fn domain_scope_shadows_global() {
        let config = SystemConfig::new();
        config.set("level", json!("global"));
        config.set_domain_setting(Domain::Cognitive, "level", json!("scoped"));
        assert_eq!(
            config.domain_setting(Domain::Cognitive, "level"),
            Some(json!("scoped"))
        );
        assert_eq!(
            config.domain_setting(Domain::Computational, "level"),
            Some(json!("global"))
        );
    }

    #[test]
    fn loads_toml_with_domain_sections() {
        let raw = r#"
            [cache]
            max_size = 500

            [domains.cognitive]
            "attention.threshold" = 0.9

            [domains.representational]
            "anchor.min_string_len" = 32
        "#;
        let config = SystemConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.get_u64("cache.max_size", 0), 500);
        assert_eq!(
            config.domain_f64(Domain::Cognitive, "attention.threshold", 0.0),
            0.9
        );
        assert_eq!(
            config.domain_u64(Domain::Representational, "anchor.min_string_len", 0),
            32
        );
        // Untouched defaults survive the merge
        assert!(config.get_bool("monitoring.enabled", false));
    }

    #[test]
    fn rejects_unknown_domain_section() {
        let raw = r#"
            [domains.quantum]
            anything = 1
        "#;
        let result = SystemConfig::from_toml_str(raw);
        assert!(matches!(result, Err(ConfigError::UnknownDomain(name)) if name == "quantum"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bus]\nmax_queue_size = 64").unwrap();
        let config = SystemConfig::from_file(file.path()).unwrap();
        assert_eq!(config.get_u64("bus.max_queue_size", 0), 64);
    }
}
