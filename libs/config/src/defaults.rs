//! Default configuration values and constants
//!
//! This module contains default values used across Triad services for
//! consistency. Runtime overrides go through [`crate::SystemConfig`].

/// Cache defaults shared by adapters
pub mod cache {
    /// Whether read-through caching starts enabled
    pub const ENABLED: bool = true;

    /// Maximum cached normalized forms per adapter
    pub const MAX_SIZE: u64 = 10_000;

    /// Cache entry expiration (seconds)
    pub const EXPIRATION_SECS: u64 = 30 * 60;
}

/// Event bus defaults
pub mod bus {
    /// Soft bound on pending events per publish burst
    pub const MAX_QUEUE_SIZE: u64 = 1_000;

    /// Exponential smoothing factor for the rolling latency average
    pub const LATENCY_SMOOTHING: f64 = 0.5;
}

/// Cognitive domain defaults
pub mod cognitive {
    /// Attentional-focus score required for working-memory insertion
    pub const ATTENTION_THRESHOLD: f64 = 0.75;

    /// Working-memory capacity (Miller's 7±2)
    pub const WORKING_MEMORY_CAPACITY: u64 = 7;
}

/// Representational domain defaults
pub mod representational {
    /// Minimum string length for a scalar to become an anchor candidate
    pub const ANCHOR_MIN_STRING_LEN: u64 = 100;
}

/// Integration service defaults
pub mod integration {
    /// Key length beyond which the compression structure truncates
    pub const KEY_COMPRESSION_THRESHOLD: u64 = 20;

    /// Marker appended to truncated keys
    pub const KEY_ELLIPSIS: &str = "...";
}

/// Monitoring defaults
pub mod monitoring {
    /// Whether metric snapshots start enabled
    pub const ENABLED: bool = true;

    /// Snapshot cadence hint for external collectors (milliseconds)
    pub const METRICS_INTERVAL_MS: u64 = 30_000;
}
