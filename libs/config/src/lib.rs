//! # Triad Centralized Configuration
//!
//! ## Purpose
//! Global and domain-scoped key/value settings for all Triad components,
//! with built-in defaults, typed accessors, and TOML file loading. The core
//! crates only ever call `get`-style accessors with a default; storage and
//! persistence stay behind this crate.
//!
//! ## Integration Points
//! - **Adapters**: read tunable policy (attention threshold, anchor sizing,
//!   working-memory capacity) through domain-scoped lookups
//! - **Event bus**: reads queue and latency-smoothing hints
//! - **Operators**: override defaults from a TOML file at composition time
//!
//! Thresholds here are tunable policy, not contract: nothing in the core
//! assumes the literal default values are semantically meaningful.

pub mod defaults;
mod settings;

pub use settings::{ConfigError, SystemConfig};
