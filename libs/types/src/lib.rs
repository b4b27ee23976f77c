//! # Triad Shared Types
//!
//! ## Purpose
//! Foundation types shared by every Triad crate: the closed [`Domain`]
//! enumeration, the untyped [`Entity`] value model with its canonical
//! [`NormalizedForm`], immutable [`Metric`] records, and the common
//! [`DomainError`] taxonomy.
//!
//! ## Integration Points
//! - **Adapters**: consume `Entity`/`NormalizedForm` and raise `DomainError`
//! - **Event bus**: classifies payloads into a `Domain` before delivery
//! - **Integration service**: keys adapter lookups by `Domain`
//! - **Metrics consumers**: read `Metric` snapshots, never mutate them
//!
//! ## Architecture Role
//! ```text
//! Producer → EventBus → Transformer Chain → Subscriber
//!               ↓              ↓
//!            Domain      NormalizedForm
//!               ↑              ↑
//!       DomainAdapter.to_normalized_form / from_normalized_form
//! ```

pub mod domain;
pub mod entity;
pub mod error;
pub mod metric;

pub use domain::{Domain, UnknownDomain};
pub use entity::{unwrap_entity, wrap_entity, Entity, NormalizedForm, VALUE_KEY};
pub use error::{DomainError, Result};
pub use metric::{Metric, MetricBuilder, MetricKind};
