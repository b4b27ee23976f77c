//! Error taxonomy shared across the Triad crates.
//!
//! Every condition here is local and recoverable: callers choose to retry or
//! skip, adapters keep their internal state, and nothing is fatal to process
//! lifetime.

use crate::Domain;

/// Result type alias for Triad operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Error raised by adapters, the event bus, and the integration service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A required entity, domain, or listener argument was missing
    #[error("missing required argument: {what}")]
    NullArgument {
        /// What was expected and absent
        what: String,
    },

    /// Entity failed a shape or domain check
    #[error("invalid entity for {domain} domain: {reason}")]
    InvalidEntity {
        /// Domain the entity was validated against
        domain: Domain,
        /// What the shape check found
        reason: String,
    },

    /// No transform path exists for the requested domain pair.
    /// Field names avoid `source`, which thiserror reserves for error
    /// chaining.
    #[error("unsupported transformation: {from} -> {to}")]
    UnsupportedTransformation {
        /// Requested source domain
        from: Domain,
        /// Requested target domain
        to: Domain,
    },

    /// Isomorphic structure id is not registered
    #[error("unknown isomorphic structure: {id}")]
    UnknownStructure {
        /// The id that failed lookup
        id: String,
    },

    /// Technology name has no registered connector/adapter pair
    #[error("unsupported technology: {technology}")]
    UnsupportedTechnology {
        /// The unregistered technology name
        technology: String,
    },

    /// A metric snapshot call failed while broadcasting to listeners.
    /// Wrapped and counted at the collection boundary, never propagated
    /// further.
    #[error("metric collection failed: {reason}")]
    MetricCollection {
        /// Underlying failure, stringified
        reason: String,
    },
}

impl DomainError {
    /// Missing-argument constructor
    pub fn null_argument(what: impl Into<String>) -> Self {
        DomainError::NullArgument { what: what.into() }
    }

    /// Shape/domain-check constructor
    pub fn invalid_entity(domain: Domain, reason: impl Into<String>) -> Self {
        DomainError::InvalidEntity {
            domain,
            reason: reason.into(),
        }
    }

    /// Metric-boundary constructor
    pub fn metric_collection(reason: impl Into<String>) -> Self {
        DomainError::MetricCollection {
            reason: reason.into(),
        }
    }

    /// Transform-path constructor
    pub fn unsupported_transformation(source: Domain, target: Domain) -> Self {
        DomainError::UnsupportedTransformation {
            from: source,
            to: target,
        }
    }

    /// True when retrying the same call with corrected input can succeed
    pub fn is_recoverable(&self) -> bool {
        // Closed taxonomy: everything in it is caller-recoverable.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_domain_pair() {
        let err =
            DomainError::unsupported_transformation(Domain::Cognitive, Domain::Representational);
        assert_eq!(
            err.to_string(),
            "unsupported transformation: cognitive -> representational"
        );
    }

    #[test]
    fn transformation_error_carries_the_pair_without_chaining() {
        let err =
            DomainError::unsupported_transformation(Domain::Computational, Domain::Cognitive);
        assert!(matches!(
            err,
            DomainError::UnsupportedTransformation {
                from: Domain::Computational,
                to: Domain::Cognitive,
            }
        ));
        // The pair is payload, not a wrapped error
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn every_variant_is_recoverable() {
        let err = DomainError::invalid_entity(Domain::Computational, "not a mapping");
        assert!(err.is_recoverable());
    }
}
