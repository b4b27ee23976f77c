//! The fixed set of integration points.
//!
//! Three pairwise points carry an entity across a specific domain boundary
//! by normalizing with the source adapter and denormalizing with the target
//! adapter. The meta point has no fixed pair: it fans the entity through
//! every registered adapter and the isomorphic structures.

use types::Domain;

/// A named crossing between domains.
///
/// The set is closed. Dispatch matches on the variant rather than looking up
/// registered callbacks, so an exhaustive `match` covers every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationPoint {
    /// Computational → Cognitive
    ComputationalCognitive,
    /// Cognitive → Representational
    CognitiveRepresentational,
    /// Representational → Computational
    RepresentationalComputational,
    /// Meta-level integration across all registered domains
    MetaIntegration,
}

impl IntegrationPoint {
    /// Every point, in a stable order
    pub const ALL: [IntegrationPoint; 4] = [
        IntegrationPoint::ComputationalCognitive,
        IntegrationPoint::CognitiveRepresentational,
        IntegrationPoint::RepresentationalComputational,
        IntegrationPoint::MetaIntegration,
    ];

    /// Stable string id used in logs and external lookups
    pub fn id(&self) -> &'static str {
        match self {
            IntegrationPoint::ComputationalCognitive => "computational_cognitive",
            IntegrationPoint::CognitiveRepresentational => "cognitive_representational",
            IntegrationPoint::RepresentationalComputational => "representational_computational",
            IntegrationPoint::MetaIntegration => "meta_integration",
        }
    }

    /// Parse a point id
    pub fn from_id(id: &str) -> Option<Self> {
        IntegrationPoint::ALL.into_iter().find(|point| point.id() == id)
    }

    /// Source/target pair for the pairwise points; `None` for the meta point
    pub fn domain_pair(&self) -> Option<(Domain, Domain)> {
        match self {
            IntegrationPoint::ComputationalCognitive => {
                Some((Domain::Computational, Domain::Cognitive))
            }
            IntegrationPoint::CognitiveRepresentational => {
                Some((Domain::Cognitive, Domain::Representational))
            }
            IntegrationPoint::RepresentationalComputational => {
                Some((Domain::Representational, Domain::Computational))
            }
            IntegrationPoint::MetaIntegration => None,
        }
    }
}
