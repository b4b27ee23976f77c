//! Domain classification for published events.
//!
//! Classification is layered: an explicit `domain` key in the payload always
//! wins, then a dotted event-type prefix (`cognitive.update`), then payload
//! shape heuristics, then the bus default.

use crate::Payload;
use types::Domain;

/// Payload keys that mark a cognitively-shaped event
const COGNITIVE_KEYS: &[&str] = &["cognitive_state", "awareness", "working_memory"];

/// Payload keys that mark a representationally-shaped event
const REPRESENTATIONAL_KEYS: &[&str] = &["structure", "anchors", "references"];

pub fn classify_domain(event_type: &str, payload: &Payload, default: Domain) -> Domain {
    if let Some(domain) = payload
        .get("domain")
        .and_then(|value| value.as_str())
        .and_then(|name| name.parse::<Domain>().ok())
    {
        return domain;
    }

    if let Some((prefix, _)) = event_type.split_once('.') {
        if let Ok(domain) = prefix.parse::<Domain>() {
            return domain;
        }
    }

    if COGNITIVE_KEYS.iter().any(|key| payload.contains_key(*key)) {
        return Domain::Cognitive;
    }
    if REPRESENTATIONAL_KEYS
        .iter()
        .any(|key| payload.contains_key(*key))
    {
        return Domain::Representational;
    }

    default
}
