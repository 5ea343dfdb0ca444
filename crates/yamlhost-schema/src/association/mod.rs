//! Output types for schema association discovery.
//!
//! The analysis server accepts the `json/schemaAssociations` payload in two
//! wire shapes: a mapping from file-match pattern to schema URIs, or a flat
//! sequence of `{fileMatch, uri}` records. The collector always produces
//! the sequence shape; the mapping shape exists so payloads received from
//! other hosts can still be decoded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single schema association: one or more file-match glob patterns bound
/// to a schema URI.
///
/// Invariants upheld by the collector: `file_match` is non-empty and every
/// pattern in it is normalised; `uri` is a fully resolved absolute URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAssociation {
    /// Normalised file-match glob patterns.
    pub file_match: Vec<String>,
    /// Absolute schema URI.
    pub uri: String,
}

impl SchemaAssociation {
    /// Creates an association from its parts.
    #[must_use]
    pub fn new(file_match: Vec<String>, uri: impl Into<String>) -> Self {
        Self {
            file_match,
            uri: uri.into(),
        }
    }
}

/// Notification payload for `json/schemaAssociations`.
///
/// Serialises to whichever of the two accepted wire shapes it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaAssociations {
    /// Flat sequence of association records (the collector's output shape).
    Sequence(Vec<SchemaAssociation>),
    /// Mapping from file-match pattern to schema URIs.
    Mapping(BTreeMap<String, Vec<String>>),
}

impl From<Vec<SchemaAssociation>> for SchemaAssociations {
    fn from(associations: Vec<SchemaAssociation>) -> Self {
        Self::Sequence(associations)
    }
}

impl SchemaAssociations {
    /// Returns `true` when the payload carries no associations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(map) => map.is_empty(),
        }
    }

    /// Number of associations in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(items) => items.len(),
            Self::Mapping(map) => map.len(),
        }
    }
}

#[cfg(test)]
mod tests;
