//! Custom schema contributors.
//!
//! Other components can contribute schemas dynamically by registering a
//! [`SchemaContributor`] under a URI scheme of their own (for example a
//! `kubernetes:` contributor). When the server asks for a custom schema,
//! every contributor is consulted in registration order; when it asks for
//! the content behind a custom URI, the request is routed to the
//! contributor owning that URI's scheme.

use std::collections::HashMap;

use thiserror::Error;

/// Answers custom schema lookups for a URI scheme.
pub trait SchemaContributor: Send + Sync {
    /// Returns the schema URI to use for `resource`, when this contributor
    /// has one.
    fn schema_for_resource(&self, resource: &str) -> Option<String>;

    /// Returns the schema content behind a URI in this contributor's
    /// scheme.
    fn schema_content(&self, uri: &str) -> Option<String>;
}

/// Errors raised while registering contributors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A contributor is already registered under the scheme.
    #[error("schema contributor for scheme '{scheme}' is already registered")]
    DuplicateContributor {
        /// Scheme that was registered twice.
        scheme: String,
    },
}

/// Registry of custom schema contributors keyed by URI scheme.
#[derive(Default)]
pub struct SchemaContributorRegistry {
    /// Registration order, preserved for lookup iteration.
    order: Vec<String>,
    contributors: HashMap<String, Box<dyn SchemaContributor>>,
}

impl SchemaContributorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contributor under a URI scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DuplicateContributor`] when the scheme is
    /// already taken.
    pub fn register(
        &mut self,
        scheme: impl Into<String>,
        contributor: Box<dyn SchemaContributor>,
    ) -> Result<(), ApiError> {
        let scheme = scheme.into();
        if self.contributors.contains_key(&scheme) {
            return Err(ApiError::DuplicateContributor { scheme });
        }
        self.order.push(scheme.clone());
        self.contributors.insert(scheme, contributor);
        Ok(())
    }

    /// Asks each contributor, in registration order, for a schema URI for
    /// `resource`.
    #[must_use]
    pub fn schema_for_resource(&self, resource: &str) -> Option<String> {
        self.order
            .iter()
            .filter_map(|scheme| self.contributors.get(scheme))
            .find_map(|contributor| contributor.schema_for_resource(resource))
    }

    /// Routes a content request to the contributor owning the URI's scheme.
    #[must_use]
    pub fn schema_content(&self, uri: &str) -> Option<String> {
        let scheme = uri.split(':').next()?;
        self.contributors
            .get(scheme)
            .and_then(|contributor| contributor.schema_content(uri))
    }

    /// Returns `true` when no contributors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

impl std::fmt::Debug for SchemaContributorRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SchemaContributorRegistry")
            .field("schemes", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests;
