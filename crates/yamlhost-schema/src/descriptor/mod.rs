//! Extension descriptor snapshots.
//!
//! A descriptor pairs an installed extension's filesystem path with its raw
//! `package.json` manifest. The manifest is kept as an untyped
//! [`serde_json::Value`] on purpose: contribution metadata is third-party
//! and frequently malformed, so the collector duck-types its way through it
//! rather than rejecting manifests that fail a strict schema.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Read-only snapshot of an installed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    extension_path: PathBuf,
    package_json: Option<Value>,
}

impl ExtensionDescriptor {
    /// Creates a descriptor from an extension path and its raw manifest.
    #[must_use]
    pub fn new(extension_path: impl Into<PathBuf>, package_json: Option<Value>) -> Self {
        Self {
            extension_path: extension_path.into(),
            package_json,
        }
    }

    /// Absolute filesystem path of the installed extension.
    #[must_use]
    pub fn extension_path(&self) -> &Path {
        &self.extension_path
    }

    /// Raw manifest content, when one was present and parseable.
    #[must_use]
    pub const fn package_json(&self) -> Option<&Value> {
        self.package_json.as_ref()
    }

    /// Returns the `contributes.yamlValidation` entries, if the manifest
    /// declares them as an array.
    ///
    /// Any missing or differently-typed level of the manifest yields `None`;
    /// absent metadata is an expected case, never an error.
    #[must_use]
    pub fn yaml_validation(&self) -> Option<&[Value]> {
        self.package_json
            .as_ref()?
            .get("contributes")?
            .get("yamlValidation")?
            .as_array()
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests;
