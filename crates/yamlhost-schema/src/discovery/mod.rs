//! On-disk discovery of installed extensions.
//!
//! Hosts normally hand the daemon a descriptor snapshot directly; when the
//! daemon owns discovery it scans the extensions installation directory
//! instead. Each immediate subdirectory is one extension, and its
//! `package.json` is read leniently: a missing or unparseable manifest
//! produces a descriptor with no manifest rather than an error, matching
//! the collector's permissive treatment of extension metadata.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::descriptor::ExtensionDescriptor;

/// Log target for extension discovery.
const DISCOVERY_TARGET: &str = "yamlhost_schema::discovery";

/// Errors raised while enumerating the extensions directory.
///
/// Only the directory listing itself can fail; per-extension manifest
/// problems are absorbed into lenient descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The extensions directory could not be read.
    #[error("failed to read extensions directory '{path}': {source}")]
    ReadDir {
        /// Directory that was scanned.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Builds descriptors for every extension installed under `extensions_dir`.
///
/// Entries are sorted by directory name so repeated scans of an unchanged
/// installation produce an identical snapshot. Non-directory entries are
/// skipped.
///
/// # Errors
///
/// Returns [`DiscoveryError::ReadDir`] when the directory listing fails;
/// a missing directory counts as an empty installation.
pub fn discover_extensions(extensions_dir: &Path) -> Result<Vec<ExtensionDescriptor>, DiscoveryError> {
    let entries = match fs::read_dir(extensions_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(
                target: DISCOVERY_TARGET,
                path = %extensions_dir.display(),
                "extensions directory does not exist, treating as empty"
            );
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(DiscoveryError::ReadDir {
                path: extensions_dir.to_path_buf(),
                source,
            });
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    paths.sort();

    let descriptors = paths
        .into_iter()
        .map(|path| {
            let manifest = read_manifest(&path);
            ExtensionDescriptor::new(path, manifest)
        })
        .collect();
    Ok(descriptors)
}

/// Reads and parses an extension's `package.json`, tolerating failure.
fn read_manifest(extension_path: &Path) -> Option<Value> {
    let manifest_path = extension_path.join("package.json");
    let raw = match fs::read_to_string(&manifest_path) {
        Ok(raw) => raw,
        Err(error) => {
            debug!(
                target: DISCOVERY_TARGET,
                path = %manifest_path.display(),
                error = %error,
                "skipping unreadable extension manifest"
            );
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(
                target: DISCOVERY_TARGET,
                path = %manifest_path.display(),
                error = %error,
                "skipping unparseable extension manifest"
            );
            None
        }
    }
}
