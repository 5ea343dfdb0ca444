//! The association collector.
//!
//! Scans an ordered snapshot of extension descriptors for
//! `contributes.yamlValidation` entries and flattens them into the
//! association list sent to the analysis server. Relative order is
//! preserved, both across extensions and across entries within one
//! extension.
//!
//! Malformed shapes are skipped silently at every level. Upgrading a
//! mismatch to an error would change observable behaviour for real-world
//! extension manifests, so validation stays duck-typed and permissive.

use std::path::Path;

use serde_json::Value;
use url::Url;

use crate::association::SchemaAssociation;
use crate::descriptor::ExtensionDescriptor;

/// Placeholder token for the per-user settings directory.
const APP_SETTINGS_HOME: &str = "%APP_SETTINGS_HOME%";
/// Placeholder token for the machine-wide settings directory.
const MACHINE_SETTINGS_HOME: &str = "%MACHINE_SETTINGS_HOME%";
/// Placeholder token for the workspace storage directory.
const APP_WORKSPACES_HOME: &str = "%APP_WORKSPACES_HOME%";

/// Collects schema associations from a snapshot of extension descriptors.
///
/// The collector is a pure function: it performs no I/O, never mutates its
/// input, and recomputes the full list on every call. Callers invoke it
/// once at startup and again each time the host's extension set changes.
#[must_use]
pub fn collect_schema_associations(extensions: &[ExtensionDescriptor]) -> Vec<SchemaAssociation> {
    let mut associations = Vec::new();
    for extension in extensions {
        let Some(entries) = extension.yaml_validation() else {
            continue;
        };
        for entry in entries {
            let Some(association) = association_from_entry(entry, extension.extension_path())
            else {
                continue;
            };
            associations.push(association);
        }
    }
    associations
}

/// Builds one association from a raw validation entry, or `None` when the
/// entry does not match the expected `{fileMatch, url}` contract.
fn association_from_entry(entry: &Value, extension_path: &Path) -> Option<SchemaAssociation> {
    let patterns = file_match_patterns(entry)?;
    let url = entry.get("url")?.as_str()?;
    let uri = resolve_schema_uri(url, extension_path)?;
    let file_match = patterns.iter().map(|fm| normalize_pattern(fm)).collect();
    Some(SchemaAssociation { file_match, uri })
}

/// Extracts the `fileMatch` field as a list of patterns.
///
/// A bare string is wrapped into a one-element list. Non-string members of
/// an array form are dropped; an entry left with no patterns at all is
/// rejected so the output invariant (non-empty `fileMatch`) holds.
fn file_match_patterns(entry: &Value) -> Option<Vec<String>> {
    let patterns: Vec<String> = match entry.get("fileMatch")? {
        Value::String(single) => vec![single.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => return None,
    };
    if patterns.is_empty() {
        return None;
    }
    Some(patterns)
}

/// Resolves a schema URL against the extension's install path.
///
/// URLs starting with `./` are joined onto the extension path and converted
/// to a `file://` URI; anything else passes through verbatim. Returns
/// `None` when the extension path cannot form a file URI (a non-absolute
/// path), which drops the entry like any other malformed shape.
fn resolve_schema_uri(url: &str, extension_path: &Path) -> Option<String> {
    match url.strip_prefix("./") {
        Some(relative) => Url::from_file_path(extension_path.join(relative))
            .ok()
            .map(String::from),
        None => Some(url.to_owned()),
    }
}

/// Normalises a single file-match pattern.
///
/// Patterns starting with `%` get their placeholder tokens substituted;
/// only the first occurrence of each token is replaced. Patterns that are
/// not already absolute-style (a URI scheme, a leading `/`, or a leading
/// `!` exclusion) are prefixed with `/`.
fn normalize_pattern(pattern: &str) -> String {
    if pattern.starts_with('%') {
        pattern
            .replacen(APP_SETTINGS_HOME, "/User", 1)
            .replacen(MACHINE_SETTINGS_HOME, "/Machine", 1)
            .replacen(APP_WORKSPACES_HOME, "/Workspaces", 1)
    } else if is_absolute_style(pattern) {
        pattern.to_owned()
    } else {
        format!("/{pattern}")
    }
}

/// Whether a pattern already starts with a URI scheme, `/`, or `!`.
fn is_absolute_style(pattern: &str) -> bool {
    pattern.starts_with('/') || pattern.starts_with('!') || has_uri_scheme(pattern)
}

/// Whether the pattern starts with `<word-characters>://`.
fn has_uri_scheme(pattern: &str) -> bool {
    let Some((scheme, _)) = pattern.split_once("://") else {
        return false;
    };
    !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
