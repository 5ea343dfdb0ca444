//! Schema association discovery for the YAML language server.
//!
//! Installed editor extensions may contribute YAML validation schemas
//! through the `contributes.yamlValidation` section of their `package.json`
//! manifest. This crate scans a snapshot of extension descriptors, extracts
//! those contributions, normalises their file-match patterns and schema
//! URIs, and produces the flat association list that the external YAML
//! analysis server consumes to pick a validation schema for a document.
//!
//! Extension metadata is third-party and untrusted, so the scan is
//! deliberately permissive: any shape that does not match the expected
//! contract is treated as "this extension contributes nothing" and skipped
//! without an error. The collector itself is a pure function over its
//! input; it performs no I/O, holds no state between invocations, and is
//! cheap to re-run whenever the host's extension set changes.

mod association;
mod collect;
mod descriptor;
mod discovery;

pub use association::{SchemaAssociation, SchemaAssociations};
pub use collect::collect_schema_associations;
pub use descriptor::ExtensionDescriptor;
pub use discovery::{DiscoveryError, discover_extensions};
