//! Method names for the custom YAML server vocabulary.
//!
//! The analysis server extends standard LSP with a handful of custom
//! notifications and requests. The names are fixed by the server's wire
//! contract and must not change.

/// Notification carrying the schema association payload to the server.
pub const SCHEMA_ASSOCIATIONS_NOTIFICATION: &str = "json/schemaAssociations";

/// Notification telling the server the client answers custom schema
/// lookup requests.
pub const REGISTER_CUSTOM_SCHEMA_NOTIFICATION: &str = "yaml/registerCustomSchemaRequest";

/// Notification telling the server the client answers remote content
/// fetch requests.
pub const REGISTER_CONTENT_NOTIFICATION: &str = "yaml/registerVSCodeContentRequest";

/// Server-initiated request asking for a custom schema URI for a resource.
pub const CUSTOM_SCHEMA_REQUEST: &str = "custom/schema/request";

/// Server-initiated request asking for the content behind a custom schema
/// URI.
pub const CUSTOM_CONTENT_REQUEST: &str = "custom/schema/content";

/// Server-initiated request asking the client to fetch remote content on
/// the server's behalf.
pub const EDITOR_CONTENT_REQUEST: &str = "vscode/content";
