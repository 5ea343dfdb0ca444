//! The settings payload forwarded to the analysis server.
//!
//! The server synchronises a fixed set of configuration sections: `yaml`,
//! `http.proxy`, `http.proxyStrictSSL`, `editor.tabSize`, and the `[yaml]`
//! language-scoped overrides. The types here serialise with exactly the
//! key names the server expects so the payload can be sent verbatim in a
//! `workspace/didChangeConfiguration` notification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::{default_tab_size, default_true};

/// Full configuration payload pushed to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPayload {
    /// The `yaml` section.
    #[serde(default)]
    pub yaml: YamlSettings,
    /// The `http` section (proxy settings).
    #[serde(default)]
    pub http: HttpSettings,
    /// The `editor` section (only `tabSize` is synchronised).
    #[serde(default)]
    pub editor: EditorSettings,
    /// Language-scoped editor overrides for YAML documents.
    #[serde(default, rename = "[yaml]")]
    pub yaml_overrides: BTreeMap<String, Value>,
}

/// The `yaml` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YamlSettings {
    /// Whether the server's formatter is enabled.
    #[serde(default = "default_true")]
    pub format: bool,
    /// Whether schema validation is enabled.
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Whether hover support is enabled.
    #[serde(default = "default_true")]
    pub hover: bool,
    /// Whether completion support is enabled.
    #[serde(default = "default_true")]
    pub completion: bool,
    /// Statically configured schema associations (pattern or URI keyed).
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
    /// Additional custom YAML tags the parser should accept.
    #[serde(default)]
    pub custom_tags: Vec<String>,
    /// JSON Schema Store integration.
    #[serde(default)]
    pub schema_store: SchemaStoreSettings,
}

impl Default for YamlSettings {
    fn default() -> Self {
        Self {
            format: true,
            validate: true,
            hover: true,
            completion: true,
            schemas: BTreeMap::new(),
            custom_tags: Vec::new(),
            schema_store: SchemaStoreSettings::default(),
        }
    }
}

/// The `yaml.schemaStore` subsection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaStoreSettings {
    /// Whether the server should fetch the public schema store catalog.
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Override for the schema store catalog URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for SchemaStoreSettings {
    fn default() -> Self {
        Self {
            enable: true,
            url: None,
        }
    }
}

/// The `http` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Proxy URL used for remote schema fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Whether the proxy certificate must validate.
    #[serde(default = "default_true", rename = "proxyStrictSSL")]
    pub proxy_strict_ssl: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            proxy_strict_ssl: true,
        }
    }
}

/// The `editor` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab size the server uses when formatting.
    #[serde(default = "default_tab_size", rename = "tabSize")]
    pub tab_size: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
        }
    }
}
