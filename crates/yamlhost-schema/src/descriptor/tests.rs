//! Unit tests for extension descriptor snapshots.

use std::path::Path;

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

fn descriptor(manifest: Option<Value>) -> ExtensionDescriptor {
    ExtensionDescriptor::new("/ext/sample", manifest)
}

#[rstest]
fn exposes_extension_path() {
    let ext = descriptor(None);

    assert_eq!(ext.extension_path(), Path::new("/ext/sample"));
}

#[rstest]
fn yaml_validation_returns_declared_entries() {
    let ext = descriptor(Some(json!({
        "contributes": {
            "yamlValidation": [
                {"fileMatch": "a.yaml", "url": "https://example.com/a.json"},
            ],
        },
    })));

    let entries = ext.yaml_validation().expect("entries missing");
    assert_eq!(entries.len(), 1);
}

#[rstest]
#[case::no_manifest(None)]
#[case::manifest_not_object(Some(json!("not an object")))]
#[case::no_contributes(Some(json!({"name": "ext"})))]
#[case::contributes_not_object(Some(json!({"contributes": 7})))]
#[case::no_yaml_validation(Some(json!({"contributes": {"jsonValidation": []}})))]
#[case::yaml_validation_not_array(Some(json!({"contributes": {"yamlValidation": {"fileMatch": "a"}}})))]
fn yaml_validation_absent_for_malformed_manifests(#[case] manifest: Option<Value>) {
    let ext = descriptor(manifest);

    assert!(ext.yaml_validation().is_none());
}

#[rstest]
fn yaml_validation_preserves_entry_order() {
    let ext = descriptor(Some(json!({
        "contributes": {
            "yamlValidation": [
                {"url": "first"},
                {"url": "second"},
            ],
        },
    })));

    let entries = ext.yaml_validation().expect("entries missing");
    assert_eq!(entries[0]["url"], "first");
    assert_eq!(entries[1]["url"], "second");
}
