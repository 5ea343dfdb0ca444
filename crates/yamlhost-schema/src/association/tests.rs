//! Unit tests for the association wire shapes.

use std::collections::BTreeMap;

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
fn association_serialises_with_camel_case_keys() {
    let association = SchemaAssociation::new(
        vec!["/deploy.yaml".into()],
        "https://example.com/schema.json",
    );

    let value = serde_json::to_value(&association).expect("serialisation failed");

    assert_eq!(
        value,
        json!({
            "fileMatch": ["/deploy.yaml"],
            "uri": "https://example.com/schema.json",
        })
    );
}

#[rstest]
fn sequence_payload_serialises_as_array() {
    let payload = SchemaAssociations::from(vec![SchemaAssociation::new(
        vec!["/a.yaml".into()],
        "file:///schemas/a.json",
    )]);

    let value = serde_json::to_value(&payload).expect("serialisation failed");

    assert_eq!(
        value,
        json!([{"fileMatch": ["/a.yaml"], "uri": "file:///schemas/a.json"}])
    );
}

#[rstest]
fn mapping_payload_round_trips() {
    let mut map = BTreeMap::new();
    map.insert(
        "*.deploy.yaml".to_owned(),
        vec!["https://example.com/s.json".to_owned()],
    );
    let payload = SchemaAssociations::Mapping(map);

    let encoded = serde_json::to_string(&payload).expect("serialisation failed");
    let decoded: SchemaAssociations = serde_json::from_str(&encoded).expect("parse failed");

    assert_eq!(decoded, payload);
}

#[rstest]
fn mapping_shape_decodes_from_object() {
    let decoded: SchemaAssociations =
        serde_json::from_value(json!({"*.yml": ["file:///s.json"]})).expect("parse failed");

    assert!(matches!(decoded, SchemaAssociations::Mapping(_)));
    assert_eq!(decoded.len(), 1);
}

#[rstest]
fn empty_sequence_reports_empty() {
    let payload = SchemaAssociations::from(Vec::new());

    assert!(payload.is_empty());
    assert_eq!(payload.len(), 0);
}
