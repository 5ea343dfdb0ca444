//! Unit tests for the schema contributor registry.

use rstest::rstest;

use super::*;

struct StubContributor {
    schema: Option<&'static str>,
    content: Option<&'static str>,
}

impl SchemaContributor for StubContributor {
    fn schema_for_resource(&self, _resource: &str) -> Option<String> {
        self.schema.map(str::to_owned)
    }

    fn schema_content(&self, _uri: &str) -> Option<String> {
        self.content.map(str::to_owned)
    }
}

fn answering(schema: &'static str) -> Box<StubContributor> {
    Box::new(StubContributor {
        schema: Some(schema),
        content: None,
    })
}

fn silent() -> Box<StubContributor> {
    Box::new(StubContributor {
        schema: None,
        content: None,
    })
}

#[rstest]
fn duplicate_scheme_is_rejected() {
    let mut registry = SchemaContributorRegistry::new();
    registry.register("k8s", silent()).expect("first registration");

    let result = registry.register("k8s", silent());

    assert!(matches!(
        result,
        Err(ApiError::DuplicateContributor { scheme }) if scheme == "k8s"
    ));
}

#[rstest]
fn lookup_consults_contributors_in_registration_order() {
    let mut registry = SchemaContributorRegistry::new();
    registry.register("first", silent()).expect("registration");
    registry
        .register("second", answering("second:/schema.json"))
        .expect("registration");
    registry
        .register("third", answering("third:/schema.json"))
        .expect("registration");

    let schema = registry.schema_for_resource("file:///deploy.yaml");

    assert_eq!(schema.as_deref(), Some("second:/schema.json"));
}

#[rstest]
fn lookup_without_answer_returns_none() {
    let mut registry = SchemaContributorRegistry::new();
    registry.register("quiet", silent()).expect("registration");

    assert!(registry.schema_for_resource("file:///a.yaml").is_none());
}

#[rstest]
fn content_routes_by_uri_scheme() {
    let mut registry = SchemaContributorRegistry::new();
    registry
        .register(
            "k8s",
            Box::new(StubContributor {
                schema: None,
                content: Some("{\"type\": \"object\"}"),
            }),
        )
        .expect("registration");

    assert_eq!(
        registry.schema_content("k8s:/deployment.json").as_deref(),
        Some("{\"type\": \"object\"}")
    );
    assert!(registry.schema_content("other:/deployment.json").is_none());
}

#[rstest]
fn empty_registry_reports_empty() {
    let registry = SchemaContributorRegistry::new();

    assert!(registry.is_empty());
}
