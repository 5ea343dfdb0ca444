//! Unit tests for server request dispatch.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::api::SchemaContributor;

struct FixedContributor;

impl SchemaContributor for FixedContributor {
    fn schema_for_resource(&self, resource: &str) -> Option<String> {
        resource
            .ends_with("deploy.yaml")
            .then(|| "k8s:/deployment.json".to_owned())
    }

    fn schema_content(&self, uri: &str) -> Option<String> {
        (uri == "k8s:/deployment.json").then(|| "{\"type\":\"object\"}".to_owned())
    }
}

struct StubFetcher {
    body: Result<&'static str, u16>,
}

impl ContentFetcher for StubFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        match self.body {
            Ok(body) => Ok(body.to_owned()),
            Err(status) => Err(FetchError::Status {
                uri: uri.to_owned(),
                status,
            }),
        }
    }
}

fn handlers_with_fetcher(body: Result<&'static str, u16>) -> ActivationHandlers {
    let mut registry = SchemaContributorRegistry::new();
    registry
        .register("k8s", Box::new(FixedContributor))
        .expect("registration failed");
    ActivationHandlers::new(registry, Box::new(StubFetcher { body }))
}

fn handlers() -> ActivationHandlers {
    handlers_with_fetcher(Ok("schema body"))
}

#[rstest]
fn custom_schema_request_answers_from_registry() {
    let result = handlers()
        .handle(CUSTOM_SCHEMA_REQUEST, Some(&json!("file:///deploy.yaml")))
        .expect("handler failed");

    assert_eq!(result, json!("k8s:/deployment.json"));
}

#[rstest]
fn custom_schema_request_without_contribution_returns_null() {
    let result = handlers()
        .handle(CUSTOM_SCHEMA_REQUEST, Some(&json!("file:///other.yaml")))
        .expect("handler failed");

    assert_eq!(result, Value::Null);
}

#[rstest]
fn custom_content_request_answers_from_registry() {
    let result = handlers()
        .handle(CUSTOM_CONTENT_REQUEST, Some(&json!("k8s:/deployment.json")))
        .expect("handler failed");

    assert_eq!(result, json!("{\"type\":\"object\"}"));
}

#[rstest]
fn editor_content_request_uses_the_fetcher() {
    let result = handlers()
        .handle(
            EDITOR_CONTENT_REQUEST,
            Some(&json!("https://example.com/s.json")),
        )
        .expect("handler failed");

    assert_eq!(result, json!("schema body"));
}

#[rstest]
fn failed_fetch_surfaces_as_internal_error() {
    let error = handlers_with_fetcher(Err(404))
        .handle(
            EDITOR_CONTENT_REQUEST,
            Some(&json!("https://example.com/s.json")),
        )
        .expect_err("expected failure");

    assert_eq!(error.code(), -32603);
}

#[rstest]
#[case::missing(None)]
#[case::not_a_string(Some(json!({"resource": "file:///a.yaml"})))]
fn malformed_params_are_invalid(#[case] params: Option<Value>) {
    let error = handlers()
        .handle(CUSTOM_SCHEMA_REQUEST, params.as_ref())
        .expect_err("expected failure");

    assert_eq!(error.code(), -32602);
}

#[rstest]
fn unknown_method_is_method_not_found() {
    let error = handlers()
        .handle("workspace/undefined", None)
        .expect_err("expected failure");

    assert_eq!(error.code(), -32601);
}

#[rstest]
fn reply_echoes_the_request_id() {
    let request = JsonRpcServerRequest {
        id: json!("req-9"),
        method: CUSTOM_SCHEMA_REQUEST.to_owned(),
        params: Some(json!("file:///deploy.yaml")),
    };

    let reply = handlers().reply_to(&request);

    assert_eq!(reply.id, json!("req-9"));
    assert_eq!(reply.result, Some(json!("k8s:/deployment.json")));
    assert!(reply.error.is_none());
}

#[rstest]
fn reply_carries_error_for_unknown_method() {
    let request = JsonRpcServerRequest {
        id: json!(3),
        method: "bogus/method".to_owned(),
        params: None,
    };

    let reply = handlers().reply_to(&request);

    let error = reply.error.expect("error missing");
    assert_eq!(error.code, -32601);
    assert!(reply.result.is_none());
}
