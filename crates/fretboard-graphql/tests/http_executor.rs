//! `HttpExecutor` against a mock GraphQL endpoint.

use std::sync::Arc;

use fretboard_core::{
  Resolver,
  executor::{GraphQlRequest, QueryExecutor},
  fallback::StaticFallback,
  report::AttemptOutcome,
};
use fretboard_graphql::{Error, HttpConfig, HttpExecutor};
use serde_json::{Map, json};
use tokio_util::sync::CancellationToken;
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_partial_json, body_string_contains, header, method, path},
};

fn executor(server: &MockServer) -> HttpExecutor {
  HttpExecutor::new(HttpConfig::new(format!("{}/graphql", server.uri())))
    .expect("http executor")
}

fn request(query: &str, variables: serde_json::Value) -> GraphQlRequest {
  let variables = match variables {
    serde_json::Value::Object(map) => map,
    _ => Map::new(),
  };
  GraphQlRequest { query: query.to_string(), variables }
}

#[tokio::test]
async fn posts_query_and_variables_without_caching() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .and(header("cache-control", "no-cache"))
    .and(body_partial_json(json!({ "variables": { "id": "1" } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": { "findBrandModels": [{ "id": "101", "name": "Stratocaster" }] }
    })))
    .expect(2)
    .mount(&server)
    .await;

  let exec = executor(&server);
  assert_eq!(exec.endpoint(), format!("{}/graphql", server.uri()));
  let req = request("query ($id: ID!) { findBrandModels(id: $id) { id name } }", json!({ "id": "1" }));
  let first = exec.execute(req.clone()).await.unwrap();
  let second = exec.execute(req).await.unwrap();

  assert_eq!(first, second);
  assert_eq!(first.data.unwrap()["findBrandModels"][0]["name"], "Stratocaster");
  assert!(!second.has_errors());
}

#[tokio::test]
async fn errors_alongside_data_are_returned() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": null,
      "errors": [{ "message": "Cannot query field \"findBrandModels\" on type \"Query\"." }]
    })))
    .mount(&server)
    .await;

  let resp = executor(&server).execute(request("{ findBrandModels { id } }", json!({}))).await.unwrap();
  assert!(resp.data.is_none());
  assert!(resp.has_errors());
}

#[tokio::test]
async fn validation_failure_status_is_a_protocol_answer() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({
      "errors": [{ "message": "Unknown argument \"brandId\"" }]
    })))
    .mount(&server)
    .await;

  let resp = executor(&server).execute(request("{ x }", json!({}))).await.unwrap();
  assert_eq!(resp.errors.unwrap()[0].message, "Unknown argument \"brandId\"");
}

#[tokio::test]
async fn server_error_without_graphql_body_is_a_transport_failure() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
    .mount(&server)
    .await;

  let err = executor(&server).execute(request("{ x }", json!({}))).await.unwrap_err();
  match err {
    Error::Status { status, body } => {
      assert_eq!(status.as_u16(), 502);
      assert_eq!(body, "bad gateway");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn non_json_success_is_a_decode_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>welcome</html>"))
    .mount(&server)
    .await;

  let err = executor(&server).execute(request("{ x }", json!({}))).await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
  // Bind an ephemeral port, then release it so nothing is listening there.
  let port = {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
  };
  let exec = HttpExecutor::new(HttpConfig::new(format!("http://127.0.0.1:{port}/graphql"))).unwrap();
  let err = exec.execute(request("{ x }", json!({}))).await.unwrap_err();
  assert!(matches!(err, Error::Request(_)));
}

#[tokio::test]
async fn resolver_discovers_the_int_argument_over_http() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .and(body_string_contains("modelsByBrand(brandId: $brandId)"))
    .and(body_partial_json(json!({ "variables": { "brandId": 7 } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": { "modelsByBrand": [
        { "id": 701, "name": "Jaguar", "price": "€1,349", "type": "Electric" }
      ] }
    })))
    .expect(1)
    .mount(&server)
    .await;

  let resolver = Resolver::new(Arc::new(executor(&server)), Arc::new(StaticFallback::sample()));
  let report = resolver
    .resolve_models_for_brand("7", &CancellationToken::new())
    .await
    .unwrap();

  assert!(!report.used_fallback);
  assert_eq!(report.matched_candidate.as_deref(), Some("modelsByBrand(brandId: Int!)"));
  assert_eq!(report.entities[0].id, "701");
  assert_eq!(report.entities[0].price, Some(1349.0));
  // Unmatched requests get wiremock's bare 404.
  assert!(report.failures().all(|a| matches!(
    &a.outcome,
    AttemptOutcome::TransportFailure { message } if message.contains("404")
  )));
}
