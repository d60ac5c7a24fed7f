//! `reqwest` implementation of [`QueryExecutor`].

use std::{future::Future, time::Duration};

use fretboard_core::executor::{GraphQlRequest, GraphQlResponse, QueryExecutor};
use reqwest::{
  Client,
  header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA},
};
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Longest error body kept in [`Error::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for a GraphQL endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
  pub endpoint:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 30 }

impl HttpConfig {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self { endpoint: endpoint.into(), timeout_secs: default_timeout_secs() }
  }
}

/// Posts GraphQL requests to one endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
  client:   Client,
  endpoint: String,
}

impl HttpExecutor {
  pub fn new(config: HttpConfig) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .default_headers(headers)
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, endpoint: config.endpoint })
  }

  pub fn endpoint(&self) -> &str { &self.endpoint }

  async fn post(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
    let resp = self.client.post(&self.endpoint).json(&request).send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;

    let parsed = serde_json::from_slice::<GraphQlResponse>(&bytes);
    if status.is_success() {
      let body = parsed?;
      debug!(%status, errors = body.has_errors(), "graphql response");
      return Ok(body);
    }

    // Many servers reject unknown fields with a 400 that still carries a
    // GraphQL `errors` list; that is a protocol answer, not a transport one.
    match parsed {
      Ok(body) if body.has_errors() => {
        debug!(%status, "graphql errors on non-success status");
        Ok(body)
      }
      _ => Err(Error::Status {
        status,
        body: truncate(&String::from_utf8_lossy(&bytes)),
      }),
    }
  }
}

impl QueryExecutor for HttpExecutor {
  type Error = Error;

  fn execute(
    &self,
    request: GraphQlRequest,
  ) -> impl Future<Output = Result<GraphQlResponse>> + Send + '_ {
    self.post(request)
  }
}

fn truncate(body: &str) -> String {
  match body.char_indices().nth(MAX_ERROR_BODY) {
    Some((cut, _)) => format!("{}…", &body[..cut]),
    None => body.to_string(),
  }
}
