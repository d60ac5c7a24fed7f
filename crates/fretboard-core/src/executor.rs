//! The query-execution seam and the per-candidate adapter.
//!
//! [`QueryExecutor`] is implemented by transports (e.g. `fretboard-graphql`).
//! The resolver only ever talks to it through [`execute_candidate`], which
//! turns every transport failure into a value instead of an error.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{CandidateQuery, Identifier};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// A GraphQL request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
  pub query:     String,
  pub variables: Map<String, Value>,
}

/// One entry of a response's `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
  pub message: String,
}

/// A GraphQL response body. Both fields may be present at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
  #[serde(default)]
  pub data:   Option<Value>,
  #[serde(default)]
  pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
  pub fn with_data(data: Value) -> Self {
    Self { data: Some(data), errors: None }
  }

  pub fn with_errors<I, S>(messages: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let errors = messages
      .into_iter()
      .map(|m| GraphQlError { message: m.into() })
      .collect();
    Self { data: None, errors: Some(errors) }
  }

  pub fn has_errors(&self) -> bool {
    self.errors.as_ref().is_some_and(|e| !e.is_empty())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the GraphQL transport.
///
/// `Err` is reserved for transport-level failures (connection refused,
/// timeouts, non-GraphQL error statuses). Protocol errors such as "unknown
/// field" belong in [`GraphQlResponse::errors`].
///
/// Implementations must not serve cached responses: different candidates
/// share variables but not documents.
pub trait QueryExecutor: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn execute(
    &self,
    request: GraphQlRequest,
  ) -> impl Future<Output = Result<GraphQlResponse, Self::Error>> + Send + '_;
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

/// Normalized result of running one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
  /// The backend answered; `data` may be absent and `errors` may be empty.
  Response {
    data:   Option<Value>,
    errors: Vec<String>,
  },
  TransportFailure(String),
}

/// Run `candidate` once against `executor`. Never retries, never fails.
pub async fn execute_candidate<E>(
  executor: &E,
  candidate: &CandidateQuery,
  id: Option<Identifier<'_>>,
) -> RawOutcome
where
  E: QueryExecutor,
{
  let request = GraphQlRequest {
    query:     candidate.document.clone(),
    variables: candidate.variables.bind(id),
  };
  match executor.execute(request).await {
    Ok(response) => RawOutcome::Response {
      errors: response
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.message)
        .collect(),
      data:   response.data.filter(|d| !d.is_null()),
    },
    Err(e) => RawOutcome::TransportFailure(e.to_string()),
  }
}
