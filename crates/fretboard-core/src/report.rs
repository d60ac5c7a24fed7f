//! Resolution reports and the per-candidate attempt log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened when one candidate was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
  /// A non-empty entity list was found; resolution stopped here.
  Matched { count: usize },
  /// The response carried no recognizable entity list.
  UnmatchedNoList,
  /// The backend reported errors (e.g. unknown field or argument).
  GraphErrors { messages: Vec<String> },
  /// The request never produced a GraphQL response.
  TransportFailure { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
  pub candidate: String,
  #[serde(flatten)]
  pub outcome:   AttemptOutcome,
}

impl fmt::Display for AttemptRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.outcome {
      AttemptOutcome::Matched { count } => {
        write!(f, "{}: matched {count} entities", self.candidate)
      }
      AttemptOutcome::UnmatchedNoList => {
        write!(f, "{}: no entity list in response", self.candidate)
      }
      AttemptOutcome::GraphErrors { messages } => {
        write!(f, "{}: {}", self.candidate, messages.join("; "))
      }
      AttemptOutcome::TransportFailure { message } => {
        write!(f, "{}: transport failure: {message}", self.candidate)
      }
    }
  }
}

/// Result of one resolution request. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport<T> {
  /// Per-request identifier, also recorded on the tracing span.
  pub request_id:        Uuid,
  pub resolved_at:       DateTime<Utc>,
  /// Normalized entities; empty when neither the backend nor the fallback
  /// table had anything.
  pub entities:          Vec<T>,
  /// Every candidate tried, in order.
  pub attempts:          Vec<AttemptRecord>,
  pub used_fallback:     bool,
  pub matched_candidate: Option<String>,
}

impl<T> ResolutionReport<T> {
  /// No entities from any source: callers should show a neutral "no
  /// results" state, not an error.
  pub fn is_empty(&self) -> bool { self.entities.is_empty() }

  /// Attempts that did not match, for diagnostics.
  pub fn failures(&self) -> impl Iterator<Item = &AttemptRecord> {
    self
      .attempts
      .iter()
      .filter(|a| !matches!(a.outcome, AttemptOutcome::Matched { .. }))
  }
}
