//! Error types for `fretboard-core`.
//!
//! Per-candidate failures are never errors; they are recorded in the
//! [`ResolutionReport`](crate::report::ResolutionReport) attempt log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("identifier must not be empty")]
  EmptyIdentifier,

  #[error("resolution was superseded or cancelled")]
  Cancelled,

  #[error("duplicate candidate name in catalog: {0}")]
  DuplicateCandidate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
