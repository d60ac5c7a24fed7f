//! Error type for `fretboard-graphql`.
//!
//! Every variant is a transport failure from the resolver's point of view.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http client error: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("endpoint answered {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("response is not a GraphQL document: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
