//! HTTP transport for the Fretboard resolver.
//!
//! [`HttpExecutor`] posts GraphQL documents to a single endpoint with
//! `reqwest`. It keeps no response cache and asks intermediaries not to serve
//! one either: two candidates can send identical variables with different
//! documents.

mod executor;

pub mod error;

pub use error::{Error, Result};
pub use executor::{HttpConfig, HttpExecutor};
