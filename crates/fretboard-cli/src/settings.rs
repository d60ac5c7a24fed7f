//! Layered configuration: defaults, then the TOML file, then `FRETBOARD_*`
//! environment variables, then command-line overrides.

use std::path::Path;

use anyhow::Context as _;
use fretboard_core::catalog::SortPlacement;
use fretboard_graphql::HttpConfig;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";

/// Runtime configuration, deserialised from `fretboard.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// GraphQL endpoint of the storefront backend.
  pub endpoint:       String,
  pub timeout_secs:   u64,
  /// Whether sorted query variants are tried before or after unsorted ones.
  pub sort_placement: SortPlacement,
  /// Serve built-in sample data when the backend matches no candidate.
  pub fallback:       bool,
  pub host:           String,
  pub port:           u16,
}

impl Settings {
  pub fn load(path: &Path, endpoint: Option<String>) -> anyhow::Result<Self> {
    config::Config::builder()
      .set_default("endpoint", DEFAULT_ENDPOINT)?
      .set_default("timeout_secs", 30)?
      .set_default("sort_placement", "after_unsorted")?
      .set_default("fallback", true)?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FRETBOARD"))
      .set_override_option("endpoint", endpoint)?
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn http(&self) -> HttpConfig {
    HttpConfig { endpoint: self.endpoint.clone(), timeout_secs: self.timeout_secs }
  }
}
