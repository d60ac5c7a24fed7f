//! The resilient resolver.
//!
//! Per request the resolver moves `Pending → Trying(i) → Matched`, or, once
//! the catalog is exhausted, `Exhausted → Fallback`. Candidates are awaited
//! one at a time in catalog order and each is tried at most once; the
//! sequence of candidates is the retry strategy. A failing candidate never
//! aborts the resolution.
//!
//! Cancellation is cooperative: the token is checked before every attempt
//! and again before a result is returned. An attempt already in flight runs
//! to completion but its result is discarded. Dropping the returned future
//! has the same effect.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument as _, debug, info, info_span, trace, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  catalog::{Catalog, Identifier},
  entity::{Brand, Model, ModelDetails},
  executor::{QueryExecutor, RawOutcome, execute_candidate},
  fallback::{FallbackSupplier, StaticFallback},
  normalize::{Normalize, normalize_all},
  report::{AttemptOutcome, AttemptRecord, ResolutionReport},
  shape::{find_entity, find_entity_list},
};

/// What counts as a match in a response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
  /// A non-empty list of entity-like objects anywhere in the payload.
  List,
  /// A single entity-like object below the payload root.
  Single,
}

impl Shape {
  fn extract<T: Normalize>(self, data: &Value) -> Option<Vec<T>> {
    match self {
      Shape::List => find_entity_list(data).map(normalize_all),
      Shape::Single => find_entity(data).map(|raw| vec![T::normalize(raw, 0)]),
    }
  }
}

/// Resolves catalog entities against a backend of unknown schema.
///
/// Cheap to clone; every field is shared read-only, so one resolver can
/// serve any number of concurrent resolutions.
pub struct Resolver<E, F = StaticFallback> {
  executor: Arc<E>,
  fallback: Arc<F>,
  brands:   Arc<Catalog>,
  models:   Arc<Catalog>,
  details:  Arc<Catalog>,
}

impl<E, F> Clone for Resolver<E, F> {
  fn clone(&self) -> Self {
    Self {
      executor: Arc::clone(&self.executor),
      fallback: Arc::clone(&self.fallback),
      brands:   Arc::clone(&self.brands),
      models:   Arc::clone(&self.models),
      details:  Arc::clone(&self.details),
    }
  }
}

impl<E, F> Resolver<E, F> {
  /// A resolver using the built-in catalogs.
  pub fn new(executor: Arc<E>, fallback: Arc<F>) -> Self {
    Self {
      executor,
      fallback,
      brands: Arc::new(Catalog::all_brands()),
      models: Arc::new(Catalog::models_for_brand()),
      details: Arc::new(Catalog::model_details()),
    }
  }

  pub fn with_brands_catalog(mut self, catalog: Catalog) -> Self {
    self.brands = Arc::new(catalog);
    self
  }

  pub fn with_models_catalog(mut self, catalog: Catalog) -> Self {
    self.models = Arc::new(catalog);
    self
  }

  pub fn with_details_catalog(mut self, catalog: Catalog) -> Self {
    self.details = Arc::new(catalog);
    self
  }

  pub fn models_catalog(&self) -> &Catalog { &self.models }
}

impl<E, F> Resolver<E, F>
where
  E: QueryExecutor,
  F: FallbackSupplier,
{
  /// Resolve all brands.
  pub async fn resolve_all_brands(
    &self,
    cancel: &CancellationToken,
  ) -> Result<ResolutionReport<Brand>> {
    self
      .resolve(&self.brands, None, Shape::List, cancel, || self.fallback.brands())
      .await
  }

  /// Resolve the models of `brand_id`.
  ///
  /// Fails fast with [`Error::EmptyIdentifier`] on a blank identifier.
  pub async fn resolve_models_for_brand(
    &self,
    brand_id: &str,
    cancel: &CancellationToken,
  ) -> Result<ResolutionReport<Model>> {
    let brand_id = require_identifier(brand_id)?;
    self
      .resolve(
        &self.models,
        Some(Identifier::parse(brand_id)),
        Shape::List,
        cancel,
        || self.fallback.models(brand_id),
      )
      .await
  }

  /// Resolve one model's detail record. The report holds at most one entity.
  pub async fn resolve_model_details(
    &self,
    model_id: &str,
    cancel: &CancellationToken,
  ) -> Result<ResolutionReport<ModelDetails>> {
    let model_id = require_identifier(model_id)?;
    self
      .resolve(
        &self.details,
        Some(Identifier::parse(model_id)),
        Shape::Single,
        cancel,
        || self.fallback.model(model_id).into_iter().collect(),
      )
      .await
  }

  async fn resolve<T, S>(
    &self,
    catalog: &Catalog,
    id: Option<Identifier<'_>>,
    shape: Shape,
    cancel: &CancellationToken,
    fallback: S,
  ) -> Result<ResolutionReport<T>>
  where
    T: Normalize,
    S: FnOnce() -> Vec<Value>,
  {
    let request_id = Uuid::new_v4();
    let span = info_span!(
      "resolve",
      %request_id,
      identifier = id.map_or("", |i| i.raw),
    );

    async move {
      let mut attempts = Vec::new();

      for candidate in catalog.iter() {
        if !candidate.variables.applies_to(id) {
          trace!(candidate = %candidate.name, "skipped: identifier is not numeric");
          continue;
        }
        if cancel.is_cancelled() {
          debug!(tried = attempts.len(), "cancelled before next attempt");
          return Err(Error::Cancelled);
        }

        debug!(candidate = %candidate.name, "trying candidate");
        let outcome = match execute_candidate(&*self.executor, candidate, id).await {
          RawOutcome::TransportFailure(message) => {
            debug!(candidate = %candidate.name, %message, "transport failure");
            AttemptOutcome::TransportFailure { message }
          }
          RawOutcome::Response { data, errors } => {
            match data.as_ref().and_then(|d| shape.extract::<T>(d)) {
              Some(entities) => {
                if cancel.is_cancelled() {
                  debug!("cancelled; discarding matched result");
                  return Err(Error::Cancelled);
                }
                if !errors.is_empty() {
                  debug!(?errors, "matched despite partial errors");
                }
                info!(candidate = %candidate.name, count = entities.len(), "matched");
                attempts.push(AttemptRecord {
                  candidate: candidate.name.clone(),
                  outcome:   AttemptOutcome::Matched { count: entities.len() },
                });
                return Ok(ResolutionReport {
                  request_id,
                  resolved_at: Utc::now(),
                  entities,
                  attempts,
                  used_fallback: false,
                  matched_candidate: Some(candidate.name.clone()),
                });
              }
              None if errors.is_empty() => AttemptOutcome::UnmatchedNoList,
              None => AttemptOutcome::GraphErrors { messages: errors },
            }
          }
        };
        attempts.push(AttemptRecord { candidate: candidate.name.clone(), outcome });
      }

      if cancel.is_cancelled() {
        return Err(Error::Cancelled);
      }

      let raw = fallback();
      warn!(
        attempts = attempts.len(),
        fallback_entities = raw.len(),
        "all candidates exhausted; serving fallback data"
      );
      Ok(ResolutionReport {
        request_id,
        resolved_at: Utc::now(),
        entities: normalize_all(&raw),
        attempts,
        used_fallback: true,
        matched_candidate: None,
      })
    }
    .instrument(span)
    .await
  }
}

fn require_identifier(id: &str) -> Result<&str> {
  let id = id.trim();
  if id.is_empty() {
    return Err(Error::EmptyIdentifier);
  }
  Ok(id)
}
