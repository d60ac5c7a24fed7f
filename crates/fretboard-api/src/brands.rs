//! Handlers for `/brands` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/brands` | All brands |
//! | `GET`  | `/brands/{id}/models` | 400 on a blank id |
//!
//! Both answer with a full resolution report, so a front-end can show the
//! attempt log next to a "no results" state.

use axum::{
  Json,
  extract::{Path, State},
};
use fretboard_core::{
  Resolver,
  entity::{Brand, Model},
  executor::QueryExecutor,
  fallback::FallbackSupplier,
  report::ResolutionReport,
};
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// `GET /brands`
pub async fn list<E, F>(
  State(resolver): State<Resolver<E, F>>,
) -> Result<Json<ResolutionReport<Brand>>, ApiError>
where
  E: QueryExecutor,
  F: FallbackSupplier,
{
  let report = resolver.resolve_all_brands(&CancellationToken::new()).await?;
  Ok(Json(report))
}

/// `GET /brands/{id}/models`
pub async fn models<E, F>(
  State(resolver): State<Resolver<E, F>>,
  Path(brand_id): Path<String>,
) -> Result<Json<ResolutionReport<Model>>, ApiError>
where
  E: QueryExecutor,
  F: FallbackSupplier,
{
  let report = resolver
    .resolve_models_for_brand(&brand_id, &CancellationToken::new())
    .await?;
  Ok(Json(report))
}
