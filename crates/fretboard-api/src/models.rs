//! Handler for `GET /models/{id}`: one model's detail record, 404 when no
//! source knows it.

use axum::{
  Json,
  extract::{Path, State},
};
use fretboard_core::{
  Resolver,
  entity::ModelDetails,
  executor::QueryExecutor,
  fallback::FallbackSupplier,
  report::ResolutionReport,
};
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// `GET /models/{id}`
pub async fn get_one<E, F>(
  State(resolver): State<Resolver<E, F>>,
  Path(model_id): Path<String>,
) -> Result<Json<ResolutionReport<ModelDetails>>, ApiError>
where
  E: QueryExecutor,
  F: FallbackSupplier,
{
  let report = resolver
    .resolve_model_details(&model_id, &CancellationToken::new())
    .await?;
  if report.is_empty() {
    return Err(ApiError::NotFound(format!("model {model_id}")));
  }
  Ok(Json(report))
}
