//! JSON API over the Fretboard resolver.
//!
//! Exposes an axum [`Router`] backed by any [`Resolver`]. TLS and auth are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fretboard_api::api_router(resolver.clone()))
//! ```

pub mod brands;
pub mod error;
pub mod models;

use axum::{Router, routing::get};
use fretboard_core::{Resolver, executor::QueryExecutor, fallback::FallbackSupplier};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the API router for `resolver`.
///
/// Each request runs its own resolution; a client that disconnects drops
/// the handler future, which stops any further candidate attempts.
pub fn api_router<E, F>(resolver: Resolver<E, F>) -> Router<()>
where
  E: QueryExecutor + 'static,
  F: FallbackSupplier + 'static,
{
  Router::new()
    .route("/brands", get(brands::list::<E, F>))
    .route("/brands/{id}/models", get(brands::models::<E, F>))
    .route("/models/{id}", get(models::get_one::<E, F>))
    .layer(TraceLayer::new_for_http())
    .with_state(resolver)
}

// ─── Integration tests ────────────────────────────────────────────────────────
