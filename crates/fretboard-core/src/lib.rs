//! Core types and the resilient resolver for the Fretboard storefront.
//!
//! The backend's GraphQL schema is not known ahead of time. The resolver walks
//! a prioritized [`catalog::Catalog`] of candidate queries, looks for a
//! recognizable entity list in each response ([`shape`]), normalizes whatever
//! it finds ([`normalize`]) and degrades to static sample data
//! ([`fallback`]) when nothing matches.
//!
//! This crate is free of HTTP dependencies; the transport is anything that
//! implements [`executor::QueryExecutor`].

// Native `async fn` in traits; the returned futures carry explicit `Send`
// bounds where it matters.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod entity;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod normalize;
pub mod report;
pub mod resolver;
pub mod session;
pub mod shape;

pub use error::{Error, Result};
pub use resolver::Resolver;
