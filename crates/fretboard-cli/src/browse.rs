//! Interactive browsing: every brand id typed on stdin supersedes the one
//! before it. Only the newest request's models are ever printed.

use std::sync::Arc;

use fretboard_core::{
  Error,
  Resolver,
  entity::Model,
  executor::QueryExecutor,
  fallback::FallbackSupplier,
  session::Latest,
};
use tokio::{
  io::{AsyncBufReadExt, BufReader},
  task::JoinSet,
};

use crate::output;

pub async fn run<E, F>(resolver: Resolver<E, F>, json: bool, diagnostics: bool) -> anyhow::Result<()>
where
  E: QueryExecutor + 'static,
  F: FallbackSupplier + 'static,
{
  let slot = Arc::new(Latest::<Model>::new());
  let mut rx = slot.subscribe();

  let printer = tokio::spawn(async move {
    while rx.changed().await.is_ok() {
      let (identifier, report) = {
        let snapshot = rx.borrow_and_update();
        (snapshot.identifier().map(str::to_owned), snapshot.report().cloned())
      };
      match (identifier, report) {
        (Some(id), None) => eprintln!("resolving brand {id}..."),
        (Some(id), Some(report)) => {
          println!("── brand {id} ──");
          if let Err(e) = output::print_report(&*report, json, diagnostics) {
            tracing::warn!(error = %e, "failed to print report");
          }
        }
        _ => {}
      }
    }
  });

  eprintln!("Enter a brand id per line (q to quit).");
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut tasks = JoinSet::new();

  while let Some(line) = lines.next_line().await? {
    let id = line.trim();
    if id.is_empty() {
      continue;
    }
    if id == "q" || id == "quit" {
      break;
    }

    let ticket = slot.begin(id);
    let slot = Arc::clone(&slot);
    let resolver = resolver.clone();
    tasks.spawn(async move {
      match resolver.resolve_models_for_brand(ticket.identifier(), ticket.token()).await {
        Ok(report) => {
          if !slot.commit(&ticket, report) {
            tracing::debug!(generation = ticket.generation(), "discarded stale report");
          }
        }
        Err(Error::Cancelled) => {
          tracing::debug!(generation = ticket.generation(), "resolution superseded");
        }
        Err(e) => tracing::warn!(error = %e, "resolution failed"),
      }
    });
  }

  // Nobody is waiting for the newest request any more.
  slot.cancel();
  while tasks.join_next().await.is_some() {}

  // Dropping the last sender ends the printer loop.
  drop(slot);
  printer.await?;
  Ok(())
}
