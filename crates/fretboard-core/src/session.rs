//! "Latest request wins" bookkeeping for interactive callers.
//!
//! When the identifier being browsed changes mid-resolution, the older
//! resolution must stop issuing attempts and its eventual result must not
//! overwrite the newer one. [`Latest`] hands out a [`Ticket`] per request,
//! cancels the previous ticket's token, and accepts a commit only from the
//! newest ticket. Observers follow the slot through a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::report::ResolutionReport;

/// Observable state of a [`Latest`] slot.
#[derive(Debug)]
pub struct Snapshot<T> {
  generation: u64,
  identifier: Option<String>,
  report:     Option<Arc<ResolutionReport<T>>>,
  token:      CancellationToken,
}

impl<T> Snapshot<T> {
  pub fn generation(&self) -> u64 { self.generation }

  /// Identifier of the newest request, if any was started.
  pub fn identifier(&self) -> Option<&str> { self.identifier.as_deref() }

  /// Report of the newest request, once committed.
  pub fn report(&self) -> Option<&Arc<ResolutionReport<T>>> { self.report.as_ref() }

  /// A request has started but has not committed yet.
  pub fn is_pending(&self) -> bool { self.identifier.is_some() && self.report.is_none() }
}

/// Handle for one request issued by [`Latest::begin`].
#[derive(Debug, Clone)]
pub struct Ticket {
  generation: u64,
  identifier: String,
  token:      CancellationToken,
}

impl Ticket {
  pub fn generation(&self) -> u64 { self.generation }

  pub fn identifier(&self) -> &str { &self.identifier }

  /// Token to pass to the resolver; cancelled once a newer ticket exists.
  pub fn token(&self) -> &CancellationToken { &self.token }
}

/// A slot holding the report of the most recent request only.
#[derive(Debug)]
pub struct Latest<T> {
  tx: watch::Sender<Snapshot<T>>,
}

impl<T> Default for Latest<T> {
  fn default() -> Self { Self::new() }
}

impl<T> Latest<T> {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(Snapshot {
      generation: 0,
      identifier: None,
      report:     None,
      token:      CancellationToken::new(),
    });
    Self { tx }
  }

  pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> { self.tx.subscribe() }

  /// Start a request for `identifier`, superseding any request in flight.
  pub fn begin(&self, identifier: impl Into<String>) -> Ticket {
    let identifier = identifier.into();
    let token = CancellationToken::new();
    let mut generation = 0;
    self.tx.send_modify(|s| {
      s.token.cancel();
      s.generation += 1;
      s.identifier = Some(identifier.clone());
      s.report = None;
      s.token = token.clone();
      generation = s.generation;
    });
    Ticket { generation, identifier, token }
  }

  /// Publish `report` if `ticket` is still the newest request.
  ///
  /// Returns `false`, leaving the slot untouched, for a superseded or
  /// cancelled ticket.
  pub fn commit(&self, ticket: &Ticket, report: ResolutionReport<T>) -> bool {
    self.tx.send_if_modified(|s| {
      if s.generation != ticket.generation || ticket.token.is_cancelled() {
        return false;
      }
      s.report = Some(Arc::new(report));
      true
    })
  }

  /// Cancel the request in flight, if any, without starting a new one.
  pub fn cancel(&self) {
    self.tx.borrow().token.cancel();
  }

  /// The committed report of the newest request, if there is one.
  pub fn current(&self) -> Option<Arc<ResolutionReport<T>>> {
    self.tx.borrow().report.clone()
  }
}
