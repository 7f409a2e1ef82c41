//! The per-session reservation ledger.
//!
//! One sold-seat set per session, each behind its own async mutex. Commits
//! for the same session are linearised by that mutex; commits for different
//! sessions proceed concurrently — there is no global lock. Each set is
//! hydrated lazily from the tickets table, at most once, inside its own
//! critical section, so a restarted process rediscovers every sold seat
//! before admitting its first sale.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use marquee_core::{
  seat::SeatId,
  store::{CinemaStore, TicketInsert},
  ticket::Ticket,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{Error, Result};

/// The sold-seat set of one session; `None` until first hydrated.
type SeatSet = Arc<Mutex<Option<HashSet<SeatId>>>>;

/// Outcome of [`SeatLedger::try_commit`].
#[derive(Debug)]
pub enum CommitOutcome {
  /// Every requested seat was free. The batch is durably persisted and the
  /// tickets come back in request order.
  Committed(Vec<Ticket>),
  /// At least one requested seat is already sold; nothing changed.
  Rejected {
    /// The overlap, sorted row-major and deduplicated.
    conflicting: Vec<SeatId>,
  },
}

#[derive(Default)]
pub struct SeatLedger {
  /// Held only to find or insert a session's cell — never across an await.
  sessions: Mutex<HashMap<Uuid, SeatSet>>,
}

impl SeatLedger {
  pub fn new() -> Self {
    Self::default()
  }

  async fn session_cell(&self, session_id: Uuid) -> SeatSet {
    self.sessions.lock().await.entry(session_id).or_default().clone()
  }

  /// Fill the set from the tickets table if this is its first touch.
  async fn hydrate<'a, S: CinemaStore>(
    seats: &'a mut Option<HashSet<SeatId>>,
    store: &S,
    session_id: Uuid,
  ) -> Result<&'a mut HashSet<SeatId>> {
    if seats.is_none() {
      let tickets = store
        .list_tickets(session_id)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      *seats = Some(tickets.into_iter().map(|t| t.seat).collect());
    }
    Ok(seats.get_or_insert_with(HashSet::new))
  }

  /// Snapshot of the session's sold seats, in row-major order.
  pub async fn occupied_seats<S: CinemaStore>(
    &self,
    store: &S,
    session_id: Uuid,
  ) -> Result<Vec<SeatId>> {
    let cell = self.session_cell(session_id).await;
    let mut guard = cell.lock().await;
    let sold = Self::hydrate(&mut guard, store, session_id).await?;

    let mut snapshot: Vec<SeatId> = sold.iter().copied().collect();
    snapshot.sort();
    Ok(snapshot)
  }

  /// Commit a sale atomically: if any ticket's seat is already sold the
  /// whole batch is rejected, otherwise the batch is persisted and the
  /// seats join the set — all inside the session's critical section.
  pub async fn try_commit<S: CinemaStore>(
    &self,
    store: &S,
    session_id: Uuid,
    tickets: Vec<Ticket>,
  ) -> Result<CommitOutcome> {
    let cell = self.session_cell(session_id).await;
    let mut guard = cell.lock().await;
    let sold = Self::hydrate(&mut guard, store, session_id).await?;

    let mut conflicting: Vec<SeatId> = tickets
      .iter()
      .map(|t| t.seat)
      .filter(|seat| sold.contains(seat))
      .collect();
    if !conflicting.is_empty() {
      conflicting.sort();
      conflicting.dedup();
      return Ok(CommitOutcome::Rejected { conflicting });
    }

    // Persistence happens inside the critical section: no success without
    // durable confirmation, and a failure leaves the set untouched.
    match store.insert_tickets(&tickets).await {
      Ok(TicketInsert::Inserted) => {
        sold.extend(tickets.iter().map(|t| t.seat));
        Ok(CommitOutcome::Committed(tickets))
      }
      // The in-memory check passed, so storage knows a ticket this ledger
      // does not: another writer got behind this process.
      Ok(TicketInsert::SeatTaken { seat }) => Err(Error::StorageDisagrees { seat }),
      Err(e) => Err(Error::CommitFailed(Box::new(e))),
    }
  }
}
