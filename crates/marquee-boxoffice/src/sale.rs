//! [`BoxOffice`] — the sale coordinator.
//!
//! Validates a sale request end to end, prices it, and commits it through
//! the reservation ledger. Also serves the read-side seat views.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use chrono::{DateTime, Utc};
use marquee_core::{
  catalog::{Room, Session},
  seat::{self, SeatId},
  store::CinemaStore,
  ticket::{FareClass, Money, Ticket},
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::seats_csv,
  ledger::{CommitOutcome, SeatLedger},
};

// ─── Requests and views ──────────────────────────────────────────────────────

/// One requested seat with its fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleItem {
  pub seat: SeatId,
  pub fare: FareClass,
}

/// A confirmed sale: the tickets in request order, and what they cost.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
  pub tickets: Vec<Ticket>,
  pub total:   Money,
}

/// One seat of a rendered seat map.
#[derive(Debug, Clone, Serialize)]
pub struct SeatStatus {
  pub seat: SeatId,
  pub sold: bool,
}

/// Everything a seat-picker needs for one session, in one read.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSeatMap {
  pub session_id:  Uuid,
  pub movie_title: String,
  pub room_number: u32,
  pub capacity:    u32,
  pub starts_at:   DateTime<Utc>,
  pub seats:       Vec<SeatStatus>,
}

// ─── BoxOffice ───────────────────────────────────────────────────────────────

/// The sale coordinator. One instance per server process.
pub struct BoxOffice<S> {
  store:  Arc<S>,
  ledger: SeatLedger,
  /// Generated seat maps, cached per distinct capacity. Only the seat-map
  /// view materialises a layout; sale validation stays arithmetic.
  maps:   Mutex<HashMap<u32, Arc<[SeatId]>>>,
}

impl<S: CinemaStore> BoxOffice<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      ledger: SeatLedger::new(),
      maps: Mutex::new(HashMap::new()),
    }
  }

  async fn session(&self, session_id: Uuid) -> Result<Session> {
    self
      .store
      .get_session(session_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::SessionNotFound(session_id))
  }

  async fn room(&self, session: &Session) -> Result<Room> {
    self
      .store
      .get_room(session.room_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::RoomNotFound(session.room_id))
  }

  async fn layout(&self, capacity: u32) -> Result<Arc<[SeatId]>> {
    let mut maps = self.maps.lock().await;
    if let Some(map) = maps.get(&capacity) {
      return Ok(map.clone());
    }
    let map: Arc<[SeatId]> = seat::seat_map(capacity)?.into();
    maps.insert(capacity, map.clone());
    Ok(map)
  }

  /// Ordered list of the session's sold seats. Read-only and idempotent.
  pub async fn occupied_seats(&self, session_id: Uuid) -> Result<Vec<SeatId>> {
    self.session(session_id).await?;
    self.ledger.occupied_seats(self.store.as_ref(), session_id).await
  }

  /// The session's full seat map with sold seats flagged, plus the header
  /// data (movie title, room number, start time) a seat picker shows.
  pub async fn seat_map(&self, session_id: Uuid) -> Result<SessionSeatMap> {
    let session = self.session(session_id).await?;
    let room = self.room(&session).await?;
    let movie = self
      .store
      .get_movie(session.movie_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::MovieNotFound(session.movie_id))?;

    let layout = self.layout(room.capacity).await?;
    let sold: HashSet<SeatId> = self
      .ledger
      .occupied_seats(self.store.as_ref(), session_id)
      .await?
      .into_iter()
      .collect();

    let seats = layout
      .iter()
      .map(|&s| SeatStatus { seat: s, sold: sold.contains(&s) })
      .collect();

    Ok(SessionSeatMap {
      session_id: session.session_id,
      movie_title: movie.title,
      room_number: room.number,
      capacity: room.capacity,
      starts_at: session.starts_at,
      seats,
    })
  }

  /// Tickets sold for the session so far, in sale order.
  pub async fn tickets(&self, session_id: Uuid) -> Result<Vec<Ticket>> {
    self.session(session_id).await?;
    self
      .store
      .list_tickets(session_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Sell seats for a session.
  ///
  /// Validation order is fixed and the first failure wins: empty request,
  /// duplicate seat within the request, unknown session, seat outside the
  /// room's layout, then the atomic commit (which reports already-sold
  /// seats). There is no partial outcome: either every requested seat
  /// becomes a ticket or none does.
  pub async fn submit_sale(
    &self,
    session_id: Uuid,
    items: &[SaleItem],
  ) -> Result<SaleReceipt> {
    if items.is_empty() {
      return Err(Error::EmptyRequest);
    }
    let mut seen = HashSet::new();
    for item in items {
      if !seen.insert(item.seat) {
        return Err(Error::DuplicateSeat { seat: item.seat });
      }
    }

    let session = self.session(session_id).await?;
    let room = self.room(&session).await?;
    for item in items {
      if !seat::seat_in_layout(item.seat, room.capacity)? {
        return Err(Error::UnknownSeat { seat: item.seat });
      }
    }

    let now = Utc::now();
    let tickets: Vec<Ticket> = items
      .iter()
      .map(|item| Ticket {
        ticket_id:  Uuid::new_v4(),
        session_id: session.session_id,
        seat:       item.seat,
        fare:       item.fare,
        price:      item.fare.price(),
        created_at: now,
      })
      .collect();

    match self.ledger.try_commit(self.store.as_ref(), session_id, tickets).await
    {
      Ok(CommitOutcome::Committed(tickets)) => {
        let total: Money = tickets.iter().map(|t| t.price).sum();
        let seat_list: Vec<SeatId> = tickets.iter().map(|t| t.seat).collect();
        tracing::info!(
          "sale committed: session {session_id}, seats [{}], total {total}",
          seats_csv(&seat_list),
        );
        Ok(SaleReceipt { tickets, total })
      }
      Ok(CommitOutcome::Rejected { conflicting }) => {
        tracing::warn!(
          "sale rejected: session {session_id}, seats already sold [{}]",
          seats_csv(&conflicting),
        );
        Err(Error::SeatsAlreadySold { conflicting })
      }
      Err(e) => {
        if let Error::StorageDisagrees { seat } = &e {
          tracing::error!(
            "ledger and storage disagree on session {session_id}, seat {seat}",
          );
        }
        Err(e)
      }
    }
  }
}
