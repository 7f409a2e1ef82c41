//! The `CinemaStore` trait and its outcome types.
//!
//! The trait is implemented by storage backends (e.g.
//! `marquee-store-sqlite`). Higher layers (`marquee-boxoffice`,
//! `marquee-api`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  catalog::{Movie, NewMovie, NewRoom, NewSession, Room, Session},
  seat::SeatId,
  ticket::Ticket,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of a delete. Refusals are data, not errors: callers branch on
/// them, and only genuine storage faults travel the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
  Removed,
  /// No row with that id; nothing to delete.
  NotFound,
  /// Something still references the row (a session points at the movie or
  /// room, or tickets exist for the session). Nothing was deleted.
  Referenced,
}

/// Result of persisting a sale's ticket batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketInsert {
  /// Every ticket in the batch is durably stored.
  Inserted,
  /// `seat` is already stored for this session; the whole batch was rolled
  /// back and nothing was written.
  SeatTaken { seat: SeatId },
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Marquee storage backend.
///
/// Tickets are append-only: there is no update or delete for them anywhere
/// in this trait. `insert_tickets` must be atomic over its whole batch, and
/// the backend must enforce one-ticket-per-seat-per-session, reporting a
/// duplicate as [`TicketInsert::SeatTaken`] with nothing written.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CinemaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Create and persist a new movie. `movie_id` and `created_at` are
  /// assigned by the store.
  fn add_movie(
    &self,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Retrieve a movie by id. Returns `None` if not found.
  fn get_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// List all movies, oldest first.
  fn list_movies(
    &self,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// Delete a movie, unless a session still references it.
  fn remove_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Removal, Self::Error>> + Send + '_;

  // ── Rooms ─────────────────────────────────────────────────────────────

  /// Create and persist a new room. `room_id` and `created_at` are
  /// assigned by the store.
  fn add_room(
    &self,
    input: NewRoom,
  ) -> impl Future<Output = Result<Room, Self::Error>> + Send + '_;

  /// Retrieve a room by id. Returns `None` if not found.
  fn get_room(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  /// List all rooms, by room number.
  fn list_rooms(
    &self,
  ) -> impl Future<Output = Result<Vec<Room>, Self::Error>> + Send + '_;

  /// Delete a room, unless a session still references it.
  fn remove_room(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Removal, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Create and persist a new session. The referenced movie and room must
  /// exist; the backend enforces this referentially.
  fn add_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Retrieve a session by id. Returns `None` if not found.
  fn get_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// List all sessions, soonest first.
  fn list_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  /// Delete a session, unless tickets have been sold for it.
  fn remove_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Removal, Self::Error>> + Send + '_;

  // ── Tickets ───────────────────────────────────────────────────────────

  /// All tickets sold for a session, in sale order. The reservation ledger
  /// hydrates its occupancy from this; an unknown session id simply yields
  /// an empty list.
  fn list_tickets(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Ticket>, Self::Error>> + Send + '_;

  /// Persist a sale's tickets as one atomic batch: either every ticket is
  /// written or none is.
  fn insert_tickets<'a>(
    &'a self,
    tickets: &'a [Ticket],
  ) -> impl Future<Output = Result<TicketInsert, Self::Error>> + Send + 'a;
}
