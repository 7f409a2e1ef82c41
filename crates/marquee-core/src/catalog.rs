//! Catalog types — movies, rooms, and the sessions that bind them.
//!
//! Catalog rows are created and deleted whole; there are no update
//! operations. Deletion is refused while anything still references the row,
//! so a session can never point at a missing movie or room, and sold tickets
//! never lose their session.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Movies ──────────────────────────────────────────────────────────────────

/// A film in the programme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:         Uuid,
  pub title:            String,
  pub synopsis:         String,
  pub duration_minutes: u32,
  /// Age-rating label, e.g. `"L"` or `"16"`. Free-form.
  pub rating:           String,
  pub genre:            String,
  /// First day of the exhibition window.
  pub runs_from:        NaiveDate,
  /// Last day of the exhibition window.
  pub runs_until:       NaiveDate,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`CinemaStore::add_movie`](crate::store::CinemaStore::add_movie).
/// `movie_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovie {
  pub title:            String,
  pub synopsis:         String,
  pub duration_minutes: u32,
  pub rating:           String,
  pub genre:            String,
  pub runs_from:        NaiveDate,
  pub runs_until:       NaiveDate,
}

// ─── Rooms ───────────────────────────────────────────────────────────────────

/// A screening room. `capacity` alone determines the seat map
/// (see [`crate::seat::seat_map`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
  pub room_id:    Uuid,
  /// The house's display number for the room.
  pub number:     u32,
  pub capacity:   u32,
  pub created_at: DateTime<Utc>,
}

/// Input to [`CinemaStore::add_room`](crate::store::CinemaStore::add_room).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
  pub number:   u32,
  pub capacity: u32,
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// A screening: one movie, in one room, at one start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub session_id: Uuid,
  pub movie_id:   Uuid,
  pub room_id:    Uuid,
  pub starts_at:  DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`CinemaStore::add_session`](crate::store::CinemaStore::add_session).
/// The referenced movie and room must already exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
  pub movie_id:  Uuid,
  pub room_id:   Uuid,
  pub starts_at: DateTime<Utc>,
}
