//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, civil dates as `YYYY-MM-DD`.
//! Seats use their canonical text form (`A1`), fares their lowercase
//! discriminant, prices integer cents. UUIDs are hyphenated lowercase.

use chrono::{DateTime, NaiveDate, Utc};
use marquee_core::{
  catalog::{Movie, Room, Session},
  seat::SeatId,
  ticket::{FareClass, Money, Ticket},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps and dates ────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── Seats and fares ─────────────────────────────────────────────────────────

pub fn encode_seat(seat: SeatId) -> String { seat.to_string() }

pub fn decode_seat(s: &str) -> Result<SeatId> { Ok(s.parse::<SeatId>()?) }

pub fn encode_fare(fare: FareClass) -> &'static str { fare.discriminant() }

pub fn decode_fare(s: &str) -> Result<FareClass> {
  FareClass::from_discriminant(s)
    .ok_or_else(|| Error::Decode(format!("unknown fare: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `movies` row.
pub struct RawMovie {
  pub movie_id:         String,
  pub title:            String,
  pub synopsis:         String,
  pub duration_minutes: u32,
  pub rating:           String,
  pub genre:            String,
  pub runs_from:        String,
  pub runs_until:       String,
  pub created_at:       String,
}

impl RawMovie {
  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      movie_id:         decode_uuid(&self.movie_id)?,
      title:            self.title,
      synopsis:         self.synopsis,
      duration_minutes: self.duration_minutes,
      rating:           self.rating,
      genre:            self.genre,
      runs_from:        decode_date(&self.runs_from)?,
      runs_until:       decode_date(&self.runs_until)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `rooms` row.
pub struct RawRoom {
  pub room_id:    String,
  pub number:     u32,
  pub capacity:   u32,
  pub created_at: String,
}

impl RawRoom {
  pub fn into_room(self) -> Result<Room> {
    Ok(Room {
      room_id:    decode_uuid(&self.room_id)?,
      number:     self.number,
      capacity:   self.capacity,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub session_id: String,
  pub movie_id:   String,
  pub room_id:    String,
  pub starts_at:  String,
  pub created_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id: decode_uuid(&self.session_id)?,
      movie_id:   decode_uuid(&self.movie_id)?,
      room_id:    decode_uuid(&self.room_id)?,
      starts_at:  decode_dt(&self.starts_at)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values for a `tickets` row; used in both directions, since ticket
/// batches are encoded up front and inserted inside one transaction.
pub struct RawTicket {
  pub ticket_id:   String,
  pub session_id:  String,
  pub seat:        String,
  pub fare:        String,
  pub price_cents: u64,
  pub created_at:  String,
}

impl RawTicket {
  pub fn from_ticket(t: &Ticket) -> Self {
    Self {
      ticket_id:   encode_uuid(t.ticket_id),
      session_id:  encode_uuid(t.session_id),
      seat:        encode_seat(t.seat),
      fare:        encode_fare(t.fare).to_owned(),
      price_cents: t.price.cents(),
      created_at:  encode_dt(t.created_at),
    }
  }

  pub fn into_ticket(self) -> Result<Ticket> {
    Ok(Ticket {
      ticket_id:  decode_uuid(&self.ticket_id)?,
      session_id: decode_uuid(&self.session_id)?,
      seat:       decode_seat(&self.seat)?,
      fare:       decode_fare(&self.fare)?,
      price:      Money::from_cents(self.price_cents),
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
