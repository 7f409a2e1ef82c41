//! [`SqliteStore`] — the SQLite implementation of [`CinemaStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use marquee_core::{
  catalog::{Movie, NewMovie, NewRoom, NewSession, Room, Session},
  seat::SeatId,
  store::{CinemaStore, Removal, TicketInsert},
  ticket::Ticket,
};

use crate::{
  Error, Result,
  encode::{
    RawMovie, RawRoom, RawSession, RawTicket, encode_date, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Constraint helpers ──────────────────────────────────────────────────────

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Marquee store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row DELETE, mapping "no rows" to `NotFound` and a
  /// foreign-key refusal to `Referenced`.
  async fn remove_row(&self, sql: &'static str, id: Uuid) -> Result<Removal> {
    let id_str = encode_uuid(id);
    let removal = self
      .conn
      .call(move |conn| {
        match conn.execute(sql, rusqlite::params![id_str]) {
          Ok(0) => Ok(Removal::NotFound),
          Ok(_) => Ok(Removal::Removed),
          Err(e) if is_foreign_key_violation(&e) => Ok(Removal::Referenced),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(removal)
  }
}

// ─── CinemaStore impl ────────────────────────────────────────────────────────

impl CinemaStore for SqliteStore {
  type Error = Error;

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn add_movie(&self, input: NewMovie) -> Result<Movie> {
    let movie = Movie {
      movie_id:         Uuid::new_v4(),
      title:            input.title,
      synopsis:         input.synopsis,
      duration_minutes: input.duration_minutes,
      rating:           input.rating,
      genre:            input.genre,
      runs_from:        input.runs_from,
      runs_until:       input.runs_until,
      created_at:       Utc::now(),
    };

    let id_str    = encode_uuid(movie.movie_id);
    let title     = movie.title.clone();
    let synopsis  = movie.synopsis.clone();
    let duration  = movie.duration_minutes;
    let rating    = movie.rating.clone();
    let genre     = movie.genre.clone();
    let from_str  = encode_date(movie.runs_from);
    let until_str = encode_date(movie.runs_until);
    let at_str    = encode_dt(movie.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO movies (
             movie_id, title, synopsis, duration_minutes, rating, genre,
             runs_from, runs_until, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, title, synopsis, duration, rating, genre, from_str,
            until_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(movie)
  }

  async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMovie> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT movie_id, title, synopsis, duration_minutes, rating,
                      genre, runs_from, runs_until, created_at
               FROM movies WHERE movie_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawMovie {
                  movie_id:         row.get(0)?,
                  title:            row.get(1)?,
                  synopsis:         row.get(2)?,
                  duration_minutes: row.get(3)?,
                  rating:           row.get(4)?,
                  genre:            row.get(5)?,
                  runs_from:        row.get(6)?,
                  runs_until:       row.get(7)?,
                  created_at:       row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMovie::into_movie).transpose()
  }

  async fn list_movies(&self) -> Result<Vec<Movie>> {
    let raws: Vec<RawMovie> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, title, synopsis, duration_minutes, rating,
                  genre, runs_from, runs_until, created_at
           FROM movies ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawMovie {
              movie_id:         row.get(0)?,
              title:            row.get(1)?,
              synopsis:         row.get(2)?,
              duration_minutes: row.get(3)?,
              rating:           row.get(4)?,
              genre:            row.get(5)?,
              runs_from:        row.get(6)?,
              runs_until:       row.get(7)?,
              created_at:       row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMovie::into_movie).collect()
  }

  async fn remove_movie(&self, id: Uuid) -> Result<Removal> {
    self.remove_row("DELETE FROM movies WHERE movie_id = ?1", id).await
  }

  // ── Rooms ─────────────────────────────────────────────────────────────────

  async fn add_room(&self, input: NewRoom) -> Result<Room> {
    let room = Room {
      room_id:    Uuid::new_v4(),
      number:     input.number,
      capacity:   input.capacity,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(room.room_id);
    let number   = room.number;
    let capacity = room.capacity;
    let at_str   = encode_dt(room.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rooms (room_id, number, capacity, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, number, capacity, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(room)
  }

  async fn get_room(&self, id: Uuid) -> Result<Option<Room>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRoom> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT room_id, number, capacity, created_at
               FROM rooms WHERE room_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawRoom {
                  room_id:    row.get(0)?,
                  number:     row.get(1)?,
                  capacity:   row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRoom::into_room).transpose()
  }

  async fn list_rooms(&self) -> Result<Vec<Room>> {
    let raws: Vec<RawRoom> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT room_id, number, capacity, created_at
           FROM rooms ORDER BY number, rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRoom {
              room_id:    row.get(0)?,
              number:     row.get(1)?,
              capacity:   row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRoom::into_room).collect()
  }

  async fn remove_room(&self, id: Uuid) -> Result<Removal> {
    self.remove_row("DELETE FROM rooms WHERE room_id = ?1", id).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn add_session(&self, input: NewSession) -> Result<Session> {
    let session = Session {
      session_id: Uuid::new_v4(),
      movie_id:   input.movie_id,
      room_id:    input.room_id,
      starts_at:  input.starts_at,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(session.session_id);
    let movie_str  = encode_uuid(session.movie_id);
    let room_str   = encode_uuid(session.room_id);
    let starts_str = encode_dt(session.starts_at);
    let at_str     = encode_dt(session.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (session_id, movie_id, room_id, starts_at, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, movie_str, room_str, starts_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT session_id, movie_id, room_id, starts_at, created_at
               FROM sessions WHERE session_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawSession {
                  session_id: row.get(0)?,
                  movie_id:   row.get(1)?,
                  room_id:    row.get(2)?,
                  starts_at:  row.get(3)?,
                  created_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn list_sessions(&self) -> Result<Vec<Session>> {
    let raws: Vec<RawSession> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT session_id, movie_id, room_id, starts_at, created_at
           FROM sessions ORDER BY starts_at, rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSession {
              session_id: row.get(0)?,
              movie_id:   row.get(1)?,
              room_id:    row.get(2)?,
              starts_at:  row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn remove_session(&self, id: Uuid) -> Result<Removal> {
    self.remove_row("DELETE FROM sessions WHERE session_id = ?1", id).await
  }

  // ── Tickets ───────────────────────────────────────────────────────────────

  async fn list_tickets(&self, session_id: Uuid) -> Result<Vec<Ticket>> {
    let id_str = encode_uuid(session_id);

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ticket_id, session_id, seat, fare, price_cents, created_at
           FROM tickets WHERE session_id = ?1
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawTicket {
              ticket_id:   row.get(0)?,
              session_id:  row.get(1)?,
              seat:        row.get(2)?,
              fare:        row.get(3)?,
              price_cents: row.get(4)?,
              created_at:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTicket::into_ticket).collect()
  }

  async fn insert_tickets(&self, tickets: &[Ticket]) -> Result<TicketInsert> {
    let rows: Vec<RawTicket> =
      tickets.iter().map(RawTicket::from_ticket).collect();
    let seats: Vec<SeatId> = tickets.iter().map(|t| t.seat).collect();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (row, seat) in rows.iter().zip(seats) {
          let inserted = tx.execute(
            "INSERT INTO tickets (
               ticket_id, session_id, seat, fare, price_cents, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              row.ticket_id,
              row.session_id,
              row.seat,
              row.fare,
              row.price_cents,
              row.created_at,
            ],
          );
          match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
              // Dropping the uncommitted transaction rolls the earlier
              // inserts of this batch back.
              return Ok(TicketInsert::SeatTaken { seat });
            }
            Err(e) => return Err(e.into()),
          }
        }
        tx.commit()?;
        Ok(TicketInsert::Inserted)
      })
      .await?;

    Ok(outcome)
  }
}
