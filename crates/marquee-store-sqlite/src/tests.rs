//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, TimeZone, Utc};
use marquee_core::{
  catalog::{NewMovie, NewRoom, NewSession, Session},
  store::{CinemaStore, Removal, TicketInsert},
  ticket::{FareClass, Money, Ticket},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn horror_movie() -> NewMovie {
  NewMovie {
    title:            "Nosferatu".into(),
    synopsis:         "A broker's wife draws the attention of a count.".into(),
    duration_minutes: 132,
    rating:           "16".into(),
    genre:            "Horror".into(),
    runs_from:        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
    runs_until:       NaiveDate::from_ymd_opt(2025, 2, 27).unwrap(),
  }
}

fn ticket(session_id: Uuid, seat: &str, fare: FareClass) -> Ticket {
  Ticket {
    ticket_id: Uuid::new_v4(),
    session_id,
    seat: seat.parse().unwrap(),
    fare,
    price: fare.price(),
    created_at: Utc::now(),
  }
}

/// Movie + room + session, ready for ticket tests.
async fn seeded_session(s: &SqliteStore, capacity: u32) -> Session {
  let movie = s.add_movie(horror_movie()).await.unwrap();
  let room = s.add_room(NewRoom { number: 1, capacity }).await.unwrap();
  s.add_session(NewSession {
    movie_id:  movie.movie_id,
    room_id:   room.room_id,
    starts_at: Utc.with_ymd_and_hms(2025, 1, 10, 20, 30, 0).unwrap(),
  })
  .await
  .unwrap()
}

// ─── Movies ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_movie() {
  let s = store().await;

  let movie = s.add_movie(horror_movie()).await.unwrap();
  assert_eq!(movie.title, "Nosferatu");

  let fetched = s.get_movie(movie.movie_id).await.unwrap().unwrap();
  assert_eq!(fetched.movie_id, movie.movie_id);
  assert_eq!(fetched.duration_minutes, 132);
  assert_eq!(fetched.runs_from, movie.runs_from);
  assert_eq!(fetched.runs_until, movie.runs_until);
  assert_eq!(fetched.created_at, movie.created_at);
}

#[tokio::test]
async fn get_movie_missing_returns_none() {
  let s = store().await;
  assert!(s.get_movie(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_movies_oldest_first() {
  let s = store().await;

  let first = s.add_movie(horror_movie()).await.unwrap();
  let second = s
    .add_movie(NewMovie { title: "Metropolis".into(), ..horror_movie() })
    .await
    .unwrap();

  let all = s.list_movies().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].movie_id, first.movie_id);
  assert_eq!(all[1].movie_id, second.movie_id);
}

#[tokio::test]
async fn remove_movie() {
  let s = store().await;
  let movie = s.add_movie(horror_movie()).await.unwrap();

  assert_eq!(s.remove_movie(movie.movie_id).await.unwrap(), Removal::Removed);
  assert!(s.get_movie(movie.movie_id).await.unwrap().is_none());
  assert_eq!(s.remove_movie(movie.movie_id).await.unwrap(), Removal::NotFound);
}

#[tokio::test]
async fn remove_movie_referenced_by_session_is_refused() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  assert_eq!(
    s.remove_movie(session.movie_id).await.unwrap(),
    Removal::Referenced,
  );
  // The refusal deleted nothing.
  assert!(s.get_movie(session.movie_id).await.unwrap().is_some());
}

// ─── Rooms ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_room() {
  let s = store().await;

  let room = s.add_room(NewRoom { number: 3, capacity: 80 }).await.unwrap();
  let fetched = s.get_room(room.room_id).await.unwrap().unwrap();
  assert_eq!(fetched.number, 3);
  assert_eq!(fetched.capacity, 80);
}

#[tokio::test]
async fn list_rooms_by_number() {
  let s = store().await;

  s.add_room(NewRoom { number: 7, capacity: 120 }).await.unwrap();
  s.add_room(NewRoom { number: 3, capacity: 80 }).await.unwrap();

  let numbers: Vec<u32> =
    s.list_rooms().await.unwrap().iter().map(|r| r.number).collect();
  assert_eq!(numbers, [3, 7]);
}

#[tokio::test]
async fn remove_room_referenced_by_session_is_refused() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  assert_eq!(
    s.remove_room(session.room_id).await.unwrap(),
    Removal::Referenced,
  );
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_session() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  let fetched = s.get_session(session.session_id).await.unwrap().unwrap();
  assert_eq!(fetched.movie_id, session.movie_id);
  assert_eq!(fetched.room_id, session.room_id);
  assert_eq!(fetched.starts_at, session.starts_at);
}

#[tokio::test]
async fn add_session_with_unknown_movie_errors() {
  let s = store().await;
  let room = s.add_room(NewRoom { number: 1, capacity: 50 }).await.unwrap();

  let result = s
    .add_session(NewSession {
      movie_id:  Uuid::new_v4(),
      room_id:   room.room_id,
      starts_at: Utc::now(),
    })
    .await;
  assert!(result.is_err());
}

#[tokio::test]
async fn list_sessions_soonest_first() {
  let s = store().await;
  let movie = s.add_movie(horror_movie()).await.unwrap();
  let room = s.add_room(NewRoom { number: 1, capacity: 50 }).await.unwrap();

  let later = s
    .add_session(NewSession {
      movie_id:  movie.movie_id,
      room_id:   room.room_id,
      starts_at: Utc.with_ymd_and_hms(2025, 1, 12, 22, 0, 0).unwrap(),
    })
    .await
    .unwrap();
  let sooner = s
    .add_session(NewSession {
      movie_id:  movie.movie_id,
      room_id:   room.room_id,
      starts_at: Utc.with_ymd_and_hms(2025, 1, 10, 20, 30, 0).unwrap(),
    })
    .await
    .unwrap();

  let ids: Vec<Uuid> =
    s.list_sessions().await.unwrap().iter().map(|x| x.session_id).collect();
  assert_eq!(ids, [sooner.session_id, later.session_id]);
}

#[tokio::test]
async fn remove_session_then_catalog_rows() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  assert_eq!(
    s.remove_session(session.session_id).await.unwrap(),
    Removal::Removed,
  );
  // With the session gone, its movie and room are deletable.
  assert_eq!(s.remove_movie(session.movie_id).await.unwrap(), Removal::Removed);
  assert_eq!(s.remove_room(session.room_id).await.unwrap(), Removal::Removed);
}

#[tokio::test]
async fn remove_session_with_tickets_is_refused() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  let batch = [ticket(session.session_id, "A1", FareClass::Full)];
  assert_eq!(
    s.insert_tickets(&batch).await.unwrap(),
    TicketInsert::Inserted,
  );
  assert_eq!(
    s.remove_session(session.session_id).await.unwrap(),
    Removal::Referenced,
  );
}

// ─── Tickets ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_tickets_in_sale_order() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  let batch = [
    ticket(session.session_id, "B2", FareClass::Half),
    ticket(session.session_id, "A1", FareClass::Full),
  ];
  assert_eq!(
    s.insert_tickets(&batch).await.unwrap(),
    TicketInsert::Inserted,
  );

  let listed = s.list_tickets(session.session_id).await.unwrap();
  assert_eq!(listed.len(), 2);
  // Sale order, not seat order.
  assert_eq!(listed[0].seat.to_string(), "B2");
  assert_eq!(listed[1].seat.to_string(), "A1");
  assert_eq!(listed[0].fare, FareClass::Half);
  assert_eq!(listed[0].price, Money::from_cents(1000));
  assert_eq!(listed[1].price, Money::from_cents(2000));
}

#[tokio::test]
async fn list_tickets_for_unknown_session_is_empty() {
  let s = store().await;
  assert!(s.list_tickets(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn taken_seat_rejects_the_whole_batch() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  let first = [ticket(session.session_id, "B2", FareClass::Full)];
  s.insert_tickets(&first).await.unwrap();

  let second = [
    ticket(session.session_id, "C1", FareClass::Full),
    ticket(session.session_id, "B2", FareClass::Half),
    ticket(session.session_id, "C2", FareClass::Full),
  ];
  let outcome = s.insert_tickets(&second).await.unwrap();
  assert!(matches!(
    outcome,
    TicketInsert::SeatTaken { seat } if seat.to_string() == "B2"
  ));

  // Rolled back: C1 and C2 were not written either.
  let listed = s.list_tickets(session.session_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].seat.to_string(), "B2");
}

#[tokio::test]
async fn duplicate_seat_within_one_batch_rolls_back() {
  let s = store().await;
  let session = seeded_session(&s, 50).await;

  let batch = [
    ticket(session.session_id, "A1", FareClass::Full),
    ticket(session.session_id, "A1", FareClass::Half),
  ];
  let outcome = s.insert_tickets(&batch).await.unwrap();
  assert!(matches!(
    outcome,
    TicketInsert::SeatTaken { seat } if seat.to_string() == "A1"
  ));
  assert!(s.list_tickets(session.session_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn same_seat_in_different_sessions_is_fine() {
  let s = store().await;
  let movie = s.add_movie(horror_movie()).await.unwrap();
  let room = s.add_room(NewRoom { number: 1, capacity: 50 }).await.unwrap();

  let mut sessions = Vec::new();
  for hour in [18, 21] {
    sessions.push(
      s.add_session(NewSession {
        movie_id:  movie.movie_id,
        room_id:   room.room_id,
        starts_at: Utc.with_ymd_and_hms(2025, 1, 10, hour, 0, 0).unwrap(),
      })
      .await
      .unwrap(),
    );
  }

  for session in &sessions {
    let batch = [ticket(session.session_id, "A1", FareClass::Full)];
    assert_eq!(
      s.insert_tickets(&batch).await.unwrap(),
      TicketInsert::Inserted,
    );
  }
}
