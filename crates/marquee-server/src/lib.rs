//! HTTP server for Marquee.
//!
//! Assembles the SQLite store, the box office, and the JSON API into one
//! axum application. The binary in `main.rs` adds configuration loading and
//! listener setup; everything testable lives here.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use marquee_core::store::CinemaStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// with `MARQUEE_`-prefixed environment variables.
///
/// Every field has a default, so the server starts with no configuration at
/// all and serves out of `marquee.db` in the working directory.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8880
}

fn default_store_path() -> PathBuf {
  PathBuf::from("marquee.db")
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the axum application: the JSON API nested under `/api`, with
/// request tracing on the whole tree.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: CinemaStore + 'static,
{
  Router::new()
    .nest("/api", marquee_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use marquee_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn test_app() -> Router {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    app(store)
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder.body(Body::from(json.to_string())).unwrap()
      }
      None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes =
      axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  fn id(value: &Value, field: &str) -> Uuid {
    value[field].as_str().unwrap().parse().unwrap()
  }

  fn sale_body(seats: &[(&str, &str)]) -> Value {
    json!({
      "seats": seats
        .iter()
        .map(|(seat, fare)| json!({ "seat": seat, "fare": fare }))
        .collect::<Vec<_>>(),
    })
  }

  struct Seeded {
    movie_id:   Uuid,
    room_id:    Uuid,
    session_id: Uuid,
  }

  async fn seed_catalog(app: &Router, capacity: u32) -> Seeded {
    let (status, movie) = send(
      app,
      "POST",
      "/api/movies",
      Some(json!({
        "title":            "Metropolis",
        "synopsis":         "A city of two halves.",
        "duration_minutes": 153,
        "rating":           "L",
        "genre":            "Science fiction",
        "runs_from":        "2025-05-01",
        "runs_until":       "2025-05-31",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, room) = send(
      app,
      "POST",
      "/api/rooms",
      Some(json!({ "number": 4, "capacity": capacity })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, session) = send(
      app,
      "POST",
      "/api/sessions",
      Some(json!({
        "movie_id":  movie["movie_id"],
        "room_id":   room["room_id"],
        "starts_at": "2025-05-09T19:30:00Z",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Seeded {
      movie_id:   id(&movie, "movie_id"),
      room_id:    id(&room, "room_id"),
      session_id: id(&session, "session_id"),
    }
  }

  // ── Sales ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn selling_seats_returns_a_receipt() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;
    let uri = format!("/api/sessions/{}/sales", seeded.session_id);

    let (status, receipt) = send(
      &app,
      "POST",
      &uri,
      Some(sale_body(&[("A1", "FULL"), ("B2", "HALF")])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["total"], "30.00");
    let tickets = receipt["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0]["seat"], "A1");
    assert_eq!(tickets[0]["fare"], "FULL");
    assert_eq!(tickets[0]["price"], "20.00");
    assert_eq!(tickets[1]["seat"], "B2");
    assert_eq!(tickets[1]["price"], "10.00");

    let (status, history) = send(
      &app,
      "GET",
      &format!("/api/sessions/{}/tickets", seeded.session_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn conflicting_sale_returns_409_with_the_seats() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;
    let uri = format!("/api/sessions/{}/sales", seeded.session_id);

    let (status, _) = send(
      &app,
      "POST",
      &uri,
      Some(sale_body(&[("A1", "FULL"), ("B2", "HALF")])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
      &app,
      "POST",
      &uri,
      Some(sale_body(&[("B2", "FULL"), ("B1", "HALF")])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "seats_already_sold");
    assert_eq!(body["conflicting"], json!(["B2"]));

    // The losing request sold nothing.
    let (_, occupied) = send(
      &app,
      "GET",
      &format!("/api/sessions/{}/seats/occupied", seeded.session_id),
      None,
    )
    .await;
    assert_eq!(occupied, json!(["A1", "B2"]));
  }

  #[tokio::test]
  async fn empty_sale_is_rejected() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
  }

  #[tokio::test]
  async fn malformed_seat_id_is_rejected() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[("A0", "FULL")])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("malformed seat id"), "error: {message}");
  }

  #[tokio::test]
  async fn duplicate_seat_is_rejected() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[("A1", "FULL"), ("A1", "HALF")])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
  }

  #[tokio::test]
  async fn seat_outside_the_room_is_rejected() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[("C5", "FULL")])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("C5"), "error: {message}");
  }

  #[tokio::test]
  async fn unknown_session_is_404_on_every_route() {
    let app = test_app().await;
    seed_catalog(&app, 12).await;
    let missing = Uuid::new_v4();

    for uri in [
      format!("/api/sessions/{missing}"),
      format!("/api/sessions/{missing}/seats"),
      format!("/api/sessions/{missing}/seats/occupied"),
      format!("/api/sessions/{missing}/tickets"),
    ] {
      let (status, body) = send(&app, "GET", &uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
      assert_eq!(body["kind"], "not_found", "GET {uri}");
    }

    let (status, _) = send(
      &app,
      "POST",
      &format!("/api/sessions/{missing}/sales"),
      Some(sale_body(&[("A1", "FULL")])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Seat map view ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn seat_map_shows_sold_flags() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, _) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[("B2", "HALF")])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, view) = send(
      &app,
      "GET",
      &format!("/api/sessions/{}/seats", seeded.session_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["movie_title"], "Metropolis");
    assert_eq!(view["room_number"], 4);
    assert_eq!(view["capacity"], 12);
    assert!(view["starts_at"].is_string());

    let seats = view["seats"].as_array().unwrap();
    assert_eq!(seats.len(), 12);
    assert_eq!(seats[0], json!({ "seat": "A1", "sold": false }));
    assert_eq!(seats[11], json!({ "seat": "B2", "sold": true }));
    let sold: Vec<&Value> =
      seats.iter().filter(|s| s["sold"] == true).collect();
    assert_eq!(sold.len(), 1);
  }

  // ── Catalog ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn movie_crud_round_trip() {
    let app = test_app().await;

    let (status, movie) = send(
      &app,
      "POST",
      "/api/movies",
      Some(json!({
        "title":            "Sunrise",
        "synopsis":         "A song of two humans.",
        "duration_minutes": 94,
        "rating":           "L",
        "genre":            "Drama",
        "runs_from":        "2025-06-01",
        "runs_until":       "2025-06-14",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let movie_id = id(&movie, "movie_id");

    let (status, listed) = send(&app, "GET", "/api/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, fetched) =
      send(&app, "GET", &format!("/api/movies/{movie_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Sunrise");

    let (status, _) =
      send(&app, "DELETE", &format!("/api/movies/{movie_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&app, "GET", &format!("/api/movies/{movie_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn session_create_with_dangling_ids_is_404() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "POST",
      "/api/sessions",
      Some(json!({
        "movie_id":  seeded.movie_id,
        "room_id":   Uuid::new_v4(),
        "starts_at": "2025-05-10T19:30:00Z",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("room"));

    let (status, body) = send(
      &app,
      "POST",
      "/api/sessions",
      Some(json!({
        "movie_id":  Uuid::new_v4(),
        "room_id":   seeded.room_id,
        "starts_at": "2025-05-10T19:30:00Z",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("movie"));
  }

  #[tokio::test]
  async fn deleting_referenced_catalog_rows_is_refused() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, body) = send(
      &app,
      "DELETE",
      &format!("/api/movies/{}", seeded.movie_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (status, _) = send(
      &app,
      "DELETE",
      &format!("/api/rooms/{}", seeded.room_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Remove the session and the catalog rows free up.
    let (status, _) = send(
      &app,
      "DELETE",
      &format!("/api/sessions/{}", seeded.session_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
      &app,
      "DELETE",
      &format!("/api/movies/{}", seeded.movie_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
      &app,
      "DELETE",
      &format!("/api/rooms/{}", seeded.room_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  #[tokio::test]
  async fn deleting_a_ticketed_session_is_refused() {
    let app = test_app().await;
    let seeded = seed_catalog(&app, 12).await;

    let (status, _) = send(
      &app,
      "POST",
      &format!("/api/sessions/{}/sales", seeded.session_id),
      Some(sale_body(&[("A1", "FULL")])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
      &app,
      "DELETE",
      &format!("/api/sessions/{}", seeded.session_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("sold tickets"));
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn default_config_fills_every_field() {
    let settings = config::Config::builder().build().unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8880);
    assert_eq!(cfg.store_path, PathBuf::from("marquee.db"));
  }
}
