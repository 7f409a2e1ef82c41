//! Handlers for per-session seat and sale endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sessions/:id/seats` | Full seat map with sold flags |
//! | `GET`  | `/sessions/:id/seats/occupied` | Sold seats only, row-major order |
//! | `GET`  | `/sessions/:id/tickets` | Sale history, oldest first |
//! | `POST` | `/sessions/:id/sales` | Body: [`SaleBody`]; returns 201 + receipt |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_boxoffice::{SaleItem, SessionSeatMap};
use marquee_core::{
  seat::SeatId,
  store::CinemaStore,
  ticket::{FareClass, Ticket},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Seat views ───────────────────────────────────────────────────────────────

/// `GET /sessions/:id/seats`
pub async fn seat_map<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionSeatMap>, ApiError>
where
  S: CinemaStore,
{
  Ok(Json(state.office.seat_map(id).await?))
}

/// `GET /sessions/:id/seats/occupied` — seat ids as strings, row-major.
pub async fn occupied<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<SeatId>>, ApiError>
where
  S: CinemaStore,
{
  Ok(Json(state.office.occupied_seats(id).await?))
}

/// `GET /sessions/:id/tickets`
pub async fn tickets<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Ticket>>, ApiError>
where
  S: CinemaStore,
{
  Ok(Json(state.office.tickets(id).await?))
}

// ─── Submit a sale ────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /sessions/:id/sales`.
#[derive(Debug, Deserialize)]
pub struct SaleBody {
  pub seats: Vec<SaleSeat>,
}

/// One requested seat: `{"seat":"B2","fare":"HALF"}`.
#[derive(Debug, Deserialize)]
pub struct SaleSeat {
  pub seat: String,
  pub fare: FareClass,
}

/// `POST /sessions/:id/sales` — returns 201 + the
/// [`SaleReceipt`](marquee_boxoffice::SaleReceipt).
///
/// Seat ids are parsed here so a malformed one is a 400 naming the bad
/// seat, before the request reaches the engine.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SaleBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CinemaStore,
{
  let items = body
    .seats
    .into_iter()
    .map(|s| {
      let seat = s
        .seat
        .parse::<SeatId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
      Ok(SaleItem { seat, fare: s.fare })
    })
    .collect::<Result<Vec<_>, ApiError>>()?;

  let receipt = state.office.submit_sale(id, &items).await?;
  Ok((StatusCode::CREATED, Json(receipt)))
}
