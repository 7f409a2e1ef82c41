//! Handlers for `/rooms` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/rooms` | All rooms, by display number |
//! | `POST`   | `/rooms` | Body: [`NewRoom`]; returns 201 + stored room |
//! | `GET`    | `/rooms/:id` | 404 if not found |
//! | `DELETE` | `/rooms/:id` | 204; 409 while sessions reference the room |
//!
//! A room's capacity is taken at face value here; capacities outside the
//! `A1..Z10` layout are only rejected when a sale or seat-map view touches
//! the room.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_core::{
  catalog::{NewRoom, Room},
  store::{CinemaStore, Removal},
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /rooms`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Room>>, ApiError>
where
  S: CinemaStore,
{
  let rooms = state
    .store
    .list_rooms()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rooms))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /rooms` — returns 201 + the stored [`Room`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewRoom>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CinemaStore,
{
  let room = state
    .store
    .add_room(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(room)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /rooms/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError>
where
  S: CinemaStore,
{
  let room = state
    .store
    .get_room(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("room {id} not found")))?;
  Ok(Json(room))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /rooms/:id` — refused while sessions still reference the room.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CinemaStore,
{
  let removal = state
    .store
    .remove_room(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  match removal {
    Removal::Removed => Ok(StatusCode::NO_CONTENT),
    Removal::NotFound => Err(ApiError::NotFound(format!("room {id} not found"))),
    Removal::Referenced => Err(ApiError::Conflict(format!(
      "room {id} is referenced by sessions"
    ))),
  }
}
