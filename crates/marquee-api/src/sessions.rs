//! Handlers for `/sessions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/sessions` | All sessions, soonest first |
//! | `POST`   | `/sessions` | Body: [`NewSession`]; 404 if movie/room missing |
//! | `GET`    | `/sessions/:id` | 404 if not found |
//! | `DELETE` | `/sessions/:id` | 204; 409 once tickets have been sold |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_core::{
  catalog::{NewSession, Session},
  store::{CinemaStore, Removal},
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /sessions`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Session>>, ApiError>
where
  S: CinemaStore,
{
  let sessions = state
    .store
    .list_sessions()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(sessions))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /sessions` — returns 201 + the stored [`Session`].
///
/// The referenced movie and room are looked up first so a dangling id comes
/// back as a 404 naming the missing row, not as a foreign-key error.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CinemaStore,
{
  state
    .store
    .get_movie(body.movie_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("movie {} not found", body.movie_id))
    })?;
  state
    .store
    .get_room(body.room_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("room {} not found", body.room_id))
    })?;

  let session = state
    .store
    .add_session(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(session)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /sessions/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError>
where
  S: CinemaStore,
{
  let session = state
    .store
    .get_session(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))?;
  Ok(Json(session))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /sessions/:id` — refused once tickets have been sold for it.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CinemaStore,
{
  let removal = state
    .store
    .remove_session(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  match removal {
    Removal::Removed => Ok(StatusCode::NO_CONTENT),
    Removal::NotFound => {
      Err(ApiError::NotFound(format!("session {id} not found")))
    }
    Removal::Referenced => Err(ApiError::Conflict(format!(
      "session {id} has sold tickets"
    ))),
  }
}
