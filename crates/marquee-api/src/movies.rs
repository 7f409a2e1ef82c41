//! Handlers for `/movies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/movies` | All movies, oldest first |
//! | `POST`   | `/movies` | Body: [`NewMovie`]; returns 201 + stored movie |
//! | `GET`    | `/movies/:id` | 404 if not found |
//! | `DELETE` | `/movies/:id` | 204; 409 while sessions reference the movie |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_core::{
  catalog::{Movie, NewMovie},
  store::{CinemaStore, Removal},
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /movies`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Movie>>, ApiError>
where
  S: CinemaStore,
{
  let movies = state
    .store
    .list_movies()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(movies))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /movies` — returns 201 + the stored [`Movie`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewMovie>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CinemaStore,
{
  let movie = state
    .store
    .add_movie(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(movie)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /movies/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Movie>, ApiError>
where
  S: CinemaStore,
{
  let movie = state
    .store
    .get_movie(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("movie {id} not found")))?;
  Ok(Json(movie))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /movies/:id` — refused while sessions still reference the movie.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CinemaStore,
{
  let removal = state
    .store
    .remove_movie(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  match removal {
    Removal::Removed => Ok(StatusCode::NO_CONTENT),
    Removal::NotFound => {
      Err(ApiError::NotFound(format!("movie {id} not found")))
    }
    Removal::Referenced => Err(ApiError::Conflict(format!(
      "movie {id} is referenced by sessions"
    ))),
  }
}
