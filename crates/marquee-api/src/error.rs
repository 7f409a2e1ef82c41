//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use marquee_boxoffice::Error as SaleError;
use marquee_core::seat::SeatId;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every error renders as `{"error": <message>, "kind": <token>}`; seat
/// conflicts additionally carry the `conflicting` seat list.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("seats already sold")]
  SeatsTaken { conflicting: Vec<SeatId> },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  fn kind(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Conflict(_) => "conflict",
      ApiError::SeatsTaken { .. } => "seats_already_sold",
      ApiError::Store(_) => "internal",
    }
  }
}

impl From<SaleError> for ApiError {
  fn from(err: SaleError) -> Self {
    let message = err.to_string();
    match err {
      SaleError::EmptyRequest
      | SaleError::DuplicateSeat { .. }
      | SaleError::UnknownSeat { .. } => ApiError::BadRequest(message),
      SaleError::SessionNotFound(_) => ApiError::NotFound(message),
      SaleError::SeatsAlreadySold { conflicting } => {
        ApiError::SeatsTaken { conflicting }
      }
      // Referential defects, layout defects, and storage faults are all
      // server-side errors.
      other => ApiError::Store(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let kind = self.kind();
    let (status, body) = match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, json!({ "error": m, "kind": kind }))
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!({ "error": m, "kind": kind }))
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, json!({ "error": m, "kind": kind }))
      }
      ApiError::SeatsTaken { conflicting } => {
        let seats: Vec<String> =
          conflicting.iter().map(ToString::to_string).collect();
        (
          StatusCode::CONFLICT,
          json!({
            "error":       format!("seats already sold: {}", seats.join(", ")),
            "kind":        kind,
            "conflicting": seats,
          }),
        )
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": e.to_string(), "kind": kind }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
