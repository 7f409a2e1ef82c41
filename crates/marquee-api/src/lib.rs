//! JSON REST API for Marquee.
//!
//! Exposes an axum [`Router`] backed by any [`marquee_core::store::CinemaStore`].
//! Catalog routes talk to the store directly; seat and sale routes go through
//! the [`BoxOffice`] so every ticket passes the reservation ledger. Auth, TLS,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", marquee_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod movies;
pub mod rooms;
pub mod sales;
pub mod sessions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use marquee_boxoffice::BoxOffice;
use marquee_core::store::CinemaStore;

pub use error::ApiError;

/// Shared handler state: the catalog store and the sale engine on top of it.
pub struct ApiState<S> {
  store:  Arc<S>,
  office: Arc<BoxOffice<S>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), office: self.office.clone() }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. One [`BoxOffice`] is built here and lives as long
/// as the router, so all sales in the process share one ledger.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CinemaStore + 'static,
{
  let state = ApiState {
    office: Arc::new(BoxOffice::new(store.clone())),
    store,
  };
  Router::new()
    // Movies
    .route("/movies", get(movies::list::<S>).post(movies::create::<S>))
    .route(
      "/movies/{id}",
      get(movies::get_one::<S>).delete(movies::delete_one::<S>),
    )
    // Rooms
    .route("/rooms", get(rooms::list::<S>).post(rooms::create::<S>))
    .route(
      "/rooms/{id}",
      get(rooms::get_one::<S>).delete(rooms::delete_one::<S>),
    )
    // Sessions
    .route("/sessions", get(sessions::list::<S>).post(sessions::create::<S>))
    .route(
      "/sessions/{id}",
      get(sessions::get_one::<S>).delete(sessions::delete_one::<S>),
    )
    // Seats and sales
    .route("/sessions/{id}/seats", get(sales::seat_map::<S>))
    .route("/sessions/{id}/seats/occupied", get(sales::occupied::<S>))
    .route("/sessions/{id}/tickets", get(sales::tickets::<S>))
    .route("/sessions/{id}/sales", post(sales::create::<S>))
    .with_state(state)
}
