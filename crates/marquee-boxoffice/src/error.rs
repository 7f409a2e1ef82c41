//! Error type for `marquee-boxoffice`.

use marquee_core::seat::SeatId;
use thiserror::Error;
use uuid::Uuid;

/// Everything that can stop a sale or an occupancy read.
///
/// The validation variants appear in the order `submit_sale` checks them;
/// the first failure wins and nothing after it runs.
#[derive(Debug, Error)]
pub enum Error {
  #[error("sale request contains no seats")]
  EmptyRequest,

  #[error("seat {seat} appears more than once in the request")]
  DuplicateSeat { seat: SeatId },

  #[error("session not found: {0}")]
  SessionNotFound(Uuid),

  #[error("room not found: {0}")]
  RoomNotFound(Uuid),

  #[error("movie not found: {0}")]
  MovieNotFound(Uuid),

  /// A capacity defect in the catalog (zero or beyond `Z10`), or any other
  /// seat-arithmetic failure.
  #[error(transparent)]
  Layout(#[from] marquee_core::Error),

  /// A well-formed seat that this room's layout does not contain.
  #[error("seat {seat} is not part of this room's layout")]
  UnknownSeat { seat: SeatId },

  #[error("seats already sold: {}", seats_csv(.conflicting))]
  SeatsAlreadySold { conflicting: Vec<SeatId> },

  /// Storage refused or failed the commit; the ledger was left at its
  /// pre-call state.
  #[error("ticket persistence failed: {0}")]
  CommitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Storage already held a ticket the ledger did not know about. The
  /// in-memory check passed, so another writer got behind this process.
  #[error("storage already holds a ticket for seat {seat}; ledger and storage disagree")]
  StorageDisagrees { seat: SeatId },

  /// A storage fault outside the commit path (hydration, catalog reads).
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn seats_csv(seats: &[SeatId]) -> String {
  seats.iter().map(SeatId::to_string).collect::<Vec<_>>().join(", ")
}
