//! The Marquee reservation engine: seat ledger plus sale coordinator.
//!
//! Correctness comes in two layers. An in-memory ledger serialises commits
//! per session (sales for different sessions never contend) and persists
//! inside the critical section, so no sale succeeds without durable
//! confirmation. Underneath, the storage backend's `UNIQUE(session_id,
//! seat)` constraint catches anything that slips past the ledger — e.g. a
//! second process writing to the same database file — and the engine
//! reports that case as a distinct invariant failure, never as an ordinary
//! conflict.

pub mod error;
pub mod ledger;
pub mod sale;

pub use error::{Error, Result};
pub use sale::{BoxOffice, SaleItem, SaleReceipt, SeatStatus, SessionSeatMap};
