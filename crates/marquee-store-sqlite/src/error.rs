//! Error type for `marquee-store-sqlite`.
//!
//! Expected outcomes (a missing row, a seat already taken, a refused delete)
//! are *not* errors here — they travel as [`marquee_core::store::Removal`]
//! and [`marquee_core::store::TicketInsert`] values. This enum covers only
//! genuine faults: the database, or a row that no longer decodes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] marquee_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
