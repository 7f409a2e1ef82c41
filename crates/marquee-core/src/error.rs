//! Error types for `marquee-core`.

use thiserror::Error;

use crate::seat::MAX_CAPACITY;

#[derive(Debug, Error)]
pub enum Error {
  #[error("room capacity must be at least 1, got {0}")]
  InvalidCapacity(u32),

  #[error("room capacity {0} exceeds the A1..Z10 layout ({max} seats)", max = MAX_CAPACITY)]
  CapacityOverflow(u32),

  #[error("malformed seat id: {0:?}")]
  MalformedSeatId(String),

  #[error("malformed money amount: {0:?}")]
  MalformedMoney(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
