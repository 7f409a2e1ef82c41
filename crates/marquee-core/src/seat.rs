//! Seat identity and seat-map arithmetic.
//!
//! A room's seat layout is fully determined by its capacity: seats fill rows
//! of ten (`A1..A10`, then `B1..B10`, …) up to row `Z`, and the final row
//! holds whatever remainder is left. The map is never stored; membership is
//! decided arithmetically from the capacity, and the full sequence is only
//! materialised for display.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Seats per row. Rows shorter than this occur only as the final,
/// partially-filled row of a map.
pub const COLUMNS_PER_ROW: u32 = 10;
/// Rows are lettered `A..=Z`.
pub const MAX_ROWS: u32 = 26;
/// The largest capacity addressable by the `A1..Z10` naming scheme.
pub const MAX_CAPACITY: u32 = COLUMNS_PER_ROW * MAX_ROWS;

// ─── SeatId ──────────────────────────────────────────────────────────────────

/// One seat in a room, e.g. `A1` or `J10`.
///
/// The row letter `A..=Z` is stored as a 0-based index and the column as its
/// 1-based number. Out-of-range values are unrepresentable: every constructor
/// is checked. The derived order is row-major with numeric columns, so
/// `A2 < A10 < B1` (never the lexicographic order of the text form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
  row: u8,
  col: u8,
}

impl SeatId {
  /// Checked constructor from a 0-based row index and a 1-based column
  /// number. Returns `None` outside the `A1..Z10` universe.
  pub fn new(row: u32, col: u32) -> Option<Self> {
    if row < MAX_ROWS && (1..=COLUMNS_PER_ROW).contains(&col) {
      Some(Self { row: row as u8, col: col as u8 })
    } else {
      None
    }
  }

  fn from_index(index: u32) -> Option<Self> {
    if index < MAX_CAPACITY {
      Some(Self {
        row: (index / COLUMNS_PER_ROW) as u8,
        col: (index % COLUMNS_PER_ROW + 1) as u8,
      })
    } else {
      None
    }
  }

  /// The seat's 0-based position in row-major order (`A1` is 0, `B1` is 10).
  pub fn index(self) -> u32 {
    u32::from(self.row) * COLUMNS_PER_ROW + u32::from(self.col) - 1
  }

  /// The row letter, `'A'..='Z'`.
  pub fn row_letter(self) -> char {
    (b'A' + self.row) as char
  }

  /// The 1-based column number, `1..=10`.
  pub fn column(self) -> u32 {
    u32::from(self.col)
  }
}

impl fmt::Display for SeatId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.row_letter(), self.col)
  }
}

impl FromStr for SeatId {
  type Err = Error;

  /// Parses the canonical text form only: one uppercase row letter followed
  /// by the column number without leading zeros (`"A1"`, `"J10"`).
  fn from_str(s: &str) -> Result<Self> {
    let malformed = || Error::MalformedSeatId(s.to_owned());

    let row_char = s.chars().next().ok_or_else(malformed)?;
    if !row_char.is_ascii_uppercase() {
      return Err(malformed());
    }
    let digits = &s[1..];
    if digits.is_empty()
      || digits.starts_with('0')
      || !digits.bytes().all(|b| b.is_ascii_digit())
    {
      return Err(malformed());
    }
    let col: u32 = digits.parse().map_err(|_| malformed())?;
    SeatId::new(u32::from(row_char as u8 - b'A'), col).ok_or_else(malformed)
  }
}

// Seats cross the wire and the database in their text form, not as a struct.
impl Serialize for SeatId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for SeatId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Seat maps ───────────────────────────────────────────────────────────────

fn check_capacity(capacity: u32) -> Result<()> {
  if capacity == 0 {
    return Err(Error::InvalidCapacity(capacity));
  }
  if capacity > MAX_CAPACITY {
    return Err(Error::CapacityOverflow(capacity));
  }
  Ok(())
}

/// The full seat map for a room of `capacity` seats, in row-major order.
///
/// Deterministic: the same capacity always yields the same sequence, with
/// exactly `capacity` distinct seats and `A1` first.
pub fn seat_map(capacity: u32) -> Result<Vec<SeatId>> {
  check_capacity(capacity)?;
  // `from_index` cannot fail below MAX_CAPACITY, which `check_capacity`
  // just established.
  Ok((0..capacity).filter_map(SeatId::from_index).collect())
}

/// Whether `seat` belongs to the map of a room of `capacity` seats,
/// decided by arithmetic on the seat's row-major position.
///
/// Agrees with [`seat_map`] for every capacity/seat pair.
pub fn seat_in_layout(seat: SeatId, capacity: u32) -> Result<bool> {
  check_capacity(capacity)?;
  Ok(seat.index() < capacity)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
