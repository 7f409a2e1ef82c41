//! Tickets, fares, and money.
//!
//! A ticket is an immutable record of one sold seat. Tickets are never
//! updated or deleted; the set of tickets for a session *is* the session's
//! occupancy, and every other view of "sold" is derived from it.

use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result, seat::SeatId};

// ─── Fares ───────────────────────────────────────────────────────────────────

/// The two fares the box office sells. Wire form is `"FULL"` / `"HALF"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FareClass {
  Full,
  Half,
}

impl FareClass {
  /// The fixed price table: full fare 20.00, half fare 10.00.
  pub fn price(self) -> Money {
    match self {
      Self::Full => Money::from_units(20),
      Self::Half => Money::from_units(10),
    }
  }

  /// The discriminant string stored in the `fare` database column.
  pub fn discriminant(self) -> &'static str {
    match self {
      Self::Full => "full",
      Self::Half => "half",
    }
  }

  /// Inverse of [`discriminant`](Self::discriminant).
  pub fn from_discriminant(s: &str) -> Option<Self> {
    match s {
      "full" => Some(Self::Full),
      "half" => Some(Self::Half),
      _ => None,
    }
  }
}

// ─── Money ───────────────────────────────────────────────────────────────────

/// An exact amount of money, counted in cents.
///
/// Prices never touch floating point. The display and wire form is the
/// two-decimal string (`"20.00"`).
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Money(u64);

impl Money {
  pub const fn from_cents(cents: u64) -> Self {
    Self(cents)
  }

  /// Whole currency units: `from_units(20)` is `20.00`.
  pub const fn from_units(units: u64) -> Self {
    Self(units * 100)
  }

  pub const fn cents(self) -> u64 {
    self.0
  }
}

impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money {
    Money(self.0 + rhs.0)
  }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
    iter.fold(Money::default(), Add::add)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
  }
}

impl FromStr for Money {
  type Err = Error;

  /// Parses the canonical two-decimal form only (`"20.00"`, `"0.05"`).
  fn from_str(s: &str) -> Result<Self> {
    let malformed = || Error::MalformedMoney(s.to_owned());

    let (units, cents) = s.split_once('.').ok_or_else(malformed)?;
    if units.is_empty()
      || !units.bytes().all(|b| b.is_ascii_digit())
      || (units.len() > 1 && units.starts_with('0'))
      || cents.len() != 2
      || !cents.bytes().all(|b| b.is_ascii_digit())
    {
      return Err(malformed());
    }
    let units: u64 = units.parse().map_err(|_| malformed())?;
    let cents: u64 = cents.parse().map_err(|_| malformed())?;
    units
      .checked_mul(100)
      .and_then(|u| u.checked_add(cents))
      .map(Money)
      .ok_or_else(malformed)
  }
}

impl Serialize for Money {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Money {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Ticket ──────────────────────────────────────────────────────────────────

/// One sold seat. Once written, no field is ever updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
  pub ticket_id:  Uuid,
  pub session_id: Uuid,
  pub seat:       SeatId,
  pub fare:       FareClass,
  /// The fare's price at the time of sale, denormalised onto the ticket.
  pub price:      Money,
  /// Server-assigned; when the sale was committed.
  pub created_at: DateTime<Utc>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
