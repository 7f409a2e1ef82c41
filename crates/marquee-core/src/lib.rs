//! Core types and trait definitions for the Marquee box-office service.
//!
//! Seat arithmetic, fares, catalog records, and the [`store::CinemaStore`]
//! trait live here, free of HTTP and database dependencies. Every other
//! crate in the workspace builds on this one.

pub mod catalog;
pub mod error;
pub mod seat;
pub mod store;
pub mod ticket;

pub use error::{Error, Result};
