//! # HiTunes Analytics Engine
//!
//! This crate turns grouped aggregate rows (spend per customer, purchases per
//! genre, customers per country) into the ranked results the data-access layer
//! returns.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   database. It depends only on `core-types` (Layer 0).
//! - **Explicit ranking:** Ties are resolved here with documented rules, never
//!   by trusting the row order of an `ORDER BY ... LIMIT 1` query.
//!   - top spender: highest total, then lowest customer id
//!   - top genre: every genre sharing the highest count
//!   - top country: highest count, then smallest country name
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The stateless ranking calculator.
//! - `SpendTotal`, `GenreCount`, `CountryCount`: The aggregate rows it ranks.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

pub mod aggregates;
pub mod engine;
pub mod error;

pub use aggregates::{CountryCount, GenreCount, SpendTotal};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
