//! # HiTunes Database Crate
//!
//! The customer data-access layer over the Chinook music-store schema in
//! PostgreSQL (`customer`, `invoice`, `invoice_line`, `track`, `genre`).
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates every SQL statement. Callers
//!   see domain types from `core-types` and a single error type, `DbError`.
//! - **Bound parameters only:** Caller-supplied values (ids, names, page
//!   bounds) are always bound, never spliced into query text.
//! - **One connection per call:** Every operation acquires a pooled connection
//!   from the `ConnectionProvider` and returns it when the call ends, on every
//!   exit path.
//! - **No placeholders for failures:** An empty collection is only ever a real
//!   answer. Failures travel through `DbError`.
//!
//! ## Public API
//!
//! - `ConnectionProvider`: Builds the pool from `DatabaseSettings` and hands out connections.
//! - `CustomerRepository`: CRUD, pagination and the analytic queries
//!   (`get_top_spender`, `get_top_genre`, `get_top_country`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod mapper;
pub mod queries;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::ConnectionProvider;
pub use error::DbError;
pub use repository::CustomerRepository;
