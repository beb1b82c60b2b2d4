//! # HiTunes Core Types
//!
//! The shared vocabulary of the customer data-access layer. Every other crate
//! speaks in these types: the database crate produces them, the analytics
//! crate ranks them, and the demo runner prints them.
//!
//! This is a pure crate. It performs no I/O.

pub mod error;
pub mod pagination;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use pagination::{CustomerPage, PageRequest};
pub use structs::{Customer, TopCountry, TopGenre, TopSpender};
