//! Foundation types for burrow.
//!
//! This crate contains the types shared by every burrow crate: the
//! [`Address`](address::Address) of a Gopher resource, hostname validation,
//! and the crate-wide error type.

pub mod address;
pub mod error;

pub use address::{Address, DEFAULT_PORT, is_valid_hostname};
pub use error::{BurrowError, Result};
