//! Core types for Cornershop.
//!
//! Type-safe wrappers for the domain concepts every crate shares.

pub mod datetime;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::format_usd;
pub use status::*;
