//! Cornershop Core - Shared types library.
//!
//! This crate provides common types used across all Cornershop components:
//! - `client` - Typed REST client and session store
//! - `ui` - View-controller and renderers
//! - `cli` - Interactive terminal driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! records themselves live next to the API client; this crate holds the
//! vocabulary they are written in: newtype IDs, the session token, email,
//! statuses, money formatting, and the backend's date formats.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
