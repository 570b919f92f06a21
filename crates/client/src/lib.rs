//! Cornershop REST client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] method per backend endpoint, nothing more: the
//!   backend is the sole source of truth, so there is no local cache and
//!   every mutation is followed by a fresh fetch at the call site.
//! - Writes are form-encoded; the session token rides along as a
//!   `session_id` query parameter on every authenticated call.
//! - Error bodies carry a `detail` field which is surfaced verbatim when
//!   present ([`ApiError::Api`]).
//! - [`SessionStore`] persists the token and user record as two files,
//!   the way the browser build kept two local-storage keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use cornershop_client::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config);
//!
//! let login = api.login("customer@example.com", &password).await?;
//! let cart = api.cart(&login.session_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
pub mod config;
pub mod session;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use session::{Session, SessionStore, SessionStoreError};
