//! End-to-end tests for the Cornershop client.
//!
//! The real backend is out of scope, so flows run against [`TestBackend`],
//! an in-process stub that reproduces the REST contract over in-memory
//! state. Every test drives the real [`Shell`] and [`ApiClient`] - nothing
//! is mocked on the client side.
//!
//! # Test Categories
//!
//! - `storefront_flow` - customer journey: login, browse, cart, checkout,
//!   orders, receipt, logout
//! - `admin_flow` - admin journey: product editor, order status, invoices
//! - `checkout_validation` - payment guards block bad submissions locally

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedReceiver;

use cornershop_client::{ApiClient, ClientConfig, SessionStore};
use cornershop_ui::{Shell, ShellOptions, TimedEvent};

pub use backend::TestBackend;

/// Seeded customer credentials.
pub const CUSTOMER_EMAIL: &str = "customer@example.com";
pub const CUSTOMER_PASSWORD: &str = "password123";

/// Seeded admin credentials.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Fresh per-test session directory under the system temp dir.
fn unique_session_dir() -> PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("cornershop-itest-{}-{n}", std::process::id()))
}

/// A stub backend plus a shell and client wired to it.
pub struct TestContext {
    pub backend: TestBackend,
    pub shell: Shell,
    pub events: UnboundedReceiver<TimedEvent>,
    /// Direct API access, for asserting server-side effects.
    pub api: ApiClient,
    pub store: SessionStore,
}

impl TestContext {
    /// Spawn a seeded backend and a fresh shell pointed at it.
    pub async fn new() -> Self {
        let backend = TestBackend::spawn().await;
        let config = ClientConfig {
            api_url: backend.url(),
            session_dir: unique_session_dir(),
        };
        let api = ApiClient::new(&config);
        let store = SessionStore::new(config.session_dir.clone());
        let (mut shell, events) = Shell::new(api.clone(), store.clone(), ShellOptions::default());
        shell.start().await.expect("initial render");

        Self {
            backend,
            shell,
            events,
            api,
            store,
        }
    }

    /// Sign the shell in as the seeded customer.
    pub async fn login_customer(&mut self) {
        self.shell
            .login(CUSTOMER_EMAIL, SecretString::from(CUSTOMER_PASSWORD))
            .await
            .expect("customer login render");
    }

    /// Sign the shell in as the seeded admin.
    pub async fn login_admin(&mut self) {
        self.shell
            .login(ADMIN_EMAIL, SecretString::from(ADMIN_PASSWORD))
            .await
            .expect("admin login render");
    }
}
