//! Cornershop UI - the client's view-controller.
//!
//! # Architecture
//!
//! The browser original was one event-driven view-controller: handlers
//! call the backend, then re-render the relevant screen section. This
//! crate keeps that shape but makes every implicit piece explicit:
//!
//! - [`views`] - the six-view switcher with role gating
//! - [`render`] - typed view models rendered through askama templates
//!   (auto-escaped; no string-spliced HTML)
//! - [`payment`] - input masking and the three regex guards for checkout
//! - [`scheduler`] - the single cancellable timer abstraction behind
//!   notice auto-hide and the post-checkout navigation delay
//! - [`shell`] - the controller gluing the API client, session store,
//!   view state, and current page together
//!
//! A host (the terminal driver, or a test) feeds the shell user actions
//! and drains its [`scheduler::TimedEvent`] channel, then reads the
//! rendered [`shell::Page`] back out.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod notice;
pub mod payment;
pub mod render;
pub mod scheduler;
pub mod shell;
pub mod views;

pub use error::ShellError;
pub use notice::{Notice, NoticeKind};
pub use payment::{CardDetails, PaymentMethod};
pub use scheduler::{Scheduler, TimedEvent, TimerSlot};
pub use shell::{DocumentSurface, Page, Shell, ShellOptions};
pub use views::{View, ViewState};
