//! Shell-level errors.
//!
//! Backend failures never surface as `Err` from shell handlers - they are
//! reduced to notices, leaving the page in its last-rendered state. What
//! remains here are the failures a host genuinely cannot continue past.

use thiserror::Error;

/// Errors a shell handler can return to its host.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A template failed to render.
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
}

/// Result type alias for `ShellError`.
pub type Result<T> = std::result::Result<T, ShellError>;
