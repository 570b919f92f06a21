//! Transient notices (the toast bar).
//!
//! At most one notice is visible at a time; showing a new one replaces the
//! old and restarts the auto-hide timer through the scheduler, so a stale
//! timer can never clip a newer message.

use std::time::Duration;

/// How long a notice stays visible before auto-hiding.
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Visual flavor of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class used when the notice is rendered.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    /// Convenience constructor.
    #[must_use]
    pub fn new(text: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_classes() {
        assert_eq!(NoticeKind::Success.css_class(), "success");
        assert_eq!(NoticeKind::Error.css_class(), "error");
    }
}
