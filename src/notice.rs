//! Transient notices shown inline or as toasts.

use std::time::Duration;

/// Inline validation errors stay up this long.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Success toasts stay up this long.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Fade/slide-out duration before a notice is removed.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

impl NoticeKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Error => "notice-error",
            NoticeKind::Success => "notice-success",
        }
    }

    /// Font Awesome icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Error => "exclamation-triangle",
            NoticeKind::Success => "check-circle",
        }
    }
}

/// A dismissible message with a fixed lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub dismiss_after: Duration,
    pub exit_transition: Duration,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            dismiss_after: ERROR_DISMISS_AFTER,
            exit_transition: EXIT_TRANSITION,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            dismiss_after: SUCCESS_DISMISS_AFTER,
            exit_transition: EXIT_TRANSITION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notice_dismisses_after_five_seconds() {
        let notice = Notice::error("bad input");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.dismiss_after, Duration::from_secs(5));
        assert_eq!(notice.exit_transition, Duration::from_millis(300));
    }

    #[test]
    fn success_notice_dismisses_after_three_seconds() {
        let notice = Notice::success("done");
        assert_eq!(notice.dismiss_after, Duration::from_secs(3));
        assert_eq!(notice.kind.icon(), "check-circle");
    }

    #[test]
    fn kinds_have_distinct_icons() {
        assert_eq!(NoticeKind::Error.icon(), "exclamation-triangle");
        assert_eq!(NoticeKind::Success.icon(), "check-circle");
        assert_ne!(NoticeKind::Error.css_class(), NoticeKind::Success.css_class());
    }
}
