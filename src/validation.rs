//! Client-side gatekeeping for candidate messages.
//!
//! Lengths are counted in Unicode scalar values after trimming leading and
//! trailing whitespace.

use crate::error::ValidationError;

/// Smallest accepted trimmed length.
pub const MIN_MESSAGE_CHARS: usize = 5;

/// Largest accepted trimmed length.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Trimmed length at which the form-progress bar is full.
const PROGRESS_FULL_CHARS: usize = 50;

/// Counter turns orange above this raw length.
const COUNTER_WARNING_ABOVE: usize = 4000;

/// Counter turns red above this raw length.
const COUNTER_DANGER_ABOVE: usize = 4500;

/// Validate a raw message, returning the trimmed text on success.
///
/// ```
/// use safeguard::error::ValidationError;
/// use safeguard::validation::validate_message;
///
/// assert_eq!(validate_message("  hello  "), Ok("hello"));
/// assert_eq!(validate_message("   hi   "), Err(ValidationError::TooShort));
/// assert_eq!(validate_message(" \n\t "), Err(ValidationError::EmptyMessage));
/// ```
pub fn validate_message(raw: &str) -> Result<&str, ValidationError> {
    let message = raw.trim();
    let len = message.chars().count();

    if len == 0 {
        return Err(ValidationError::EmptyMessage);
    }
    if len < MIN_MESSAGE_CHARS {
        return Err(ValidationError::TooShort);
    }
    if len > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong);
    }

    Ok(message)
}

/// Colour band of the live character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTone {
    Muted,
    Warning,
    Danger,
}

impl CounterTone {
    /// Band for a raw (untrimmed) character count.
    pub fn for_count(count: usize) -> Self {
        if count > COUNTER_DANGER_ABOVE {
            CounterTone::Danger
        } else if count > COUNTER_WARNING_ABOVE {
            CounterTone::Warning
        } else {
            CounterTone::Muted
        }
    }

    /// CSS class applied to the counter element.
    pub fn css_class(&self) -> &'static str {
        match self {
            CounterTone::Muted => "count-muted",
            CounterTone::Warning => "count-warning",
            CounterTone::Danger => "count-danger",
        }
    }
}

/// Snapshot of the character counter for a raw input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub tone: CounterTone,
}

impl CharCount {
    pub fn of(raw: &str) -> Self {
        let count = raw.chars().count();
        Self {
            count,
            tone: CounterTone::for_count(count),
        }
    }
}

/// Percentage of the form-progress bar, or `None` when nothing is typed.
pub fn form_progress(raw: &str) -> Option<u8> {
    let len = raw.trim().chars().count();
    if len == 0 {
        return None;
    }
    let percent = (len * 100 / PROGRESS_FULL_CHARS).min(100);
    Some(percent as u8)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn padding() -> impl Strategy<Value = String> {
        "[ \t\n]{0,8}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any trimmed length within the accepted range passes and the
        /// returned text is the trimmed input.
        #[test]
        fn prop_in_range_passes(
            len in MIN_MESSAGE_CHARS..=MAX_MESSAGE_CHARS,
            pre in padding(),
            post in padding(),
        ) {
            let body = "x".repeat(len);
            let raw = format!("{}{}{}", pre, body, post);
            prop_assert_eq!(validate_message(&raw), Ok(body.as_str()));
        }

        #[test]
        fn prop_short_fails(len in 1usize..MIN_MESSAGE_CHARS, pre in padding(), post in padding()) {
            let raw = format!("{}{}{}", pre, "y".repeat(len), post);
            prop_assert_eq!(validate_message(&raw), Err(ValidationError::TooShort));
        }

        #[test]
        fn prop_long_fails(extra in 1usize..200, pre in padding(), post in padding()) {
            let raw = format!("{}{}{}", pre, "z".repeat(MAX_MESSAGE_CHARS + extra), post);
            prop_assert_eq!(validate_message(&raw), Err(ValidationError::TooLong));
        }

        #[test]
        fn prop_whitespace_only_is_empty(raw in padding()) {
            prop_assert_eq!(validate_message(&raw), Err(ValidationError::EmptyMessage));
        }

        #[test]
        fn prop_progress_never_exceeds_full(raw in ".{0,300}") {
            if let Some(percent) = form_progress(&raw) {
                prop_assert!(percent <= 100);
            }
        }
    }
}
