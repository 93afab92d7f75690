//! Binds validation and report generation to the view adapters.
//!
//! This is the single place where the pure pieces meet a page.

use std::time::Duration;

use chrono::{DateTime, TimeZone};

use crate::error::ValidationError;
use crate::notice::Notice;
use crate::report::Report;
use crate::samples::{example_text, ExampleKind, ExampleSource};
use crate::validation::{form_progress, validate_message, CharCount};
use crate::view::{DownloadSink, MessageInput, ResultView};

/// Delay between progress-step highlights.
pub const STEP_INTERVAL: Duration = Duration::from_millis(800);

const DOWNLOAD_NOTICE: &str = "Report downloaded successfully!";

/// One stage shown on the blocking progress overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub title: &'static str,
    pub icon: &'static str,
}

pub const PROGRESS_STEPS: [ProgressStep; 4] = [
    ProgressStep {
        title: "Detecting Language",
        icon: "language",
    },
    ProgressStep {
        title: "AI Analysis",
        icon: "brain",
    },
    ProgressStep {
        title: "Security Check",
        icon: "shield-alt",
    },
    ProgressStep {
        title: "Risk Assessment",
        icon: "chart-line",
    },
];

/// What happened to a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Carries the trimmed message to send.
    Accepted(String),
    Rejected(ValidationError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormController;

impl FormController {
    pub fn new() -> Self {
        Self
    }

    /// Prepare a form for display: attach the progress steps and bring the
    /// counters in line with the current value.
    pub fn open(&self, input: &mut impl MessageInput) {
        input.attach_progress(&PROGRESS_STEPS);
        self.input_changed(input);
    }

    /// Gate a submission on the current input value.
    pub fn submit(&self, input: &mut impl MessageInput) -> SubmitOutcome {
        let raw = input.message();
        match validate_message(&raw) {
            Ok(message) => SubmitOutcome::Accepted(message.to_string()),
            Err(err) => {
                tracing::debug!(reason = err.code(), "Submission rejected");
                input.show_notice(Notice::error(err.user_message()));
                input.focus();
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// New input clears stale errors and refreshes the counters.
    pub fn input_changed(&self, input: &mut impl MessageInput) {
        input.clear_notice();
        refresh_counters(input);
    }

    pub fn clear(&self, input: &mut impl MessageInput) {
        input.set_message(String::new());
        input.focus();
        input.clear_notice();
        refresh_counters(input);
    }

    pub fn load_example(
        &self,
        input: &mut impl MessageInput,
        kind: ExampleKind,
        source: ExampleSource,
    ) {
        input.set_message(example_text(kind, source).to_string());
        input.focus();
        refresh_counters(input);
    }
}

fn refresh_counters(input: &mut impl MessageInput) {
    let raw = input.message();
    input.set_char_count(CharCount::of(&raw));
    input.set_form_progress(form_progress(&raw));
}

/// Generate a report from `view` and offer it through `sink`.
pub fn download_report<Tz: TimeZone>(
    view: &impl ResultView,
    sink: &mut impl DownloadSink,
    now: DateTime<Tz>,
) {
    let file = Report::from_view(view, now).into_file();
    tracing::debug!(file_name = %file.file_name, bytes = file.contents.len(), "Report generated");
    sink.offer_download(file);
    sink.show_toast(Notice::success(DOWNLOAD_NOTICE));
}
