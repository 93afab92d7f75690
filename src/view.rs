//! View adapters: the only surface the controller touches.
//!
//! Pages implement these traits; tests implement them with plain structs.

use crate::controller::ProgressStep;
use crate::models::AnalysisResult;
use crate::notice::Notice;
use crate::report::ReportFile;
use crate::validation::CharCount;

/// The message form.
pub trait MessageInput {
    /// Current raw value of the message field.
    fn message(&self) -> String;

    fn set_message(&mut self, value: String);

    fn focus(&mut self);

    /// Replace any inline notice with `notice`.
    fn show_notice(&mut self, notice: Notice);

    fn clear_notice(&mut self);

    fn set_char_count(&mut self, count: CharCount);

    /// `None` removes the indicator.
    fn set_form_progress(&mut self, percent: Option<u8>);

    /// Attach the blocking progress indicator. It stays hidden until the
    /// form is submitted and covers the page until the response arrives.
    fn attach_progress(&mut self, steps: &[ProgressStep]);
}

/// Read access to a rendered analysis result.
///
/// Every getter is optional; absent elements are not an error.
pub trait ResultView {
    fn verdict_title(&self) -> Option<String>;
    fn risk_percentage(&self) -> Option<String>;
    fn confidence_percentage(&self) -> Option<String>;
    /// Detected language.
    fn detail_value(&self) -> Option<String>;
    fn message_text(&self) -> Option<String>;
    fn reason_items(&self) -> Vec<String>;
}

/// Where a generated report ends up.
pub trait DownloadSink {
    fn offer_download(&mut self, file: ReportFile);
    fn show_toast(&mut self, notice: Notice);
}

/// Plain field bag implementing [`ResultView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFields {
    pub verdict: Option<String>,
    pub risk: Option<String>,
    pub confidence: Option<String>,
    pub language: Option<String>,
    pub message: Option<String>,
    pub reasons: Vec<String>,
}

impl From<&AnalysisResult> for ResultFields {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            verdict: Some(result.verdict.to_string()),
            risk: Some(result.risk_score.to_string()),
            confidence: Some(result.confidence_percent()),
            language: Some(result.detected_language.clone()),
            message: Some(result.message.clone()),
            reasons: result.reasons.clone(),
        }
    }
}

impl ResultView for ResultFields {
    fn verdict_title(&self) -> Option<String> {
        self.verdict.clone()
    }

    fn risk_percentage(&self) -> Option<String> {
        self.risk.clone()
    }

    fn confidence_percentage(&self) -> Option<String> {
        self.confidence.clone()
    }

    fn detail_value(&self) -> Option<String> {
        self.language.clone()
    }

    fn message_text(&self) -> Option<String> {
        self.message.clone()
    }

    fn reason_items(&self) -> Vec<String> {
        self.reasons.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    #[test]
    fn result_fields_mirror_rendered_result() {
        let result = AnalysisResult {
            verdict: Verdict::Scam,
            risk_score: 97,
            confidence: 0.9,
            reasons: vec!["one".to_string(), "two".to_string()],
            detected_language: "en".to_string(),
            message: "URGENT: verify now".to_string(),
            translated_text: None,
        };
        let fields = ResultFields::from(&result);

        assert_eq!(fields.verdict_title().as_deref(), Some("Scam"));
        assert_eq!(fields.risk_percentage().as_deref(), Some("97"));
        assert_eq!(fields.confidence_percentage().as_deref(), Some("90.0"));
        assert_eq!(fields.detail_value().as_deref(), Some("en"));
        assert_eq!(fields.reason_items(), vec!["one", "two"]);
    }

    #[test]
    fn default_fields_are_all_absent() {
        let fields = ResultFields::default();
        assert!(fields.verdict_title().is_none());
        assert!(fields.message_text().is_none());
        assert!(fields.reason_items().is_empty());
    }
}
