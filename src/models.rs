//! Core data models for SafeGuard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification label assigned to an analyzed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Safe,
    Spam,
    Scam,
    #[serde(other)]
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "Safe",
            Verdict::Spam => "Spam",
            Verdict::Scam => "Scam",
            Verdict::Unknown => "Unknown",
        }
    }

    /// CSS modifier used by the result page.
    pub fn css_class(&self) -> &'static str {
        match self {
            Verdict::Safe => "verdict-safe",
            Verdict::Spam => "verdict-spam",
            Verdict::Scam => "verdict-scam",
            Verdict::Unknown => "verdict-unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classifier output before risk scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    /// Classifier certainty in `0.0..=1.0`.
    pub confidence: f64,
}

/// Outcome of analysing one message, as rendered on the result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Fraud likelihood, 0-100.
    pub risk_score: u8,
    /// Classifier certainty in `0.0..=1.0`.
    pub confidence: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub detected_language: String,
    pub message: String,
    #[serde(default)]
    pub translated_text: Option<String>,
}

impl AnalysisResult {
    /// Confidence as the percentage shown on the result page, one decimal.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}", self.confidence.clamp(0.0, 1.0) * 100.0)
    }
}
