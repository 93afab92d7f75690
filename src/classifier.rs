//! Classification port and its two implementations.
//!
//! Inference proper lives elsewhere: [`RemoteClassifier`] forwards to a model
//! service, [`KeywordClassifier`] is a local heuristic used when none is
//! configured.

use std::time::Duration;

use async_trait::async_trait;
use regex::RegexSet;
use serde::Serialize;

use crate::config::KeywordConfig;
use crate::error::{Result, SafeguardError};
use crate::models::{AnalysisResult, Prediction, Verdict};
use crate::risk::{compute_risk, extract_urls, UrlCheck};
use crate::safe_browsing::SafeBrowsingClient;

/// Path of the detection endpoint on the model service.
const DETECT_PATH: &str = "/api/detect-scam";

/// Retry delay assumed when a 429 carries no `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Classifies an already-validated message.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, message: &str) -> Result<AnalysisResult>;

    /// Short name for logs and the health endpoint.
    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    message: &'a str,
}

/// Forwards messages to a remote model service.
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), DETECT_PATH),
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, message: &str) -> Result<AnalysisResult> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&DetectRequest { message })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            return Err(SafeguardError::RateLimited {
                retry_after_ms: retry_after * 1000,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SafeguardError::Classifier(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let result: AnalysisResult = serde_json::from_str(&body)?;
        tracing::debug!(
            verdict = %result.verdict,
            risk_score = result.risk_score,
            "Remote classification complete"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Weights of the offline heuristic.
const HIGH_RISK_WEIGHT: u32 = 15;
const MEDIUM_RISK_WEIGHT: u32 = 8;
const PATTERN_WEIGHT: u32 = 12;
const URGENCY_WEIGHT: u32 = 20;
const SPELLING_WEIGHT: u32 = 10;
const CAPS_WEIGHT: u32 = 15;
const PERSONAL_INFO_WEIGHT: u32 = 25;

const SCAM_THRESHOLD: u32 = 40;
const SPAM_THRESHOLD: u32 = 20;
const CAPS_RATIO: f64 = 0.3;

/// More spelling problems than this count against the message.
const SPELLING_TOLERANCE: u32 = 3;

/// Recommendation bands on the raw score.
const DANGER_SCORE: u32 = 50;
const CAUTION_SCORE: u32 = 30;

const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"bit\.ly",
    r"tinyurl",
    r"[a-z0-9]{10,}\.com",
    r"click.*here",
    r"verify.*account",
    r"\$\d+",
    r"\d{4}-\d{4}-\d{4}-\d{4}",
];

const PERSONAL_INFO_PATTERNS: &[&str] = &[
    r"social security",
    r"\bssn\b",
    r"credit card",
    r"bank account",
    r"routing number",
    r"password",
    r"pin number",
];

/// Quality checks other than misspellings: missing space after sentence
/// punctuation, and runs of `!`/`?`.
const SLOPPY_PATTERNS: &[&str] = &[r"[.!?][a-zA-Z]", r"[!?]{2,}"];

const COMMON_MISSPELLINGS: &[&str] = &[
    "recieve",
    "seperate",
    "occured",
    "definately",
    "goverment",
];

const URGENCY_WORDS: &[&str] = &[
    "urgent",
    "immediately",
    "asap",
    "expires",
    "limited time",
    "act now",
];

const PERSONAL_INFO_FACTOR: &str = "Requests personal/financial information";
const URGENCY_FACTOR: &str = "Multiple urgency indicators";

/// Raw heuristic score and the factors that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u32,
    pub risk_factors: Vec<String>,
}

impl Assessment {
    /// Advice for the reader, strongest first.
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut advice = if self.score >= DANGER_SCORE {
            vec![
                "🚨 DO NOT respond to this message",
                "🚨 DO NOT click any links",
                "🚨 DO NOT provide personal information",
                "🚨 Report as spam/scam immediately",
            ]
        } else if self.score >= CAUTION_SCORE {
            vec![
                "⚠️ Verify sender through official channels",
                "⚠️ Do not click links or download attachments",
                "⚠️ Be cautious of any requests for information",
            ]
        } else {
            vec![
                "✅ Content appears safe",
                "✅ Still verify sender if unknown",
                "✅ Use caution with any financial requests",
            ]
        };

        if self.risk_factors.iter().any(|f| f == PERSONAL_INFO_FACTOR) {
            advice.push("🔒 Never share personal/financial info via email");
        }
        if self.risk_factors.iter().any(|f| f == URGENCY_FACTOR) {
            advice.push("⏰ Legitimate organizations don't create false urgency");
        }
        advice
    }
}

/// Count sloppy-writing signals in `text`.
fn spelling_errors(text: &str, sloppy: &RegexSet) -> u32 {
    let mut errors = sloppy.matches(text).iter().count() as u32;

    // The same character three times in a row, e.g. "sooo".
    let chars: Vec<char> = text.chars().collect();
    if chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        errors += 1;
    }

    let lowered = text.to_lowercase();
    errors += COMMON_MISSPELLINGS
        .iter()
        .filter(|w| lowered.contains(*w))
        .count() as u32;
    errors
}

/// Keyword and pattern scoring that needs no model.
pub struct KeywordClassifier {
    keywords: KeywordConfig,
    suspicious: RegexSet,
    personal_info: RegexSet,
    sloppy: RegexSet,
    url_checker: Option<SafeBrowsingClient>,
}

impl KeywordClassifier {
    pub fn new(keywords: KeywordConfig) -> Result<Self> {
        Ok(Self {
            keywords,
            suspicious: RegexSet::new(SUSPICIOUS_PATTERNS)?,
            personal_info: RegexSet::new(PERSONAL_INFO_PATTERNS)?,
            sloppy: RegexSet::new(SLOPPY_PATTERNS)?,
            url_checker: None,
        })
    }

    /// Check links in classified messages against a reputation service.
    pub fn with_url_checker(mut self, checker: SafeBrowsingClient) -> Self {
        self.url_checker = Some(checker);
        self
    }

    /// Score `message`; higher means more suspicious.
    pub fn assess(&self, message: &str) -> Assessment {
        let lowered = message.to_lowercase();
        let mut score = 0;
        let mut risk_factors = Vec::new();

        for keyword in self
            .keywords
            .high_risk
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
        {
            score += HIGH_RISK_WEIGHT;
            risk_factors.push(format!("High-risk keyword: '{}'", keyword));
        }
        for keyword in self
            .keywords
            .medium_risk
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
        {
            score += MEDIUM_RISK_WEIGHT;
            risk_factors.push(format!("Medium-risk keyword: '{}'", keyword));
        }
        for index in self.suspicious.matches(&lowered).iter() {
            score += PATTERN_WEIGHT;
            risk_factors.push(format!(
                "Suspicious pattern detected: {}",
                SUSPICIOUS_PATTERNS[index]
            ));
        }

        let urgency = URGENCY_WORDS.iter().filter(|w| lowered.contains(*w)).count();
        if urgency >= 2 {
            score += URGENCY_WEIGHT;
            risk_factors.push(URGENCY_FACTOR.to_string());
        }

        let errors = spelling_errors(message, &self.sloppy);
        if errors > SPELLING_TOLERANCE {
            score += SPELLING_WEIGHT;
            risk_factors.push(format!("Poor spelling/grammar ({} errors)", errors));
        }

        let total = message.chars().count().max(1);
        let upper = message.chars().filter(|c| c.is_uppercase()).count();
        if upper as f64 / total as f64 > CAPS_RATIO {
            score += CAPS_WEIGHT;
            risk_factors.push("Excessive capitalization".to_string());
        }

        if self.personal_info.is_match(&lowered) {
            score += PERSONAL_INFO_WEIGHT;
            risk_factors.push(PERSONAL_INFO_FACTOR.to_string());
        }

        Assessment {
            score,
            risk_factors,
        }
    }

    pub fn predict(&self, assessment: &Assessment) -> Prediction {
        let score = assessment.score;
        let (verdict, confidence) = if score >= SCAM_THRESHOLD {
            (
                Verdict::Scam,
                (0.6 + f64::from(score - SCAM_THRESHOLD) / 200.0).min(0.99),
            )
        } else if score >= SPAM_THRESHOLD {
            (
                Verdict::Spam,
                (0.55 + f64::from(score - SPAM_THRESHOLD) / 100.0).min(0.9),
            )
        } else {
            (Verdict::Safe, 0.95 - f64::from(score) * 0.02)
        };
        Prediction {
            verdict,
            confidence,
        }
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, message: &str) -> Result<AnalysisResult> {
        let assessment = self.assess(message);
        let prediction = self.predict(&assessment);

        let urls = extract_urls(message);
        let url_check = match &self.url_checker {
            Some(checker) => checker.check(&urls).await,
            None if urls.is_empty() => UrlCheck::NoUrls,
            None => UrlCheck::Skipped,
        };

        let (risk_score, mut reasons) =
            compute_risk(&prediction, &url_check, message, &self.keywords.fraud);
        let advice = assessment.recommendations();
        reasons.extend(assessment.risk_factors);
        reasons.extend(advice.into_iter().map(str::to_string));

        Ok(AnalysisResult {
            verdict: prediction.verdict,
            risk_score,
            confidence: (prediction.confidence * 10_000.0).round() / 10_000.0,
            reasons,
            detected_language: "en".to_string(),
            message: message.to_string(),
            translated_text: None,
        })
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
