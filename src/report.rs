//! Plain-text analysis reports built from a rendered result.
//!
//! Generation never fails: anything the view does not provide falls back to
//! a fixed default.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::view::ResultView;

/// Default for missing text fields.
pub const UNKNOWN: &str = "Unknown";

/// Default for missing numeric fields.
pub const ZERO: &str = "0";

/// MIME type of the downloaded report.
pub const REPORT_MIME: &str = "text/plain;charset=utf-8";

const FILE_PREFIX: &str = "scam-analysis-report-";

/// `M/D/YYYY, h:mm:ss AM`
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const BOX_WIDTH: usize = 60;
const TITLE: &str = "                 SCAM DETECTION REPORT                      ";
const SUBTITLE: &str = "                   Advanced AI Analysis                     ";
const RULE_WIDTH: usize = 63;

const DISCLAIMER: &str = "\
This analysis is provided by an AI system that estimates fraud
probability based on language patterns and URL analysis.

❌ This system does NOT:
   • Verify factual accuracy of claims
   • Provide legal confirmation of fraud
   • Replace human judgment and verification

✅ Always verify important information through official channels
   before taking any action based on this analysis.";

const SYSTEM_NAME: &str = "Scam Detection AI v2.0";
const SYSTEM_ENGINE: &str = "Advanced Machine Learning";
const SYSTEM_FEATURES: &str = "Multi-language support, URL analysis, Pattern recognition";
const FOOTER: &str = "© 2024 Scam Detection System - All Rights Reserved";

/// Snapshot of a rendered result plus generation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub generated_at: DateTime<FixedOffset>,
    pub report_id: String,
    pub message: String,
    pub verdict: String,
    pub risk: String,
    pub confidence: String,
    pub language: String,
    pub reasons: Vec<String>,
}

/// A report ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ReportFile {
    /// `data:` URL for a synthetic download anchor.
    pub fn data_url(&self) -> String {
        format!(
            "data:{},{}",
            self.mime_type,
            urlencoding::encode(&self.contents)
        )
    }
}

impl Report {
    /// Read the current result out of `view`.
    pub fn from_view<Tz: TimeZone>(view: &impl ResultView, generated_at: DateTime<Tz>) -> Self {
        let generated_at = generated_at.fixed_offset();
        Self {
            report_id: report_id(epoch_millis(&generated_at)),
            generated_at,
            message: text_or(view.message_text(), UNKNOWN),
            verdict: text_or(view.verdict_title(), UNKNOWN),
            risk: text_or(view.risk_percentage(), ZERO),
            confidence: text_or(view.confidence_percentage(), ZERO),
            language: text_or(view.detail_value(), UNKNOWN),
            reasons: view.reason_items(),
        }
    }

    /// Human-readable generation time.
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn file_name(&self) -> String {
        file_name(epoch_millis(&self.generated_at))
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn into_file(self) -> ReportFile {
        ReportFile {
            file_name: self.file_name(),
            mime_type: REPORT_MIME,
            contents: self.render(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self.timestamp();

        writeln!(f, "╔{}╗", "═".repeat(BOX_WIDTH))?;
        writeln!(f, "║{}║", TITLE)?;
        writeln!(f, "║{}║", SUBTITLE)?;
        writeln!(f, "╚{}╝", "═".repeat(BOX_WIDTH))?;
        writeln!(f)?;
        writeln!(f, "Generated: {}", timestamp)?;
        writeln!(f, "Report ID: {}", self.report_id)?;
        writeln!(f)?;

        section(f, "📧 ANALYZED MESSAGE")?;
        writeln!(f, "{}", self.message)?;
        writeln!(f)?;

        section(f, "🔍 ANALYSIS RESULTS")?;
        writeln!(f, "🏷️  Verdict:           {}", self.verdict)?;
        writeln!(f, "📊 Risk Score:         {}%", self.risk)?;
        writeln!(f, "🧠 AI Confidence:      {}%", self.confidence)?;
        writeln!(f, "🌐 Language:           {}", self.language)?;
        writeln!(f)?;

        section(f, "💡 ANALYSIS REASONING")?;
        for (index, reason) in self.reasons.iter().enumerate() {
            writeln!(f, "{}. {}", index + 1, reason)?;
        }
        writeln!(f)?;

        section(f, "⚠️  IMPORTANT DISCLAIMER")?;
        writeln!(f, "{}", DISCLAIMER)?;
        writeln!(f)?;

        section(f, "📋 SYSTEM INFORMATION")?;
        writeln!(f, "System:     {}", SYSTEM_NAME)?;
        writeln!(f, "Engine:     {}", SYSTEM_ENGINE)?;
        writeln!(f, "Features:   {}", SYSTEM_FEATURES)?;
        writeln!(f, "Generated:  {}", timestamp)?;
        writeln!(f)?;
        write!(f, "{}", FOOTER)
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "═".repeat(RULE_WIDTH);
    writeln!(f, "{}", rule)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", rule)?;
    writeln!(f)
}

/// Empty or whitespace-only text counts as missing; anything else is kept
/// verbatim.
fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn epoch_millis(at: &DateTime<FixedOffset>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or(0)
}

/// Upper-cased base-36 rendering of a millisecond timestamp.
///
/// ```
/// use safeguard::report::report_id;
///
/// assert_eq!(report_id(0), "0");
/// assert_eq!(report_id(35), "Z");
/// assert_eq!(report_id(36), "10");
/// ```
pub fn report_id(epoch_ms: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    if epoch_ms == 0 {
        return "0".to_string();
    }

    let mut n = epoch_ms;
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Download name for a report generated at `epoch_ms`.
pub fn file_name(epoch_ms: u64) -> String {
    format!("{}{}.txt", FILE_PREFIX, epoch_ms)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::view::ResultFields;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_file_name_pattern(ms in 0u64..4_102_444_800_000) {
            let name = file_name(ms);
            let digits = name
                .strip_prefix("scam-analysis-report-")
                .and_then(|rest| rest.strip_suffix(".txt"))
                .unwrap_or("");
            prop_assert!(!digits.is_empty());
            prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }

        /// The id decodes back to the timestamp it came from.
        #[test]
        fn prop_report_id_is_base36(ms in 0u64..4_102_444_800_000) {
            let id = report_id(ms);
            prop_assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            prop_assert_eq!(u64::from_str_radix(&id, 36).unwrap(), ms);
        }

        #[test]
        fn prop_reasons_numbered_verbatim(reasons in prop::collection::vec("[A-Za-z ,]{1,30}", 0..8)) {
            let fields = ResultFields { reasons: reasons.clone(), ..ResultFields::default() };
            let text = Report::from_view(&fields, chrono::Utc::now()).render();
            for (i, reason) in reasons.iter().enumerate() {
                let line = format!("{}. {}", i + 1, reason);
                prop_assert!(text.lines().any(|l| l == line), "missing line {:?}", line);
            }
        }
    }
}
