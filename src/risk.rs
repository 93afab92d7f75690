//! Turns a raw prediction into a 0-100 risk score with reasons.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Prediction, Verdict};

/// Score added per unsafe URL.
const UNSAFE_URL_PENALTY: f64 = 25.0;

/// Score added when any fraud keyword appears.
const KEYWORD_PENALTY: f64 = 20.0;

/// Keywords listed in the reason line.
const KEYWORDS_SHOWN: usize = 5;

/// Confidence at which a per-verdict context reason is added.
const CONTEXT_CONFIDENCE: f64 = 0.7;

/// Outcome of checking a message's URLs against a reputation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCheck {
    /// The message contained no URLs.
    NoUrls,
    /// No reputation service is configured.
    Skipped,
    /// The lookup itself failed.
    Failed(String),
    /// Each URL with whether it was flagged unsafe.
    Checked(Vec<(String, bool)>),
}

/// Score `prediction` for `text`, returning the clamped score and the
/// reasons in the order they were found.
pub fn compute_risk(
    prediction: &Prediction,
    url_check: &UrlCheck,
    text: &str,
    fraud_keywords: &[String],
) -> (u8, Vec<String>) {
    let confidence = prediction.confidence.clamp(0.0, 1.0);
    let mut reasons = Vec::new();

    let mut score = match prediction.verdict {
        Verdict::Safe => (1.0 - confidence) * 30.0,
        Verdict::Spam => 40.0 + confidence * 30.0,
        Verdict::Scam | Verdict::Unknown => 70.0 + confidence * 30.0,
    };
    reasons.push(format!(
        "Message classified as {} with {:.2} confidence",
        prediction.verdict, confidence
    ));

    match url_check {
        UrlCheck::Checked(matches) => {
            let mut flagged = false;
            for (url, unsafe_url) in matches {
                if *unsafe_url {
                    flagged = true;
                    score += UNSAFE_URL_PENALTY;
                    reasons.push(format!("Malicious URL detected: {}", url));
                }
            }
            if !flagged && !matches.is_empty() {
                reasons.push("All URLs checked and found safe".to_string());
            }
        }
        UrlCheck::Skipped => {
            reasons.push("URL safety check skipped (API key not configured)".to_string());
        }
        UrlCheck::Failed(error) => {
            reasons.push(format!("URL safety check failed: {}", error));
        }
        UrlCheck::NoUrls => {
            reasons.push("No URLs found to check".to_string());
        }
    }

    let lowered = text.to_lowercase();
    let found: Vec<&str> = fraud_keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| lowered.contains(&kw.to_lowercase()))
        .collect();

    if !found.is_empty() {
        score += KEYWORD_PENALTY;
        let shown: Vec<&str> = found.iter().take(KEYWORDS_SHOWN).copied().collect();
        reasons.push(format!(
            "Suspicious keywords detected: {}",
            shown.join(", ")
        ));
    } else if prediction.verdict == Verdict::Safe {
        reasons.push("No suspicious keywords or urgency indicators found".to_string());
    }

    if confidence >= CONTEXT_CONFIDENCE {
        let context = match prediction.verdict {
            Verdict::Safe => Some("Message contains legitimate communication patterns"),
            Verdict::Spam => Some("Message shows typical spam/marketing characteristics"),
            Verdict::Scam => Some("Message exhibits strong fraud indicators"),
            Verdict::Unknown => None,
        };
        if let Some(context) = context {
            reasons.push(context.to_string());
        }
    }

    (score.clamp(0.0, 100.0).round() as u8, reasons)
}

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(r"(?i)(https?://\S+|www\.\S+)").expect("URL pattern should compile")
    })
}

/// Extract `http(s)://` and `www.` links, trimmed of surrounding
/// punctuation and de-duplicated in order of appearance.
///
/// ```
/// use safeguard::risk::extract_urls;
///
/// let urls = extract_urls("see http://a.com, and (www.b.org) or http://a.com.");
/// assert_eq!(urls, vec!["http://a.com", "www.b.org"]);
/// ```
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for m in url_regex().find_iter(text) {
        let url = m
            .as_str()
            .trim_matches(|c: char| ".,;:()[]<>\"'".contains(c))
            .to_string();
        if !url.is_empty() && !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        ["urgent", "verify", "account", "click", "winner", "bank"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn prediction(verdict: Verdict, confidence: f64) -> Prediction {
        Prediction {
            verdict,
            confidence,
        }
    }

    #[test]
    fn confident_safe_message_scores_low() {
        let (score, reasons) = compute_risk(
            &prediction(Verdict::Safe, 0.9),
            &UrlCheck::NoUrls,
            "See you for coffee tomorrow",
            &keywords(),
        );

        assert_eq!(score, 3);
        assert_eq!(
            reasons,
            vec![
                "Message classified as Safe with 0.90 confidence",
                "No URLs found to check",
                "No suspicious keywords or urgency indicators found",
                "Message contains legitimate communication patterns",
            ]
        );
    }

    #[test]
    fn spam_lands_in_middle_band() {
        let (score, _) = compute_risk(
            &prediction(Verdict::Spam, 0.5),
            &UrlCheck::NoUrls,
            "great deals",
            &keywords(),
        );
        assert_eq!(score, 55);
    }

    #[test]
    fn scam_with_keywords_and_bad_url_is_capped() {
        let (score, reasons) = compute_risk(
            &prediction(Verdict::Scam, 0.95),
            &UrlCheck::Checked(vec![("http://evil.example".to_string(), true)]),
            "URGENT verify your account now",
            &keywords(),
        );

        assert_eq!(score, 100);
        assert!(reasons.contains(&"Malicious URL detected: http://evil.example".to_string()));
        assert!(reasons.contains(&"Suspicious keywords detected: urgent, verify, account".to_string()));
        assert_eq!(
            reasons.last().map(String::as_str),
            Some("Message exhibits strong fraud indicators")
        );
    }

    #[test]
    fn keyword_reason_lists_at_most_five() {
        let (_, reasons) = compute_risk(
            &prediction(Verdict::Spam, 0.1),
            &UrlCheck::Skipped,
            "urgent verify account click winner bank",
            &keywords(),
        );
        assert!(reasons.contains(
            &"Suspicious keywords detected: urgent, verify, account, click, winner".to_string()
        ));
        assert!(reasons.contains(&"URL safety check skipped (API key not configured)".to_string()));
    }

    #[test]
    fn clean_urls_are_reported_safe() {
        let (_, reasons) = compute_risk(
            &prediction(Verdict::Safe, 0.5),
            &UrlCheck::Checked(vec![("https://example.org".to_string(), false)]),
            "docs at https://example.org",
            &keywords(),
        );
        assert!(reasons.contains(&"All URLs checked and found safe".to_string()));
    }

    #[test]
    fn failed_url_check_is_reported() {
        let (_, reasons) = compute_risk(
            &prediction(Verdict::Safe, 0.5),
            &UrlCheck::Failed("timeout".to_string()),
            "hello",
            &keywords(),
        );
        assert!(reasons.contains(&"URL safety check failed: timeout".to_string()));
    }

    #[test]
    fn extract_urls_finds_both_forms() {
        let urls = extract_urls("Go to HTTPS://Bank.example/login or www.prize.example.");
        assert_eq!(urls, vec!["HTTPS://Bank.example/login", "www.prize.example"]);
    }

    #[test]
    fn extract_urls_empty_text() {
        assert!(extract_urls("").is_empty());
        assert!(extract_urls("no links here").is_empty());
    }
}
