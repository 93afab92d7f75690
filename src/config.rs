//! Configuration loading from environment.
//!
//! Keyword lists may come from a JSON file, a comma-separated variable or
//! the built-in defaults, in that order.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SafeguardError};
use crate::safe_browsing;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5001;

/// Default request timeout for the remote classifier.
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;

/// Main configuration for the SafeGuard service.
#[derive(Debug, Clone)]
pub struct SafeguardConfig {
    /// Port the web server binds on all interfaces.
    pub port: u16,
    /// Base URL of the remote classifier; offline heuristics when unset.
    pub classifier_url: Option<String>,
    pub classifier_timeout_secs: u64,
    /// Enables URL reputation checks in the keyword classifier.
    pub safe_browsing_api_key: Option<String>,
    pub safe_browsing_url: String,
    /// Directory of static assets served as a fallback.
    pub static_dir: PathBuf,
    pub keywords: KeywordConfig,
}

/// Keyword lists used for scoring and the offline classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Any hit adds the keyword penalty to the risk score.
    #[serde(default = "default_fraud_keywords")]
    pub fraud: Vec<String>,
    #[serde(default = "default_high_risk")]
    pub high_risk: Vec<String>,
    #[serde(default = "default_medium_risk")]
    pub medium_risk: Vec<String>,
}

impl KeywordConfig {
    /// Lowercase and trim every entry; matching runs on lowercased text.
    pub fn normalized(self) -> Self {
        let clean = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            fraud: clean(self.fraud),
            high_risk: clean(self.high_risk),
            medium_risk: clean(self.medium_risk),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            fraud: default_fraud_keywords(),
            high_risk: default_high_risk(),
            medium_risk: default_medium_risk(),
        }
    }
}

impl SafeguardConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `PORT`: listening port (default: 5001)
    /// - `CLASSIFIER_URL`: base URL of the remote classifier
    /// - `CLASSIFIER_TIMEOUT_SECS`: remote request timeout (default: 30)
    /// - `SAFE_BROWSING_API_KEY`: enables URL reputation checks
    /// - `SAFE_BROWSING_URL`: lookup endpoint override
    /// - `STATIC_DIR`: static asset directory (default: `static`)
    /// - `KEYWORDS_PATH`: path to a JSON file with keyword lists
    /// - `FRAUD_KEYWORDS`: comma-separated fraud keywords
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| SafeguardError::Config(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let classifier_url = env::var("CLASSIFIER_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let classifier_timeout_secs = env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS);

        let safe_browsing_api_key = env::var("SAFE_BROWSING_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let safe_browsing_url = env::var("SAFE_BROWSING_URL")
            .unwrap_or_else(|_| safe_browsing::DEFAULT_ENDPOINT.to_string());

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let keywords = load_keywords()?;

        Ok(Self {
            port,
            classifier_url,
            classifier_timeout_secs,
            safe_browsing_api_key,
            safe_browsing_url,
            static_dir,
            keywords,
        })
    }
}

fn load_keywords() -> Result<KeywordConfig> {
    if let Ok(path) = env::var("KEYWORDS_PATH") {
        return load_keywords_from_file(Path::new(&path));
    }

    let fraud = parse_keyword_list("FRAUD_KEYWORDS");
    if fraud.is_empty() {
        return Ok(KeywordConfig::default());
    }

    Ok(KeywordConfig {
        fraud,
        ..KeywordConfig::default()
    })
}

/// Load keyword lists from a JSON file; missing lists keep their defaults.
pub fn load_keywords_from_file(path: &Path) -> Result<KeywordConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| SafeguardError::Config(format!("Failed to read keywords file: {}", e)))?;

    let keywords: KeywordConfig = serde_json::from_str(&content)
        .map_err(|e| SafeguardError::Config(format!("Failed to parse keywords file: {}", e)))?;
    Ok(keywords.normalized())
}

/// Parse a comma-separated list, dropping blank entries.
fn parse_keyword_list(var_name: &str) -> Vec<String> {
    env::var(var_name)
        .ok()
        .map(|s| {
            s.split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_fraud_keywords() -> Vec<String> {
    to_strings(&[
        "urgent",
        "verify",
        "blocked",
        "pay",
        "click",
        "limited",
        "otp",
        "account",
        "immediately",
        "bank",
        "password",
        "wire",
        "transfer",
        "verify now",
        "update your",
        "suspended",
        "claim",
        "congratulations",
        "winner",
    ])
}

fn default_high_risk() -> Vec<String> {
    to_strings(&[
        "urgent",
        "winner",
        "lottery",
        "prize",
        "congratulations",
        "inheritance",
        "prince",
        "bank transfer",
        "wire transfer",
        "western union",
        "moneygram",
        "bitcoin",
        "cryptocurrency",
        "tax refund",
        "irs",
        "legal action",
        "suspended account",
        "verify account",
        "click here",
        "limited time",
        "act now",
        "expires today",
    ])
}

fn default_medium_risk() -> Vec<String> {
    to_strings(&[
        "free money",
        "easy money",
        "work from home",
        "make money fast",
        "no experience required",
        "guaranteed",
        "risk free",
        "investment opportunity",
        "double your money",
    ])
}
