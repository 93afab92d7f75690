//! URL reputation lookups against the Safe Browsing v4 API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::risk::UrlCheck;

/// Public lookup endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";

/// Request timeout for lookups.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

const CLIENT_ID: &str = "safeguard";

const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "POTENTIALLY_HARMFUL_APPLICATION",
    "UNWANTED_SOFTWARE",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo,
    threat_info: ThreatInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'static [&'static str],
    platform_types: [&'static str; 1],
    threat_entry_types: [&'static str; 1],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

/// An empty body means no URL matched.
#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    #[serde(default)]
    threat_type: Option<String>,
    threat: MatchedThreat,
}

#[derive(Deserialize)]
struct MatchedThreat {
    url: String,
}

/// Client for the Safe Browsing `threatMatches:find` call.
pub struct SafeBrowsingClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SafeBrowsingClient {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Look up `urls`. Lookup failures are reported in the result rather
    /// than as an error so scoring can continue.
    pub async fn check(&self, urls: &[String]) -> UrlCheck {
        if urls.is_empty() {
            return UrlCheck::NoUrls;
        }

        match self.find_threats(urls).await {
            Ok(flagged) => UrlCheck::Checked(
                urls.iter()
                    .map(|url| (url.clone(), flagged.contains(url)))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, urls = urls.len(), "URL safety check failed");
                UrlCheck::Failed(e)
            }
        }
    }

    async fn find_threats(&self, urls: &[String]) -> std::result::Result<Vec<String>, String> {
        let body = FindRequest {
            client: ClientInfo {
                client_id: CLIENT_ID,
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES,
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: urls.iter().map(|url| ThreatEntry { url }).collect(),
            },
        };

        let url = format!("{}?key={}", self.endpoint, urlencoding::encode(&self.api_key));
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let text = response
            .text()
            .await
            .map_err(|e| e.without_url().to_string())?;
        let parsed: FindResponse = serde_json::from_str(&text).map_err(|e| e.to_string())?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| {
                tracing::info!(
                    url = %m.threat.url,
                    threat_type = m.threat_type.as_deref().unwrap_or("unknown"),
                    "Unsafe URL reported"
                );
                m.threat.url
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/lookup", addr)
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn no_urls_skips_lookup() {
        let client = SafeBrowsingClient::new("key", "http://127.0.0.1:9/unused").unwrap();
        assert_eq!(client.check(&[]).await, UrlCheck::NoUrls);
    }

    #[tokio::test]
    async fn flags_only_matched_urls() {
        let router = Router::new().route(
            "/lookup",
            post(
                |Query(params): Query<HashMap<String, String>>,
                 Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
                    let entries = &body["threatInfo"]["threatEntries"];
                    assert_eq!(entries[0]["url"], "http://evil.example");
                    Json(serde_json::json!({
                        "matches": [{
                            "threatType": "SOCIAL_ENGINEERING",
                            "threat": {"url": "http://evil.example"}
                        }]
                    }))
                },
            ),
        );
        let endpoint = serve(router).await;

        let client = SafeBrowsingClient::new("test-key", endpoint).unwrap();
        let check = client
            .check(&urls(&["http://evil.example", "https://docs.example"]))
            .await;

        assert_eq!(
            check,
            UrlCheck::Checked(vec![
                ("http://evil.example".to_string(), true),
                ("https://docs.example".to_string(), false),
            ])
        );
    }

    #[tokio::test]
    async fn empty_response_means_all_safe() {
        let router = Router::new().route(
            "/lookup",
            post(|| async { Json(serde_json::json!({})) }),
        );
        let endpoint = serve(router).await;

        let client = SafeBrowsingClient::new("k", endpoint).unwrap();
        let check = client.check(&urls(&["https://docs.example"])).await;
        assert_eq!(
            check,
            UrlCheck::Checked(vec![("https://docs.example".to_string(), false)])
        );
    }

    #[tokio::test]
    async fn http_error_is_reported_as_failed() {
        let router = Router::new().route(
            "/lookup",
            post(|| async { (StatusCode::FORBIDDEN, "bad key") }),
        );
        let endpoint = serve(router).await;

        let client = SafeBrowsingClient::new("k", endpoint).unwrap();
        let check = client.check(&urls(&["https://docs.example"])).await;
        assert_eq!(check, UrlCheck::Failed("HTTP 403 Forbidden".to_string()));
    }

    #[tokio::test]
    async fn malformed_body_is_reported_as_failed() {
        let router = Router::new().route(
            "/lookup",
            post(|| async { "not json" }),
        );
        let endpoint = serve(router).await;

        let client = SafeBrowsingClient::new("k", endpoint).unwrap();
        let check = client.check(&urls(&["https://docs.example"])).await;
        assert!(matches!(check, UrlCheck::Failed(_)));
    }
}
