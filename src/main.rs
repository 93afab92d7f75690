//! SafeGuard web service entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safeguard::classifier::{Classifier, KeywordClassifier, RemoteClassifier};
use safeguard::config::SafeguardConfig;
use safeguard::error::{Result, SafeguardError};
use safeguard::safe_browsing::SafeBrowsingClient;
use safeguard::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // RUST_LOG controls verbosity, e.g. RUST_LOG=safeguard=debug
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        build = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        commit = option_env!("GIT_COMMIT").unwrap_or("unknown"),
        "SafeGuard starting..."
    );

    let config = SafeguardConfig::from_env()?;
    tracing::info!("Configuration loaded");

    let classifier: Arc<dyn Classifier> = match &config.classifier_url {
        Some(url) => {
            tracing::info!(url = %url, "Using remote classifier");
            Arc::new(RemoteClassifier::new(
                url,
                Duration::from_secs(config.classifier_timeout_secs),
            )?)
        }
        None => {
            tracing::warn!("CLASSIFIER_URL not set, falling back to keyword heuristics");
            let mut classifier = KeywordClassifier::new(config.keywords.clone())?;
            match &config.safe_browsing_api_key {
                Some(key) => {
                    let checker = SafeBrowsingClient::new(key, &config.safe_browsing_url)?;
                    classifier = classifier.with_url_checker(checker);
                    tracing::info!("URL safety checks enabled");
                }
                None => tracing::info!("SAFE_BROWSING_API_KEY not set, URL checks skipped"),
            }
            Arc::new(classifier)
        }
    };

    let router = web::build_router(AppState::new(classifier), &config.static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SafeguardError::Io(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!(port = config.port, "Web server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| SafeguardError::Io(format!("Web server error: {}", e)))?;

    Ok(())
}
