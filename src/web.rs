//! HTTP router and handlers.
//!
//! Serves the analysis form, the result page and a JSON API for
//! programmatic access.

use std::path::Path;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::{Layer, Service};
use tower_http::services::ServeDir;

use crate::classifier::Classifier;
use crate::controller::{download_report, FormController, SubmitOutcome};
use crate::error::{ErrorContext, SafeguardError};
use crate::models::AnalysisResult;
use crate::notice::Notice;
use crate::pages::{DownloadSlot, FormPage, ResultPage};
use crate::samples::{ExampleKind, ExampleSource};
use crate::validation::validate_message;
use crate::view::MessageInput;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Request logging middleware layer
#[derive(Clone)]
pub struct RequestLoggingLayer;

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService { inner }
    }
}

/// Logs method, path, status and latency of every request.
#[derive(Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
}

impl<S> Service<Request> for RequestLoggingService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let start = std::time::Instant::now();

        // Drive the clone that was polled ready.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(req).await?;

            tracing::info!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "HTTP request"
            );

            Ok(response)
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub controller: FormController,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            controller: FormController::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            request_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Set by the example buttons.
    pub pick: Option<String>,
    /// Legacy quick-load link.
    pub example: Option<String>,
}

impl HomeQuery {
    fn requested_example(&self) -> Option<(&str, ExampleSource)> {
        self.pick
            .as_deref()
            .map(|k| (k, ExampleSource::Typed))
            .or_else(|| self.example.as_deref().map(|k| (k, ExampleSource::Quick)))
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub message: Option<String>,
}

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(ErrorResponse::new(msg)))
}

/// HTTP status for a failed analysis.
fn status_for(error: &SafeguardError) -> StatusCode {
    match error {
        SafeguardError::Validation(_) => StatusCode::BAD_REQUEST,
        SafeguardError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        SafeguardError::Classifier(_) | SafeguardError::Http(_) | SafeguardError::Json(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log `error` and turn it into a JSON API error.
fn handle_error(error: SafeguardError, context: ErrorContext) -> ApiError {
    error.log_with_context(&context);

    let code = match &error {
        SafeguardError::Validation(v) => Some(v.code().to_string()),
        _ => None,
    };

    (
        status_for(&error),
        Json(ErrorResponse {
            error: error.user_message().to_string(),
            code,
            request_id: Some(context.request_id),
        }),
    )
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let serve_dir = ServeDir::new(static_dir);

    Router::new()
        .route("/", get(|| async { Redirect::to("/home") }))
        .route("/home", get(home))
        .route("/analyze", post(analyze))
        .route("/clear", post(clear))
        .route("/api/detect-scam", post(api_detect_scam))
        .route("/api/health", get(health))
        .layer(RequestLoggingLayer)
        .with_state(state)
        .fallback_service(serve_dir)
}

async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Html<String> {
    let mut page = FormPage::default();
    state.controller.open(&mut page);

    if let Some((kind, source)) = query.requested_example() {
        match kind.parse::<ExampleKind>() {
            Ok(kind) => state.controller.load_example(&mut page, kind, source),
            Err(e) => tracing::debug!(error = %e, "Ignoring unknown example"),
        }
    }

    Html(page.render())
}

async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let mut page = FormPage::new(form.message);
    state.controller.open(&mut page);

    let message = match state.controller.submit(&mut page) {
        SubmitOutcome::Accepted(message) => message,
        SubmitOutcome::Rejected(_) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page.render())).into_response();
        }
    };

    let context = ErrorContext::new("analyze");
    match state.classifier.classify(&message).await {
        Ok(result) => {
            tracing::info!(
                request_id = %context.request_id,
                classifier = state.classifier.name(),
                verdict = %result.verdict,
                risk_score = result.risk_score,
                "Message analyzed"
            );
            let result_page = ResultPage::new(result);
            let mut slot = DownloadSlot::default();
            download_report(&result_page, &mut slot, chrono::Local::now());
            Html(result_page.render(&slot)).into_response()
        }
        Err(e) => {
            e.log_with_context(&context);
            let status = status_for(&e);
            page.show_notice(Notice::error(e.user_message()));
            page.focus();
            (status, Html(page.render())).into_response()
        }
    }
}

async fn clear(State(state): State<AppState>) -> Html<String> {
    let mut page = FormPage::default();
    state.controller.open(&mut page);
    state.controller.clear(&mut page);
    Html(page.render())
}

async fn api_detect_scam(
    State(state): State<AppState>,
    Json(body): Json<DetectRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let context = ErrorContext::new("api_detect_scam");

    let raw = body.message.ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "Missing 'message' in request body")
    })?;

    let message = validate_message(&raw).map_err(|e| handle_error(e.into(), context.clone()))?;

    state
        .classifier
        .classify(message)
        .await
        .map(Json)
        .map_err(|e| handle_error(e, context))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "SafeGuard",
        "classifier": state.classifier.name(),
        "build": option_env!("BUILD_TIMESTAMP"),
        "commit": option_env!("GIT_COMMIT"),
    }))
}
