//! HTTP endpoints for email classification.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

use crate::classify::{ClassificationOutcome, ClassificationVerdict, EmailClassifier};
use crate::error::ApiError;
use crate::extract;

const EMPTY_TEXT: &str = "O texto do email não pode estar vazio.";
const EMPTY_FILE: &str = "O ficheiro não contém texto legível.";
const MISSING_FILE: &str = "Nenhum ficheiro enviado no campo 'file'.";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<EmailClassifier>,
}

/// Build the Axum router with the classification routes.
pub fn classifier_routes(classifier: Arc<EmailClassifier>, max_upload_bytes: usize) -> Router {
    let state = AppState { classifier };

    Router::new()
        .route("/", get(root))
        .route("/classify", post(classify_text))
        .route(
            "/classify-file",
            post(classify_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "API online" }))
}

// ── Classification ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    #[serde(default)]
    text: Option<String>,
}

/// POST /classify
///
/// Body: `{"text": "..."}`. Returns the verdict, 400 for blank text and
/// 500 when the model could not produce a verdict.
async fn classify_text(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationVerdict>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected classify body");
        ApiError::Validation(EMPTY_TEXT.to_string())
    })?;

    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(EMPTY_TEXT.to_string()))?;

    info!(chars = text.chars().count(), "Classifying text");
    let outcome = state.classifier.classify(&text).await;
    verdict_response(outcome)
}

/// POST /classify-file
///
/// Multipart upload with a `file` field (`text/plain` or `application/pdf`).
async fn classify_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassificationVerdict>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        upload = Some((media_type, bytes.to_vec()));
        break;
    }

    let (media_type, bytes) = upload.ok_or_else(|| ApiError::Validation(MISSING_FILE.to_string()))?;
    info!(media_type = %media_type, bytes = bytes.len(), "Extracting uploaded file");

    // PDF parsing is CPU-bound.
    let text = tokio::task::spawn_blocking(move || extract::extract(&bytes, &media_type))
        .await
        .map_err(|e| {
            error!(error = %e, "Extraction task failed");
            ApiError::Internal("Ocorreu um erro interno no servidor.".to_string())
        })??;

    if text.trim().is_empty() {
        return Err(ApiError::Validation(EMPTY_FILE.to_string()));
    }

    let outcome = state.classifier.classify(&text).await;
    verdict_response(outcome)
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    debug!(error = %e, "Failed to read multipart upload");
    ApiError::Validation(format!("Falha ao ler o ficheiro enviado: {}", e.body_text()))
}

/// Map an outcome to the HTTP result. Any "Erro" status is a 500.
fn verdict_response(outcome: ClassificationOutcome) -> Result<Json<ClassificationVerdict>, ApiError> {
    let verdict = outcome.into_verdict();
    if verdict.is_error() {
        return Err(ApiError::Classification(verdict.reason));
    }
    Ok(Json(verdict))
}
