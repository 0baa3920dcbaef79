//! Compliance Router - routes uploaded PDFs to a compliance-analysis agent.

mod agents;
mod config;
mod dispatch;
mod ingest;
mod llm;
mod openrouter;
mod pipeline;
mod registry;
mod router;
mod schema;
mod services;
#[cfg(test)]
mod testing;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use config::Settings;
use pipeline::{Pipeline, PipelineError};
use registry::AgentRegistry;
use schema::{AgentSummary, UploadedFile};
use serde::{Deserialize, Serialize};
use services::Services;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    registry: Arc<AgentRegistry>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compliance_router=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    let registry = Arc::new(AgentRegistry::builtin()?);
    info!(
        "Loaded {} agents: {:?}",
        registry.len(),
        registry.iter().map(|a| a.id).collect::<Vec<_>>()
    );

    let services = Arc::new(Services::from_settings(&settings)?);

    let state = AppState {
        pipeline: Arc::new(Pipeline::new(registry.clone(), services)),
        registry,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/agents", get(list_agents))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Server listening on http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List the registered agents.
async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(state.registry.summaries())
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Deserialize)]
struct AnalyzeQuery {
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    request_id: Uuid,
    agent: String,
    file_indices: Vec<usize>,
    report: String,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, kind: &'static str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            kind,
            message: message.into(),
        }),
    )
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.kind(), e.to_string())
    }
}

/// Upload 1+ PDFs with a query; the best-fitting agent analyzes them.
async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let (query, files) = read_upload(multipart).await?;

    if query.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "A non-empty `query` field is required",
        ));
    }
    if files.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "At least one `file` field is required",
        ));
    }

    info!(
        "[{}] Analyzing {} file(s) for query: {:?}",
        request_id,
        files.len(),
        query
    );

    let report = state.pipeline.analyze(&query, &files).await.map_err(|e| {
        warn!("[{}] {}", request_id, e);
        ApiError::from(e)
    })?;

    info!(
        "[{}] Agent {} returned {} chars",
        request_id,
        report.agent,
        report.text.len()
    );

    Ok(match params.format {
        OutputFormat::Json => Json(AnalyzeResponse {
            request_id,
            agent: report.agent,
            file_indices: report.file_indices,
            report: report.text,
        })
        .into_response(),
        OutputFormat::Text => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"agent_output.txt\"",
                ),
            ],
            report.text,
        )
            .into_response(),
    })
}

/// Collect the `query` field and every `file` field, indexed in upload order.
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<UploadedFile>), ApiError> {
    let mut query = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            format!("Multipart error: {}", e),
        )
    })? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("query") => {
                query = field.text().await.map_err(|e| {
                    api_error(
                        StatusCode::BAD_REQUEST,
                        "bad_request",
                        format!("Failed to read query: {}", e),
                    )
                })?;
            }
            Some("file") => {
                let name = field.file_name().unwrap_or("document.pdf").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    error!("Failed to read upload {}: {}", name, e);
                    api_error(
                        StatusCode::BAD_REQUEST,
                        "bad_request",
                        format!("Failed to read file: {}", e),
                    )
                })?;

                let file = UploadedFile::new(files.len(), name, bytes.to_vec());
                info!(
                    "Received file #{}: {} ({} bytes, sha256={})",
                    file.index,
                    file.name,
                    file.bytes.len(),
                    file.digest()
                );
                files.push(file);
            }
            other => {
                warn!("Ignoring unexpected multipart field: {:?}", other);
            }
        }
    }

    Ok((query, files))
}
