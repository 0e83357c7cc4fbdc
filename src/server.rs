use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audit::{AuditMode, ConflictReport, audit_conflicts_with};
use crate::config::{EngineConfig, SearchOptions, ServerConfig};
use crate::data::{ScheduledClass, TimetableInput, TimetableOutput};
use crate::grid::WeekGrid;
use crate::solver;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub input: TimetableInput,
    /// Overrides the configured grid for this request.
    pub grid: Option<WeekGrid>,
    pub options: Option<SearchOptions>,
    /// Fixes the run for reproducibility; a random seed is drawn otherwise.
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub output: TimetableOutput,
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub scheduled_classes: Vec<ScheduledClass>,
    pub mode: Option<AuditMode>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    #[serde(flatten)]
    pub generated: GenerateResponse,
    pub audit: ConflictReport,
}

type AppState = Arc<EngineConfig>;
type HandlerError = (StatusCode, String);

fn run_generate(
    config: &EngineConfig,
    request: &GenerateRequest,
) -> Result<GenerateResponse, HandlerError> {
    let grid = request.grid.as_ref().unwrap_or(&config.grid);
    let options = request.options.unwrap_or(config.search);
    let seed = request.seed.unwrap_or_else(rand::random);
    info!("Generating timetable {} with seed {}", request.input.timetable_id, seed);
    match solver::generate_seeded(&request.input, grid, &options, seed) {
        Ok(output) => Ok(GenerateResponse { output, seed }),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn generate_handler(
    State(config): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, HandlerError> {
    run_generate(&config, &request).map(Json)
}

async fn audit_handler(
    State(config): State<AppState>,
    Json(request): Json<AuditRequest>,
) -> Json<ConflictReport> {
    let mode = request.mode.unwrap_or(config.audit_mode);
    Json(audit_conflicts_with(&request.scheduled_classes, mode))
}

async fn check_handler(
    State(config): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<CheckResponse>, HandlerError> {
    let generated = run_generate(&config, &request)?;
    let audit = audit_conflicts_with(&generated.output.scheduled_classes, config.audit_mode);
    Ok(Json(CheckResponse { generated, audit }))
}

pub fn router(config: EngineConfig) -> Router {
    Router::new()
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/audit", post(audit_handler))
        .route("/v1/timetable/check", post(check_handler))
        .with_state(Arc::new(config))
}

pub async fn run_server(server: ServerConfig, engine: EngineConfig) -> std::io::Result<()> {
    let app = router(engine);

    let listener = tokio::net::TcpListener::bind(&server.bind_addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
