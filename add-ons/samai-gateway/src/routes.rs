//! HTTP routes over the shared engine.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use samai_core::{
    ConversationEntry, ConversationStats, Gender, ModelInfo, MultiAiEngine, PersonalityProfile,
    PersonalityType, ResponseRecord, TaskCategory, HISTORY_CAPACITY,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MultiAiEngine>,
    pub app_name: String,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    task_type: Option<String>,
    #[serde(default)]
    context: Option<Value>,
}

#[derive(Deserialize)]
struct SpecializedRequest {
    specialty: String,
    query: String,
    #[serde(default)]
    context: Option<Value>,
}

#[derive(Deserialize, Default)]
struct PersonalityRequest {
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    personality_type: Option<String>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/", get(root))
        .route("/api/v1/chat/send", post(chat_send))
        .route("/api/v1/chat/specialized", post(chat_specialized))
        .route("/api/v1/chat/history", get(chat_history))
        .route("/api/v1/personality", post(setup_personality).get(get_personality))
        .route("/api/v1/models", get(models))
        .route("/api/v1/stats", get(stats))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors)
}

/// Logs method, path, status and latency; stamps `X-Process-Time` (seconds).
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = started.elapsed();
    if let Ok(v) = HeaderValue::from_str(&format!("{:.4}", elapsed.as_secs_f64())) {
        response.headers_mut().insert("x-process-time", v);
    }
    tracing::info!(
        target: "samai::gateway",
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request handled"
    );
    response
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app_name": state.app_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", state.app_name),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn chat_send(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ResponseRecord>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message must not be empty"));
    }
    let task_type = match req.task_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            TaskCategory::from_str(raw)
                .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Unknown task type: {}", raw)))?,
        ),
        None => None,
    };
    let record = state
        .engine
        .process_request(&req.message, task_type, req.context.as_ref())
        .await;
    Ok(Json(record))
}

async fn chat_specialized(
    State(state): State<AppState>,
    Json(req): Json<SpecializedRequest>,
) -> Json<ResponseRecord> {
    let record = state
        .engine
        .get_specialized_response(&req.specialty, &req.query, req.context.as_ref())
        .await;
    Json(record)
}

async fn chat_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<ConversationEntry>> {
    let limit = q.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(HISTORY_CAPACITY);
    Json(state.engine.recent_history(limit))
}

async fn setup_personality(
    State(state): State<AppState>,
    body: Option<Json<PersonalityRequest>>,
) -> Json<PersonalityProfile> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let gender = req.gender.as_deref().map(Gender::from_str).unwrap_or_default();
    let personality_type = req
        .personality_type
        .as_deref()
        .map(PersonalityType::from_str)
        .unwrap_or_default();
    Json(state.engine.setup_personality(gender, req.name.as_deref(), personality_type))
}

async fn get_personality(State(state): State<AppState>) -> Result<Json<PersonalityProfile>, ApiError> {
    state
        .engine
        .get_personality_info()
        .map(Json)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))
}

async fn models(State(state): State<AppState>) -> Json<BTreeMap<String, ModelInfo>> {
    Json(state.engine.get_available_models())
}

async fn stats(State(state): State<AppState>) -> Json<ConversationStats> {
    Json(state.engine.get_conversation_stats())
}
