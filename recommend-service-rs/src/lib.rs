// recommend-service-rs/src/lib.rs
// Recommendation service - HTTP surface over the stats -> prompt -> model
// pipeline
//
// Request flow for /api/v1/recommend:
//   validate body -> fetch raw stats (concurrent) -> normalize -> reduce
//   -> assemble prompt -> model call -> tolerant extraction -> respond.
// All external-call failures degrade to defaults; only a missing required
// request field or a missing model credential fails the request.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

pub mod extract;
pub mod leetcode_client;
pub mod llm_client;
pub mod prompt;
pub mod stats;
pub mod validation;

use extract::ParsedRecommendation;
use leetcode_client::LeetCodeClient;
use llm_client::LlmClient;
use stats::CanonicalStats;
use validation::{
    payload_limit_config, validate_content_type, validate_recommend_request, ApiValidationError,
};

// Track service start time for uptime reporting
static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Submission fetch limit applied when the request does not supply one.
const DEFAULT_SUB_LIMIT: u32 = 300;

/// Shared application state: stateless outbound clients reused across
/// requests. No per-request data lives here.
pub struct AppState {
    pub leetcode: LeetCodeClient,
    pub llm: LlmClient,
}

/// Recommend request body (JSON)
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub username: String,
    pub question: String,
    pub sub_limit: Option<u32>,
}

/// Recommend response body (JSON)
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub stats: CanonicalStats,
    pub raw: String,
    pub parsed: Option<ParsedRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Build the Axum router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // Initialize start time
    let _ = *START_TIME;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/recommend", post(recommend_handler))
        .route("/api/v1/user/:username", get(user_profile_handler))
        .layer(payload_limit_config())
        .layer(cors)
        .with_state(state)
}

/// GET / - Root endpoint
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "LeetCoach Recommendation Service",
        "version": "1.0.0",
        "endpoints": [
            "GET /health",
            "POST /api/v1/recommend",
            "GET /api/v1/user/{username}"
        ]
    }))
}

/// GET /health - Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = START_TIME.elapsed().as_secs() as i64;
    let llm_configured = state.llm.is_configured();

    Json(HealthResponse {
        healthy: llm_configured,
        service_name: config_rs::get_formatted_service_name("RECOMMEND"),
        uptime_seconds: uptime,
        status: if llm_configured { "SERVING" } else { "DEGRADED" }.to_string(),
    })
}

/// POST /api/v1/recommend - Run the full recommendation pipeline
async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(err) = validate_content_type(&headers, "application/json") {
        return err.to_response().into_response();
    }

    // The body is validated as JSON before deserialization so a missing or
    // malformed question is rejected here, before any upstream fetch.
    let body_value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            return ApiValidationError::InvalidFormat(format!(
                "Request body is not valid JSON: {}",
                err
            ))
            .to_response()
            .into_response();
        }
    };

    if let Err(err) = validate_recommend_request(&body_value) {
        return err.to_response().into_response();
    }

    let request: RecommendRequest = match serde_json::from_value(body_value) {
        Ok(request) => request,
        Err(err) => {
            return ApiValidationError::InvalidFormat(err.to_string())
                .to_response()
                .into_response();
        }
    };

    let request_id = uuid::Uuid::new_v4();
    log::info!(
        "[{}] Recommend request: username={} question_len={} sub_limit={:?}",
        request_id,
        request.username,
        request.question.len(),
        request.sub_limit
    );

    let limit = request.sub_limit.unwrap_or(DEFAULT_SUB_LIMIT);
    let bundle = state.leetcode.fetch_user_bundle(&request.username, limit).await;
    let stats = stats::build_stats(bundle.solved.as_ref(), bundle.submissions.as_ref());

    let payload = prompt::assemble_prompt(&request.question, stats.clone());

    let raw = match state.llm.generate(&payload).await {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("[{}] Model call aborted: {}", request_id, err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                    code: 500,
                }),
            )
                .into_response();
        }
    };

    let parsed = extract::extract_json(&raw);
    log::info!(
        "[{}] Pipeline complete: raw_len={} parsed={}",
        request_id,
        raw.len(),
        parsed.is_some()
    );

    (
        StatusCode::OK,
        Json(RecommendResponse { stats, raw, parsed }),
    )
        .into_response()
}

/// GET /api/v1/user/{username} - Raw profile overview with a probed summary
async fn user_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Response {
    log::info!("Profile overview request: username={}", username);

    let overview = state.leetcode.fetch_profile_overview(&username).await;

    // A missing profile, or one carrying an upstream error marker, means
    // the user does not exist.
    let profile_missing = match &overview.profile {
        None => true,
        Some(profile) => profile.get("error").map(|e| !e.is_null()).unwrap_or(false),
    };
    if profile_missing {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "User not found".to_string(),
                code: 404,
            }),
        )
            .into_response();
    }

    let canonical = stats::build_stats(overview.solved.as_ref(), overview.submissions.as_ref());
    let total_solved = stats::probe_total_solved(overview.solved.as_ref());
    let ranking = overview
        .profile
        .as_ref()
        .and_then(|profile| profile.get("ranking").cloned())
        .unwrap_or(Value::Null);

    Json(json!({
        "username": username,
        "profile": overview.profile,
        "solved": overview.solved,
        "contest": overview.contest,
        "submissions": overview.submissions,
        "badges": overview.badges,
        "languages": overview.languages,
        "summary": {
            "total_solved": total_solved,
            "easy": canonical.solved_easy,
            "medium": canonical.solved_medium,
            "hard": canonical.solved_hard,
            "ranking": ranking,
        },
    }))
    .into_response()
}
