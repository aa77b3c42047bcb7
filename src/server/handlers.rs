//! HTTP handlers for analysis and fix application.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use super::AppState;
use crate::fix::FixError;
use crate::schema::{FixSuggestion, ValidationError, output_schema, validate_request};

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFixRequest {
    pub current_code: String,
    pub fix_id: String,
    pub candidates: Vec<FixSuggestion>,
}

// ── Response helpers ─────────────────────────────────────────────────

fn error_response(status: StatusCode, error: &str, details: Value) -> Response {
    (status, Json(json!({ "error": error, "details": details }))).into_response()
}

fn invalid_input(err: &ValidationError) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid input",
        serde_json::to_value(err).unwrap_or(Value::Null),
    )
}

fn body_or_invalid(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Response> {
    body.map(|Json(v)| v)
        .map_err(|rejection| invalid_input(&ValidationError::single("", rejection.body_text())))
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `POST /analyze`
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body_or_invalid(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let request = match validate_request(&body) {
        Ok(r) => r,
        Err(e) => return invalid_input(&e),
    };

    match state.analyzer.analyze(&request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!("Error in /analyze: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to analyze code",
                Value::String(e.to_string()),
            )
        }
    }
}

/// `POST /apply-fix`
pub async fn apply_fix(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body_or_invalid(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let request: ApplyFixRequest = match serde_json::from_value(body) {
        Ok(r) => r,
        Err(e) => return invalid_input(&ValidationError::single("", e.to_string())),
    };

    match state
        .applicator
        .apply_fix(&request.current_code, &request.fix_id, &request.candidates)
    {
        Ok(result) => Json(result).into_response(),
        Err(FixError::NotFound(id)) => error_response(
            StatusCode::NOT_FOUND,
            "Fix suggestion not found.",
            Value::String(id),
        ),
    }
}

/// `GET /schema`
pub async fn schema() -> Json<Value> {
    Json(output_schema())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
