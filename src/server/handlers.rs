//! Request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::ApiState;
use crate::apply::ApplyError;
use crate::storage::Platform;
use crate::translate::{TranslateError, TranslationOutcome};

/// Body accepted by both routes
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_email: String,
    pub platform: String,
}

/// Lambda-style envelope the frontend expects
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    #[serde(rename = "statusCode")]
    status_code: u16,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<T>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn envelope<T: Serialize>(status: StatusCode, body: String, report: Option<T>) -> Response {
    let response = ApiResponse {
        status_code: status.as_u16(),
        body,
        report,
    };
    (status, Json(response)).into_response()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Unpack the JSON body and parse the platform, or produce the 400 response
fn parse_request(
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(String, Platform), Response> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "Request must be JSON")
    })?;

    let platform = request
        .platform
        .parse::<Platform>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;
    Ok((request.user_email, platform))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn translate_files(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Response {
    let (user, platform) = match parse_request(payload) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    info!(user = %user, %platform, "Translation requested");

    match state.translation.run(&user, platform).await {
        Ok(TranslationOutcome::Completed(report)) => {
            let body = if report.is_partial() {
                report.summary()
            } else {
                format!(
                    "All Terraform files for {} have been processed and saved to the {} folder.",
                    user,
                    report.target_platform.as_str().to_uppercase()
                )
            };
            envelope(StatusCode::OK, body, Some(report))
        }
        Ok(TranslationOutcome::NotFound { .. }) => envelope::<()>(
            StatusCode::NOT_FOUND,
            format!("No files found for the specified user and platform: {platform}"),
            None,
        ),
        Err(TranslateError::Validation(message)) => error_response(StatusCode::BAD_REQUEST, message),
        Err(e) => {
            error!(user = %user, "Translation failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

pub async fn apply_terraform(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Response {
    let (user, platform) = match parse_request(payload) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    info!(user = %user, %platform, "Apply requested");

    match state.apply.run(&user, platform).await {
        Ok(report) if report.succeeded => envelope(
            StatusCode::OK,
            format!("Terraform applied for {platform}."),
            Some(report),
        ),
        Ok(report) => envelope(StatusCode::BAD_GATEWAY, report.summary(), Some(report)),
        Err(ApplyError::Validation(message)) => error_response(StatusCode::BAD_REQUEST, message),
        Err(e @ ApplyError::Download(_)) => {
            error!(user = %user, "Apply failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            error!(user = %user, "Apply failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
