use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::TokenizeError;
use crate::tokenizer::TokenizeResult;
use super::handler::{self, AppState};
use super::types::{ErrorResponse, HealthResponse, TokenizeRequest, TokenizeResponse};

/// Returns a health check response with the number of loaded tokenizers
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Health check endpoint called");
    Json(HealthResponse {
        status: "ok".to_string(),
        cached_tokenizers: state.provider.cached_count(),
    })
}

/// Tokenizes `text` with the tokenizer named `tokenizer_name`.
///
/// The body is parsed here rather than through the `Json` extractor so a
/// malformed request still gets an `{"error": ...}` body instead of axum's
/// plain-text rejection.
pub async fn tokenize(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let outcome = match parse_request(&body) {
        Ok(request) => handler::handle(&state, request).await,
        Err(e) => {
            info!(error = %e, "Rejected malformed tokenize request");
            Err(e)
        }
    };

    render(outcome, state.error_status_codes)
}

fn parse_request(body: &[u8]) -> Result<TokenizeRequest, TokenizeError> {
    serde_json::from_slice(body).map_err(|e| TokenizeError::Validation(format!("invalid request body: {}", e)))
}

/// Turns the handler outcome into the wire format.
///
/// With `error_status_codes` off every answer is a 200 and failures are only
/// visible in the body, which is what existing clients expect.
pub fn render(outcome: Result<TokenizeResult, TokenizeError>, error_status_codes: bool) -> Response {
    match outcome {
        Ok(tokens) => (StatusCode::OK, Json(TokenizeResponse::Tokens(tokens))).into_response(),
        Err(e) => {
            let status = if error_status_codes { status_for(&e) } else { StatusCode::OK };
            let body = TokenizeResponse::Error(ErrorResponse { error: e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}

fn status_for(err: &TokenizeError) -> StatusCode {
    match err {
        TokenizeError::Validation(_) => StatusCode::BAD_REQUEST,
        TokenizeError::Load(_) => StatusCode::BAD_GATEWAY,
        TokenizeError::Tokenization(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TokenizeError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
