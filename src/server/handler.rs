use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::TokenizeError;
use crate::provider::{CredentialSource, TokenizerProvider};
use crate::tokenizer::{spawn_tokenize, TokenizeResult};
use super::types::TokenizeRequest;

/// State shared by every request
pub struct AppState {
    /// Process-wide tokenizer cache
    pub provider: Arc<TokenizerProvider>,
    /// Where the hub access token comes from
    pub credentials: CredentialSource,
    /// Deadline for one request, first-time fetch included
    pub request_timeout: Duration,
    /// Map failures to 4xx/5xx instead of answering 200 with an error body
    pub error_status_codes: bool,
}

impl AppState {
    pub fn new(provider: Arc<TokenizerProvider>, credentials: CredentialSource, request_timeout: Duration) -> Self {
        Self {
            provider,
            credentials,
            request_timeout,
            error_status_codes: false,
        }
    }

    pub fn with_error_status_codes(mut self, enabled: bool) -> Self {
        self.error_status_codes = enabled;
        self
    }
}

/// Checks a tokenizer name has the hub's `name` or `owner/name` shape.
///
/// Names end up in a URL path, so anything outside `[A-Za-z0-9._-]` plus a
/// single `/` separator is refused before the provider sees it.
pub fn validate_tokenizer_name(name: &str) -> Result<(), TokenizeError> {
    if name.is_empty() {
        return Err(TokenizeError::Validation("tokenizer_name must not be empty".to_string()));
    }

    let invalid = |reason: &str| {
        TokenizeError::Validation(format!("tokenizer_name '{}' is invalid: {}", name, reason))
    };

    if let Some(c) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))) {
        return Err(invalid(&format!("unexpected character {:?}", c)));
    }
    if name.matches('/').count() > 1 {
        return Err(invalid("expected 'name' or 'owner/name'"));
    }
    if name.split('/').any(|part| part.is_empty() || part == "." || part.contains("..")) {
        return Err(invalid("empty or relative path segment"));
    }

    Ok(())
}

/// Tokenizes one request: validate, resolve the tokenizer, encode.
///
/// This is the error boundary of the service. Whatever fails on the way,
/// including a panicking tokenizer or the request deadline, comes back as a
/// [`TokenizeError`] for the caller to render.
pub async fn handle(state: &AppState, request: TokenizeRequest) -> Result<TokenizeResult, TokenizeError> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    info!(
        request_id = %request_id,
        tokenizer = %request.tokenizer_name,
        chars = request.text.chars().count(),
        "Tokenize request received"
    );

    let outcome = match tokio::time::timeout(state.request_timeout, run(state, request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(TokenizeError::Unexpected(format!(
            "request timed out after {}s",
            state.request_timeout.as_secs_f64()
        ))),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(result) => info!(request_id = %request_id, tokens = result.len(), elapsed_ms, "Tokenize request completed"),
        Err(e @ TokenizeError::Unexpected(_)) => {
            error!(request_id = %request_id, kind = e.kind(), error = %e, elapsed_ms, "Tokenize request failed")
        }
        Err(e) => warn!(request_id = %request_id, kind = e.kind(), error = %e, elapsed_ms, "Tokenize request failed"),
    }

    outcome
}

async fn run(state: &AppState, request: TokenizeRequest) -> Result<TokenizeResult, TokenizeError> {
    validate_tokenizer_name(&request.tokenizer_name)?;

    let credential = state.credentials.lookup()?;
    let tokenizer = state.provider.resolve(&request.tokenizer_name, &credential).await?;

    spawn_tokenize(tokenizer, request.text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_hub_style_names() {
        for name in ["bert-base-uncased", "gpt2", "meta-llama/Llama-2-7b-chat-hf", "Qwen/Qwen2.5-0.5B", "org/model_v1.5"] {
            assert!(validate_tokenizer_name(name).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in ["", "has space", "a/b/c", "/leading", "trailing/", "../etc/passwd", "owner/..", "a//b", "name?x=1", "."] {
            let err = validate_tokenizer_name(name).unwrap_err();
            assert_eq!(err.kind(), "validation", "{} should be rejected", name);
        }
    }
}
