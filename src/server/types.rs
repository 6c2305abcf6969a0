use serde::{Deserialize, Serialize};
use crate::tokenizer::TokenizeResult;

/// Body of `POST /tokenize`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenizeRequest {
    pub text: String,
    pub tokenizer_name: String,
}

/// Returned in place of the token array whenever anything goes wrong
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// What the tokenize endpoint sends back: a bare array on success, an object
/// with an `error` key otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TokenizeResponse {
    Tokens(TokenizeResult),
    Error(ErrorResponse),
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cached_tokenizers: usize,
}
