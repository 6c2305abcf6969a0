use std::error::Error;
use std::fmt;

/// Every way a tokenize request can fail.
///
/// Each variant carries a human-readable message that ends up verbatim in the
/// `{"error": ...}` body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Malformed or missing request fields, detected before any fetch
    Validation(String),
    /// The tokenizer could not be obtained (unknown name, rejected credential,
    /// network or parse failure)
    Load(String),
    /// A resolved tokenizer failed while encoding the input text
    Tokenization(String),
    /// Anything else, including panics and elapsed deadlines
    Unexpected(String),
}

impl TokenizeError {
    /// Short machine-friendly name of the error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            TokenizeError::Validation(_) => "validation",
            TokenizeError::Load(_) => "load",
            TokenizeError::Tokenization(_) => "tokenization",
            TokenizeError::Unexpected(_) => "unexpected",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TokenizeError::Validation(msg)
            | TokenizeError::Load(msg)
            | TokenizeError::Tokenization(msg)
            | TokenizeError::Unexpected(msg) => msg,
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenizeError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            TokenizeError::Load(msg) => write!(f, "Failed to load tokenizer: {}", msg),
            TokenizeError::Tokenization(msg) => write!(f, "Tokenization failed: {}", msg),
            TokenizeError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl Error for TokenizeError {}

impl From<tokio::task::JoinError> for TokenizeError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            TokenizeError::Unexpected(format!("tokenizer task panicked: {}", err))
        } else {
            TokenizeError::Unexpected(format!("tokenizer task was cancelled: {}", err))
        }
    }
}
