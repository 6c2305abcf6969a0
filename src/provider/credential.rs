use std::fmt;
use crate::error::TokenizeError;

/// Where the model-repository access token is read from.
///
/// The lookup happens per request, so a missing token only shows up when a
/// tokenizer is first requested, never at startup.
#[derive(Clone)]
pub enum CredentialSource {
    /// Read from the named environment variable
    Env(String),
    /// Fixed token, mostly useful for tests and the CLI
    Static(String),
}

impl CredentialSource {
    pub fn lookup(&self) -> Result<String, TokenizeError> {
        match self {
            CredentialSource::Env(var) => match std::env::var(var) {
                Ok(token) if !token.trim().is_empty() => Ok(token),
                Ok(_) => Err(TokenizeError::Load(format!("access token in {} is empty", var))),
                Err(_) => Err(TokenizeError::Load(format!("access token {} is not set", var))),
            },
            CredentialSource::Static(token) => Ok(token.clone()),
        }
    }
}

// Never print the token itself
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CredentialSource::Env(var) => f.debug_tuple("Env").field(var).finish(),
            CredentialSource::Static(_) => f.write_str("Static(<redacted>)"),
        }
    }
}
