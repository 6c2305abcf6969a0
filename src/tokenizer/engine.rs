use tracing::debug;

use crate::error::TokenizeError;
use super::strategy::{TokenizerHandle, TokenizerStrategy};
use super::types::{TokenSpan, TokenizeResult};

/// Runs `tokenizer` over `text` and pairs every token id with its span.
///
/// The order is the tokenizer's emission order. Nothing is sorted, merged or
/// dropped, so special tokens stay where the tokenizer put them.
pub fn tokenize(tokenizer: &dyn TokenizerStrategy, text: &str) -> Result<TokenizeResult, TokenizeError> {
    let encoded = tokenizer.encode(text)?;

    if encoded.ids.len() != encoded.offsets.len() {
        return Err(TokenizeError::Tokenization(format!(
            "tokenizer returned {} ids but {} offsets",
            encoded.ids.len(),
            encoded.offsets.len()
        )));
    }

    let result: TokenizeResult = encoded
        .ids
        .into_iter()
        .zip(encoded.offsets)
        .map(|(id, offsets)| TokenSpan::new(id, offsets))
        .collect();

    debug!(chars = text.chars().count(), tokens = result.len(), "Tokenized text");
    Ok(result)
}

/// Same as [`tokenize`] but on tokio's blocking pool, since encoding is
/// CPU-bound. A panic inside the tokenizer comes back as
/// [`TokenizeError::Unexpected`] instead of unwinding into the caller.
pub async fn spawn_tokenize(tokenizer: TokenizerHandle, text: String) -> Result<TokenizeResult, TokenizeError> {
    tokio::task::spawn_blocking(move || tokenize(tokenizer.as_ref(), &text)).await?
}
