use crate::error::TokenizeError;
use super::strategy::{Encoded, TokenizerStrategy};

/// Tokenizer backed by a `tokenizer.json` artifact, run through the
/// `tokenizers` runtime.
///
/// Normalization, pre-tokenization, the sub-word model and the special-token
/// template all come from the artifact itself; this type only asks for
/// character offsets on the way out. Padding and truncation settings shipped
/// in the artifact are dropped, so every token of the text is reported and no
/// pad tokens are appended.
pub struct HuggingFaceTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HuggingFaceTokenizer {
    /// Parses a serialized `tokenizer.json`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenizeError> {
        let mut inner = tokenizers::Tokenizer::from_bytes(bytes)
            .map_err(|e| TokenizeError::Load(format!("malformed tokenizer.json: {}", e)))?;
        inner.with_padding(None);
        inner
            .with_truncation(None)
            .map_err(|e| TokenizeError::Load(format!("cannot disable truncation: {}", e)))?;
        Ok(Self { inner })
    }
}

impl TokenizerStrategy for HuggingFaceTokenizer {
    fn encode(&self, text: &str) -> Result<Encoded, TokenizeError> {
        let encoding = self
            .inner
            .encode_char_offsets(text, true)
            .map_err(|e| TokenizeError::Tokenization(e.to_string()))?;

        Ok(Encoded {
            ids: encoding.get_ids().to_vec(),
            offsets: encoding.get_offsets().to_vec(),
        })
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}
