use std::sync::Arc;
use crate::error::TokenizeError;

/// Raw output of a tokenizer run: two parallel sequences, one entry per token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Token ids in emission order
    pub ids: Vec<u32>,
    /// Half-open character ranges into the input, `(0, 0)` for inserted tokens
    pub offsets: Vec<(usize, usize)>,
}

/// Trait defining the interface for all tokenizer implementations
pub trait TokenizerStrategy: Send + Sync {
    /// Encode `text` with the tokenizer's own special-token policy, tracking
    /// character offsets for every produced token.
    fn encode(&self, text: &str) -> Result<Encoded, TokenizeError>;

    /// Size of the vocabulary including added tokens
    fn vocab_size(&self) -> usize;
}

/// Shared, read-only tokenizer as stored in the provider cache
pub type TokenizerHandle = Arc<dyn TokenizerStrategy>;
