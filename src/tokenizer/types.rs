use serde::ser::{Serialize, Serializer};
use serde::de::{Deserialize, Deserializer};

/// One token id together with its span in the original text.
///
/// On the wire a span is the pair `[token_id, [offset_start, offset_end]]`,
/// which is what the editor frontends index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub token_id: u32,
    pub offset_start: usize,
    pub offset_end: usize,
}

impl TokenSpan {
    pub fn new(token_id: u32, (offset_start, offset_end): (usize, usize)) -> Self {
        Self { token_id, offset_start, offset_end }
    }

    /// Tokens the tokenizer inserted itself ([CLS], <s>, ...) have no source span
    pub fn is_special(&self) -> bool {
        self.offset_start == 0 && self.offset_end == 0
    }
}

impl Serialize for TokenSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.token_id, (self.offset_start, self.offset_end)).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (token_id, offsets) = <(u32, (usize, usize))>::deserialize(deserializer)?;
        Ok(TokenSpan::new(token_id, offsets))
    }
}

/// Ordered token spans, exactly as the tokenizer emitted them
pub type TokenizeResult = Vec<TokenSpan>;
