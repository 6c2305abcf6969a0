mod strategy;
mod huggingface;
mod engine;
pub mod types;

pub use strategy::{Encoded, TokenizerHandle, TokenizerStrategy};
pub use huggingface::HuggingFaceTokenizer;
pub use engine::{spawn_tokenize, tokenize};
pub use types::{TokenSpan, TokenizeResult};
