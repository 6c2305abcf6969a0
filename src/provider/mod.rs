//! # Tokenizer Provider
//!
//! Resolves a tokenizer name to a loaded [`TokenizerHandle`](crate::tokenizer::TokenizerHandle).
//!
//! ## Key Components
//!
//! - `TokenizerProvider`: process-wide cache keyed by tokenizer name, with at
//!   most one in-flight load per name
//! - `TokenizerFetcher`: the seam to the model repository; `HubFetcher` is the
//!   HTTP implementation
//! - `CredentialSource`: where the bearer token for gated repositories comes from
//!
//! ## Concurrency
//!
//! The name → cell map sits behind a `RwLock` that is only held long enough to
//! find or insert a cell. Each cell is a `tokio::sync::OnceCell`, so callers
//! racing on an unseen name all wait on the same fetch while loads for other
//! names proceed untouched. A failed or abandoned load leaves the cell empty
//! and the next caller tries again.

mod credential;
mod fetcher;
mod provider;

pub use credential::CredentialSource;
pub use fetcher::{HubFetcher, TokenizerFetcher};
pub use provider::TokenizerProvider;
