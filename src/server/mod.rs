//! HTTP surface of the service: one tokenize operation plus a health probe.

mod handler;
pub mod routes;
mod server;
pub mod types;

pub use handler::{handle, validate_tokenizer_name, AppState};
pub use server::ApiServer;
