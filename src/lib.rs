//! # tokenwiz
//!
//! Tokenization over HTTP: given a text and the name of a tokenizer on the
//! model hub, return every token id together with the character span it covers.
//!
//! ```text
//! POST /tokenize {"text": "Hello world", "tokenizer_name": "bert-base-uncased"}
//! => [[101,[0,0]],[7592,[0,5]],[2088,[6,11]],[102,[0,0]]]
//! ```
//!
//! Request handling lives in [`server`], tokenizer loading and caching in
//! [`provider`], and the encode-and-pair step in [`tokenizer`].

pub mod config;
pub mod error;
pub mod provider;
pub mod server;
pub mod tokenizer;

pub use error::TokenizeError;
