use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tokenization service returning token ids with their character spans
#[derive(Debug, Parser)]
#[command(name = "tokenwiz", version, about)]
pub struct Cli {
    /// Directory holding default.toml and an optional local.toml
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default)
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Tokenize a single text and print the JSON response
    Tokenize {
        /// Hub name of the tokenizer, e.g. bert-base-uncased
        #[arg(short, long)]
        tokenizer: String,
        /// Text to tokenize
        text: String,
    },
}
