use std::sync::Arc;
use std::time::Duration;
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::HubConfig;
use crate::error::TokenizeError;
use crate::tokenizer::{HuggingFaceTokenizer, TokenizerHandle};

/// Builds a tokenizer for a name by going out to a model repository.
///
/// This is the only place the provider touches the network, which is what
/// lets tests count fetches by swapping in their own implementation.
pub trait TokenizerFetcher: Send + Sync {
    fn fetch<'a>(&'a self, name: &'a str, credential: &'a str) -> BoxFuture<'a, Result<TokenizerHandle, TokenizeError>>;
}

/// Downloads `tokenizer.json` from a Hugging Face compatible hub.
#[derive(Debug, Clone)]
pub struct HubFetcher {
    client: Client,
    endpoint: String,
    revision: String,
}

impl HubFetcher {
    pub fn new(config: &HubConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(concat!("tokenwiz/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            revision: config.revision.clone(),
        })
    }

    /// URL of the tokenizer artifact for `name` at the configured revision
    pub fn tokenizer_url(&self, name: &str) -> String {
        self.file_url(name, "tokenizer.json")
    }

    fn file_url(&self, name: &str, file: &str) -> String {
        format!("{}/{}/resolve/{}/{}", self.endpoint, name, self.revision, file)
    }

    /// Whether the repository ships a sentencepiece `tokenizer.model`, which
    /// this service cannot load. Any failure to find out counts as no.
    async fn has_sentencepiece_model(&self, name: &str, credential: &str) -> bool {
        let url = self.file_url(name, "tokenizer.model");
        match self.client.head(&url).bearer_auth(credential).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Could not check for tokenizer.model");
                false
            }
        }
    }

    async fn download(&self, name: &str, credential: &str) -> Result<TokenizerHandle, TokenizeError> {
        let url = self.tokenizer_url(name);
        debug!(url = %url, "Downloading tokenizer artifact");

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| TokenizeError::Load(format!("request to {} failed: {}", url, e)))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(tokenizer = name, status = %response.status(), "Hub rejected credential");
                return Err(TokenizeError::Load(format!(
                    "access to '{}' was denied ({}); check that the access token is valid and has access to this repository",
                    name,
                    response.status()
                )));
            }
            StatusCode::NOT_FOUND => {
                if self.has_sentencepiece_model(name, credential).await {
                    return Err(TokenizeError::Load(format!(
                        "'{}' only ships a sentencepiece tokenizer.model; only tokenizer.json artifacts are supported",
                        name
                    )));
                }
                return Err(TokenizeError::Load(format!(
                    "'{}' is not a known tokenizer (no tokenizer.json at {})",
                    name, url
                )));
            }
            status => {
                return Err(TokenizeError::Load(format!(
                    "unexpected status {} while fetching {}",
                    status, url
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TokenizeError::Load(format!("failed to read {}: {}", url, e)))?;
        debug!(tokenizer = name, bytes = bytes.len(), "Tokenizer artifact downloaded");

        // Parsing a large vocabulary takes a while, keep it off the async workers
        let tokenizer = tokio::task::spawn_blocking(move || HuggingFaceTokenizer::from_bytes(&bytes)).await??;
        Ok(Arc::new(tokenizer))
    }
}

impl TokenizerFetcher for HubFetcher {
    fn fetch<'a>(&'a self, name: &'a str, credential: &'a str) -> BoxFuture<'a, Result<TokenizerHandle, TokenizeError>> {
        Box::pin(self.download(name, credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub_config(endpoint: &str) -> HubConfig {
        HubConfig {
            endpoint: endpoint.to_string(),
            revision: "main".to_string(),
            token_env: "HUGGINGFACE_TOKEN".to_string(),
            connect_timeout_secs: 5,
            fetch_timeout_secs: 30,
        }
    }

    #[test]
    fn test_tokenizer_url_layout() {
        let fetcher = HubFetcher::new(&hub_config("https://huggingface.co/")).unwrap();
        assert_eq!(
            fetcher.tokenizer_url("meta-llama/Llama-2-7b-chat-hf"),
            "https://huggingface.co/meta-llama/Llama-2-7b-chat-hf/resolve/main/tokenizer.json"
        );
        assert_eq!(
            fetcher.tokenizer_url("bert-base-uncased"),
            "https://huggingface.co/bert-base-uncased/resolve/main/tokenizer.json"
        );
        assert_eq!(
            fetcher.file_url("t5-small", "tokenizer.model"),
            "https://huggingface.co/t5-small/resolve/main/tokenizer.model"
        );
    }

    #[tokio::test]
    async fn test_unreachable_hub_is_load_error() {
        // Port 9 (discard) on localhost is essentially never listening
        let fetcher = HubFetcher::new(&hub_config("http://127.0.0.1:9")).unwrap();
        let err = fetcher.fetch("bert-base-uncased", "token").await.err().unwrap();
        assert_eq!(err.kind(), "load");
        assert!(err.message().contains("request to"));
    }
}
