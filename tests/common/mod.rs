#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use tokenwiz::config::HubConfig;
use tokenwiz::provider::{CredentialSource, HubFetcher, TokenizerProvider};
use tokenwiz::server::{ApiServer, AppState};

pub const BERT_TINY: &str = include_str!("../fixtures/bert_tiny.json");
pub const TOKEN: &str = "hf_test_token";

/// Stand-in for the model hub.
///
/// Serves the tiny BERT tokenizer for any `<name>/resolve/main/tokenizer.json`
/// whose name contains `bert-tiny`, answers 404 for everything else, and a
/// garbage body for names starting with `broken/`. Repositories under `spm/`
/// only have a sentencepiece `tokenizer.model`. Repositories under `slow/`
/// block until something under `fast/` has been served.
pub struct FakeHub {
    pub addr: SocketAddr,
    state: Arc<HubState>,
}

struct HubState {
    hits: Mutex<HashMap<String, usize>>,
    delay: Duration,
    gate: Notify,
}

impl FakeHub {
    pub async fn start(delay: Duration) -> FakeHub {
        let state = Arc::new(HubState {
            hits: Mutex::new(HashMap::new()),
            delay,
            gate: Notify::new(),
        });

        let app = Router::new().fallback(serve_artifact).with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeHub { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of artifact downloads for one repository name
    pub fn hits(&self, name: &str) -> usize {
        let path = format!("/{}/resolve/main/tokenizer.json", name);
        self.state.hits.lock().unwrap().get(&path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            endpoint: self.endpoint(),
            revision: "main".to_string(),
            token_env: "HUGGINGFACE_TOKEN".to_string(),
            connect_timeout_secs: 5,
            fetch_timeout_secs: 30,
        }
    }

    pub fn provider(&self) -> Arc<TokenizerProvider> {
        let fetcher = HubFetcher::new(&self.hub_config()).unwrap();
        Arc::new(TokenizerProvider::new(Arc::new(fetcher)))
    }

    pub fn state(&self, credentials: CredentialSource) -> AppState {
        AppState::new(self.provider(), credentials, Duration::from_secs(30))
    }

    pub fn router(&self) -> Router {
        ApiServer::new(self.state(CredentialSource::Static(TOKEN.to_string())), "127.0.0.1".to_string(), 0).router()
    }
}

async fn serve_artifact(State(state): State<Arc<HubState>>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_default() += 1;

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    if path.starts_with("/slow/") {
        state.gate.notified().await;
    }
    if path.starts_with("/fast/") {
        state.gate.notify_one();
    }
    tokio::time::sleep(state.delay).await;

    if path.starts_with("/broken/") {
        return (StatusCode::OK, "<html>not a tokenizer</html>").into_response();
    }
    if path.starts_with("/spm/") && path.ends_with("/resolve/main/tokenizer.model") {
        return (StatusCode::OK, "sentencepiece model").into_response();
    }
    if path.contains("bert-tiny") && path.ends_with("/resolve/main/tokenizer.json") {
        return (StatusCode::OK, BERT_TINY).into_response();
    }
    (StatusCode::NOT_FOUND, "Repository not found").into_response()
}

pub fn tokenize_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tokenize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn tokenize_body(text: &str, tokenizer_name: &str) -> String {
    serde_json::json!({ "text": text, "tokenizer_name": tokenizer_name }).to_string()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
