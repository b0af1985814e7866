#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use serde_json::Value as JsonValue;
use studysync_backend::{
    config::Config,
    routes,
    services::{
        ai_service::{CompletionClient, ProviderError},
        identity_service::IdentityVerifier,
    },
    AppState,
};
use tempfile::TempDir;

pub const BOUNDARY: &str = "studysync-test-boundary";

/// Completion client that answers from a canned reply and records prompts.
pub struct StubCompletion {
    reply: Option<String>,
    calls: AtomicUsize,
    last_user_prompt: Mutex<Option<String>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            last_user_prompt: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_user_prompt: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.last_user_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_prompt.lock().unwrap() = Some(user.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::Status {
                status: 500,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub data_dir: TempDir,
    pub bank_dir: TempDir,
}

impl TestApp {
    pub fn config(data_dir: &Path, bank_dir: &Path) -> Config {
        Config {
            data_dir: data_dir.to_path_buf(),
            question_bank_dir: bank_dir.to_path_buf(),
            ..Config::default()
        }
    }

    pub fn with_completion(completion: Arc<dyn CompletionClient>) -> Self {
        Self::build(completion, None)
    }

    pub fn build(
        completion: Arc<dyn CompletionClient>,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        Self::build_with(completion, identity, |_| {})
    }

    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        Self::build_with(StubCompletion::failing(), None, |config| {
            config.max_upload_bytes = max_upload_bytes;
        })
    }

    fn build_with(
        completion: Arc<dyn CompletionClient>,
        identity: Option<Arc<dyn IdentityVerifier>>,
        adjust: impl FnOnce(&mut Config),
    ) -> Self {
        let data_dir = tempfile::tempdir().expect("data dir");
        let bank_dir = tempfile::tempdir().expect("bank dir");
        let mut config = Self::config(data_dir.path(), bank_dir.path());
        adjust(&mut config);
        let state = AppState::with_completion_client(&config, completion, identity);
        Self {
            router: routes::app(state, &config),
            data_dir,
            bank_dir,
        }
    }

    /// Writes `unit<id>.json` with `count` numbered questions.
    pub fn write_bank(&self, unit: &str, count: usize) {
        let questions: Vec<JsonValue> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Unit {} question {}", unit, i),
                    "options": ["A", "B", "C", "D"],
                    "answer": i % 4
                })
            })
            .collect();
        let bank = serde_json::json!({ "questions": questions });
        std::fs::write(
            self.bank_dir.path().join(format!("unit{}.json", unit)),
            serde_json::to_vec_pretty(&bank).unwrap(),
        )
        .expect("write bank");
    }

    pub fn write_raw_bank(&self, unit: &str, raw: &str) {
        std::fs::write(
            self.bank_dir.path().join(format!("unit{}.json", unit)),
            raw,
        )
        .expect("write bank");
    }
}

pub struct Part<'a> {
    pub field: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(field: &'a str, filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            field,
            filename: Some(filename),
            content,
        }
    }

    pub fn text(field: &'a str, content: &'a [u8]) -> Self {
        Self {
            field,
            filename: None,
            content,
        }
    }
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                part.field, filename
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.field
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
