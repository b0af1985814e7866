pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::models::upload::UploadCategory;
use crate::services::{
    ai_service::{AIService, CompletionClient},
    identity_service::{FirebaseVerifier, IdentityVerifier},
    quiz_service::QuizService,
    upload_service::UploadService,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub upload_service: UploadService,
    pub quiz_service: QuizService,
    /// `None` leaves gated routes open.
    pub identity: Option<Arc<dyn IdentityVerifier>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .build()?;

        let ai_service = AIService::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.openai_model.clone(),
            Duration::from_secs(config.openai_timeout_secs),
            http_client.clone(),
        );
        if config.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set, generated quizzes will use the fallback");
        }
        tracing::info!(model = %ai_service.model(), "Completion client ready");

        let upload_service = UploadService::new(config.data_dir.clone());
        let quiz_service = QuizService::new(
            Arc::new(ai_service),
            upload_service.category_dir(UploadCategory::Syllabus),
            config.question_bank_dir.clone(),
            config.quiz_sample_size,
        );

        let identity = match &config.firebase {
            Some(credentials) => {
                match FirebaseVerifier::new(credentials, config.firebase_jwks_url.clone(), http_client) {
                    Ok(verifier) => Some(Arc::new(verifier) as Arc<dyn IdentityVerifier>),
                    Err(e) => {
                        tracing::warn!("Firebase init failed, protected routes are open: {}", e);
                        None
                    }
                }
            }
            None => {
                tracing::warn!("Firebase credentials not configured, protected routes are open");
                None
            }
        };

        Ok(Self::from_parts(upload_service, quiz_service, identity))
    }

    pub fn from_parts(
        upload_service: UploadService,
        quiz_service: QuizService,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        Self {
            upload_service,
            quiz_service,
            identity,
        }
    }

    /// State wired to an arbitrary completion client, for callers that do
    /// not talk to the hosted API.
    pub fn with_completion_client(
        config: &Config,
        completion: Arc<dyn CompletionClient>,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        let upload_service = UploadService::new(config.data_dir.clone());
        let quiz_service = QuizService::new(
            completion,
            upload_service.category_dir(UploadCategory::Syllabus),
            config.question_bank_dir.clone(),
            config.quiz_sample_size,
        );
        Self::from_parts(upload_service, quiz_service, identity)
    }
}
