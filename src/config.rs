use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("Invalid value for APP_ENV: {}", other))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Service-account fields needed to bring up ID-token verification.
#[derive(Debug, Clone)]
pub struct FirebaseCredentials {
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub client_cert_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub data_dir: PathBuf,
    pub question_bank_dir: PathBuf,
    pub quiz_sample_size: usize,
    pub max_upload_bytes: usize,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub firebase: Option<FirebaseCredentials>,
    pub firebase_jwks_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: Environment::Development,
            data_dir: PathBuf::from("./data"),
            question_bank_dir: PathBuf::from("./questions"),
            quiz_sample_size: 5,
            max_upload_bytes: 50 * 1024 * 1024,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_timeout_secs: 60,
            firebase: None,
            firebase_jwks_url: DEFAULT_FIREBASE_JWKS_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let config = Self {
            host: get_env_or("HOST", defaults.host),
            port: get_env_parse_or("PORT", defaults.port)?,
            environment: match get_env_opt("APP_ENV") {
                Some(raw) => Environment::parse(&raw)?,
                None => defaults.environment,
            },
            data_dir: get_env_opt("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            question_bank_dir: get_env_opt("QUESTION_BANK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.question_bank_dir),
            quiz_sample_size: get_env_parse_or("QUIZ_SAMPLE_SIZE", defaults.quiz_sample_size)?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            openai_api_key: get_env_opt("OPENAI_API_KEY"),
            openai_base_url: get_env_url_or("OPENAI_BASE_URL", defaults.openai_base_url)?,
            openai_model: get_env_or("OPENAI_MODEL", defaults.openai_model),
            openai_timeout_secs: get_env_parse_or(
                "OPENAI_TIMEOUT_SECS",
                defaults.openai_timeout_secs,
            )?,
            firebase: firebase_from_env(),
            firebase_jwks_url: get_env_url_or("FIREBASE_JWKS_URL", defaults.firebase_jwks_url)?,
        };

        if config.quiz_sample_size == 0 {
            return Err(Error::Config(
                "QUIZ_SAMPLE_SIZE must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns `None` unless every credential variable is set.
fn firebase_from_env() -> Option<FirebaseCredentials> {
    Some(FirebaseCredentials {
        project_id: get_env_opt("FIREBASE_PROJECT_ID")?,
        // .env files usually carry the PEM with escaped newlines
        private_key: get_env_opt("FIREBASE_PRIVATE_KEY")?.replace("\\n", "\n"),
        client_email: get_env_opt("FIREBASE_CLIENT_EMAIL")?,
        client_id: get_env_opt("FIREBASE_CLIENT_ID")?,
        client_cert_url: get_env_opt("FIREBASE_CLIENT_CERT_URL")?,
    })
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or(name: &str, default: String) -> String {
    get_env_opt(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn get_env_url_or(name: &str, default: String) -> Result<String> {
    let raw = get_env_or(name, default);
    Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))?;
    Ok(raw)
}
