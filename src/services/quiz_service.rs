use crate::error::{Error, Result};
use crate::models::question::{fallback_quiz, QuestionBank, QuestionRecord, Quiz};
use crate::services::ai_service::CompletionClient;
use crate::utils::validation::is_valid_unit_id;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

pub const GENERATE_SYSTEM_PROMPT: &str = "Generate 2 MCQ quiz questions in JSON format.";

#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedQuiz {
    /// Raw assistant text, passed through unparsed.
    Model(String),
    Fallback(Vec<QuestionRecord>),
}

#[derive(Clone)]
pub struct QuizService {
    completion: Arc<dyn CompletionClient>,
    syllabus_dir: PathBuf,
    bank_dir: PathBuf,
    sample_size: usize,
}

impl QuizService {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        syllabus_dir: PathBuf,
        bank_dir: PathBuf,
        sample_size: usize,
    ) -> Self {
        Self {
            completion,
            syllabus_dir,
            bank_dir,
            sample_size,
        }
    }

    /// Space-joined names of the uploaded syllabus files. Empty when nothing
    /// has been uploaded yet.
    pub async fn syllabus_context(&self) -> Result<String> {
        let mut entries = match fs::read_dir(&self.syllabus_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names.join(" "))
    }

    /// Makes exactly one completion call; any provider failure yields the
    /// fixed fallback quiz instead.
    pub async fn generate_quiz(&self) -> GeneratedQuiz {
        let context = match self.syllabus_context().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not list syllabus uploads, continuing without context: {}", e);
                String::new()
            }
        };

        let user_prompt = format!("Syllabus topics: {}", context);
        match self
            .completion
            .complete(GENERATE_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(text) => GeneratedQuiz::Model(text),
            Err(e) => {
                tracing::warn!(error = %e, "Completion provider failed, serving fallback quiz");
                GeneratedQuiz::Fallback(fallback_quiz())
            }
        }
    }

    /// Samples each requested unit's bank in request order. Units without a
    /// bank file are left out of the result.
    pub async fn get_quiz(&self, unit_ids: &[String]) -> Result<Quiz> {
        let mut quiz = Quiz::new();

        for unit in unit_ids {
            let Some(bank) = self.load_bank(unit).await? else {
                tracing::debug!(unit = %unit, "No question bank for unit, skipping");
                continue;
            };

            let picked = bank
                .sample(self.sample_size, &mut rand::thread_rng())
                .ok_or_else(|| Error::SampleSize {
                    unit: unit.clone(),
                    available: bank.questions.len(),
                    requested: self.sample_size,
                })?;
            quiz.insert(unit, picked);
        }

        Ok(quiz)
    }

    async fn load_bank(&self, unit: &str) -> Result<Option<QuestionBank>> {
        if !is_valid_unit_id(unit) {
            return Ok(None);
        }

        let path = self.bank_dir.join(format!("unit{}.json", unit));
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        serde_json::from_slice(&raw).map(Some).map_err(|e| {
            Error::Internal(format!(
                "Invalid question bank {}: {}",
                path.display(),
                e
            ))
        })
    }
}
