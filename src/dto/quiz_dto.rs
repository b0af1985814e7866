use crate::models::question::{QuestionRecord, Quiz};
use crate::services::quiz_service::GeneratedQuiz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit identifiers arrive as JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitId {
    Text(String),
    Number(i64),
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Text(s) => f.write_str(s),
            UnitId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetQuizRequest {
    pub units: Vec<UnitId>,
}

impl GetQuizRequest {
    pub fn unit_ids(&self) -> Vec<String> {
        self.units.iter().map(|u| u.to_string()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetQuizResponse {
    pub quiz: Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizSource {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "mock")]
    Mock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedQuizPayload {
    Text(String),
    Questions(Vec<QuestionRecord>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub source: QuizSource,
    pub quiz: GeneratedQuizPayload,
}

impl From<GeneratedQuiz> for GenerateQuizResponse {
    fn from(generated: GeneratedQuiz) -> Self {
        match generated {
            GeneratedQuiz::Model(text) => Self {
                source: QuizSource::OpenAi,
                quiz: GeneratedQuizPayload::Text(text),
            },
            GeneratedQuiz::Fallback(questions) => Self {
                source: QuizSource::Mock,
                quiz: GeneratedQuizPayload::Questions(questions),
            },
        }
    }
}
