use rand::{seq::SliceRandom, Rng};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// One multiple-choice question. `answer` indexes into `options` and is
/// served as authored; banks are trusted to keep it in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: i64,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl QuestionRecord {
    pub fn new(question: &str, options: &[&str], answer: i64) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    /// Draws `amount` distinct questions in random order, or `None` when the
    /// bank holds fewer than that.
    pub fn sample<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Option<Vec<QuestionRecord>> {
        if self.questions.len() < amount {
            return None;
        }
        Some(
            self.questions
                .choose_multiple(rng, amount)
                .cloned()
                .collect(),
        )
    }
}

/// Per-unit questions keyed `unit_<id>`, serialized in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quiz {
    units: Vec<(String, Vec<QuestionRecord>)>,
}

impl Quiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_for(unit_id: &str) -> String {
        format!("unit_{}", unit_id)
    }

    /// Replaces the entry in place when the unit is already present.
    pub fn insert(&mut self, unit_id: &str, questions: Vec<QuestionRecord>) {
        let key = Self::key_for(unit_id);
        match self.units.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = questions,
            None => self.units.push((key, questions)),
        }
    }

    pub fn get(&self, unit_id: &str) -> Option<&[QuestionRecord]> {
        let key = Self::key_for(unit_id);
        self.units
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, q)| q.as_slice())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Serialize for Quiz {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.units.len()))?;
        for (key, questions) in &self.units {
            map.serialize_entry(key, questions)?;
        }
        map.end()
    }
}

/// Served when the completion provider cannot produce a quiz.
pub fn fallback_quiz() -> Vec<QuestionRecord> {
    vec![
        QuestionRecord::new(
            "What is DBMS?",
            &["Software", "Hardware", "Network", "Protocol"],
            0,
        ),
        QuestionRecord::new(
            "Which language is used to query databases?",
            &["HTML", "SQL", "CSS", "Python"],
            1,
        ),
    ]
}
