use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "pricing management";
pub const DEFAULT_COUNT: i64 = 5;
pub const MAX_COUNT: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub num_questions: Option<i64>,
    #[serde(default)]
    pub include_visuals: bool,
}

impl GenerateRequest {
    pub fn topic(&self) -> &str {
        match self.topic.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TOPIC,
        }
    }

    pub fn count(&self) -> i64 {
        self.num_questions.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQuestions {
    pub questions: Vec<GeneratedQuestion>,
}
