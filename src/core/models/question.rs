use crate::core::models::option::Opt;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    ImageChoice,
    Rating,
    Slider,
    Text,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::ImageChoice,
        QuestionType::Rating,
        QuestionType::Slider,
        QuestionType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::ImageChoice => "image-choice",
            QuestionType::Rating => "rating",
            QuestionType::Slider => "slider",
            QuestionType::Text => "text",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::ImageChoice)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, QuestionType::Rating | QuestionType::Slider)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub position: i64,
    pub image_path: Option<String>,
    pub required: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<Opt>,
}

fn default_question_type() -> String {
    QuestionType::MultipleChoice.as_str().into()
}

#[derive(Debug, Deserialize)]
pub struct QuestionCreate {
    #[serde(default)]
    pub question_text: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionPatch {
    pub question_text: Option<String>,
    pub question_type: Option<String>,
    pub required: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Reorder {
    pub question_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub survey_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub position: i64,
    pub image_path: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub question_text: String,
    pub question_type: QuestionType,
    pub required: bool,
}
