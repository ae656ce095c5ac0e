use crate::core::models::question::QuestionType;
use crate::core::models::survey::Survey;
use chrono::NaiveDateTime;
use serde::Serialize;

pub const DEFAULT_BINS: usize = 5;
pub const NO_ANSWER: &str = "No answer";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionCount {
    pub option_id: i64,
    pub option_text: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Chart-ready data for one question. `NoData` is the normal state of a
/// question nobody answered yet.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Series {
    Choice { counts: Vec<OptionCount> },
    Numeric { values: Vec<f64>, histogram: Vec<HistogramBin> },
    Text { answers: Vec<String> },
    NoData,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSeries {
    pub question_id: i64,
    pub position: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub series: Series,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAnswer {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub option_id: Option<i64>,
    pub option_text: Option<String>,
    pub text_answer: Option<String>,
    pub number_answer: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSummary {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub respondent_ip: Option<String>,
    pub answers: Vec<ResolvedAnswer>,
}

#[derive(Debug, Serialize)]
pub struct Results {
    pub survey: Survey,
    pub response_count: usize,
    pub series: Vec<QuestionSeries>,
    pub responses: Vec<ResponseSummary>,
}

#[derive(Debug)]
pub struct Export {
    pub filename: String,
    pub content: Vec<u8>,
}
