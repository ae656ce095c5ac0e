use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Response {
    pub id: i64,
    pub survey_id: i64,
    pub respondent_ip: Option<String>,
    pub created_at: NaiveDateTime,
}

pub struct Insert {
    pub survey_id: i64,
    pub respondent_ip: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Receipt {
    pub success: bool,
    pub response_id: i64,
    pub answers_recorded: usize,
    pub answers_submitted: usize,
}
