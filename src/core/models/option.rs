use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Opt {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
    pub position: i64,
    pub image_path: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i64,
    pub option_text: String,
    pub position: i64,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptCreate {
    #[serde(default)]
    pub option_text: String,
}
