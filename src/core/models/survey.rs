use crate::core::models::question::QuestionWithOptions;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_THEME: &str = "dark";
pub const COPY_PREFIX: &str = "Copy of ";

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub creator_ip: Option<String>,
    pub theme: String,
    pub header_image: Option<String>,
    pub logo_image: Option<String>,
    pub is_template: bool,
    pub published: bool,
    pub archived: bool,
    pub expiry_date: Option<NaiveDate>,
}

impl Survey {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.expiry_date, Some(d) if d < today)
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub title: String,
    pub description: Option<String>,
    pub creator_ip: Option<String>,
    pub theme: String,
    pub header_image: Option<String>,
    pub logo_image: Option<String>,
    pub is_template: bool,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub title: String,
    pub description: Option<String>,
    pub theme: String,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SurveyCreate {
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub template_id: Option<i64>,
}

/// Settings patch. Absent fields keep their stored value; an empty
/// `expiry_date` clears the expiry. Images change only through uploads.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Header,
    Logo,
}

impl ImageSlot {
    pub fn column(&self) -> &'static str {
        match self {
            ImageSlot::Header => "header_image",
            ImageSlot::Logo => "logo_image",
        }
    }
}

#[derive(Debug)]
pub struct Query {
    pub creator_ip: String,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Debug, Serialize)]
pub struct SurveyView {
    #[serde(flatten)]
    pub detail: SurveyDetail,
    pub is_creator: bool,
}

#[derive(Debug, Serialize)]
pub struct PrintView {
    #[serde(flatten)]
    pub detail: SurveyDetail,
    pub generated_at: NaiveDateTime,
}
