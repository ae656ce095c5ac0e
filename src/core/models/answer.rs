use crate::core::models::question::QuestionType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A stored answer payload. The owning question's type decides which variant is legal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Choice(i64),
    Text(String),
    Number(f64),
}

impl AnswerValue {
    pub fn is_legal_for(&self, question_type: QuestionType) -> bool {
        match self {
            AnswerValue::Choice(_) => question_type.is_choice(),
            AnswerValue::Text(_) => question_type == QuestionType::Text,
            AnswerValue::Number(_) => question_type.is_numeric(),
        }
    }

    pub fn option_id(&self) -> Option<i64> {
        match self {
            AnswerValue::Choice(id) => Some(*id),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Row layout of the `answers` table.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    pub id: i64,
    pub response_id: i64,
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub text_answer: Option<String>,
    pub number_answer: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub id: i64,
    pub response_id: i64,
    pub question_id: i64,
    pub value: AnswerValue,
}

impl TryFrom<AnswerRow> for Answer {
    type Error = AnswerRow;

    fn try_from(row: AnswerRow) -> Result<Self, Self::Error> {
        let value = match (row.option_id, &row.text_answer, row.number_answer) {
            (Some(id), None, None) => AnswerValue::Choice(id),
            (None, Some(t), None) => AnswerValue::Text(t.clone()),
            (None, None, Some(n)) => AnswerValue::Number(n),
            _ => return Err(row),
        };
        Ok(Answer {
            id: row.id,
            response_id: row.response_id,
            question_id: row.question_id,
            value,
        })
    }
}

pub struct Insert {
    pub response_id: i64,
    pub question_id: i64,
    pub value: AnswerValue,
}

/// One submitted answer as sent by a client. Ids and numbers may arrive as
/// JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submit {
    pub question_id: Option<Value>,
    pub option_id: Option<Value>,
    pub text_answer: Option<String>,
    pub number_answer: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub answers: Vec<Submit>,
}

pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numeric coercion for rating/slider answers. Non-finite values are rejected.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
