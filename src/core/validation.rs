use crate::core::models::question::QuestionType;
use crate::error::Error;
use itertools::Itertools;

/// Field errors in the order they were found.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Errors(Vec<(&'static str, String)>);

impl Errors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| m.as_str())
    }

    /// Fails with the first message as a `BadRequest`.
    pub fn into_result(self) -> Result<(), Error> {
        match self.0.into_iter().next() {
            None => Ok(()),
            Some((_, message)) => Err(Error::BadRequest(message)),
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn survey(title: &str, description: Option<&str>) -> Errors {
    let mut errors = Errors::default();
    let title_len = char_len(title.trim());
    if title_len < 3 {
        errors.add("title", "Survey title must be at least 3 characters long");
    } else if title_len > 100 {
        errors.add("title", "Survey title must be less than 100 characters");
    }
    if description.map(char_len).unwrap_or(0) > 500 {
        errors.add("description", "Description must be less than 500 characters");
    }
    errors
}

pub fn question(question_text: &str, question_type: &str) -> Errors {
    let mut errors = question_text_only(question_text);
    if question_type.parse::<QuestionType>().is_err() {
        errors.add("question_type", invalid_type_message());
    }
    errors
}

pub fn question_text_only(question_text: &str) -> Errors {
    let mut errors = Errors::default();
    let len = char_len(question_text.trim());
    if len < 3 {
        errors.add("question_text", "Question text must be at least 3 characters long");
    } else if len > 500 {
        errors.add("question_text", "Question text must be less than 500 characters");
    }
    errors
}

pub fn option(option_text: &str) -> Errors {
    let mut errors = Errors::default();
    let len = char_len(option_text.trim());
    if len < 1 {
        errors.add("option_text", "Option text cannot be empty");
    } else if len > 200 {
        errors.add("option_text", "Option text must be less than 200 characters");
    }
    errors
}

fn invalid_type_message() -> String {
    format!("Invalid question type. Must be one of: {}", QuestionType::ALL.iter().map(QuestionType::as_str).join(", "))
}

/// Parses a question type, failing with the validation message.
pub fn question_type(raw: &str) -> Result<QuestionType, Error> {
    raw.parse::<QuestionType>().map_err(|_| Error::BadRequest(invalid_type_message()))
}
