use crate::core::models::{
    answer::{AnswerRow, Insert as AnswerInsert},
    option::{Insert as OptionInsert, Opt},
    question::{Insert as QuestionInsert, Question, Update as QuestionUpdate},
    response::{Insert as ResponseInsert, Response},
    survey::{ImageSlot, Insert as SurveyInsert, Query as SurveyQuery, Survey, Update as SurveyUpdate},
};
use crate::error::Error;

pub trait SurveyCommon {
    async fn insert(&mut self, data: SurveyInsert) -> Result<i64, Error>;
    async fn get(&mut self, id: i64) -> Result<Option<Survey>, Error>;
    async fn get_template(&mut self, id: i64) -> Result<Option<Survey>, Error>;
    async fn query(&mut self, query: &SurveyQuery) -> Result<Vec<Survey>, Error>;
    async fn templates(&mut self) -> Result<Vec<Survey>, Error>;
    async fn update(&mut self, id: i64, data: SurveyUpdate) -> Result<(), Error>;
    async fn set_published(&mut self, id: i64, published: bool) -> Result<(), Error>;
    async fn set_archived(&mut self, id: i64, archived: bool) -> Result<(), Error>;
    async fn set_image(&mut self, id: i64, slot: ImageSlot, path: &str) -> Result<(), Error>;
    async fn delete(&mut self, id: i64) -> Result<u64, Error>;
}

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error>;
    async fn get(&mut self, id: i64) -> Result<Option<Question>, Error>;
    /// Questions of a survey in position order.
    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Question>, Error>;
    async fn max_position(&mut self, survey_id: i64) -> Result<Option<i64>, Error>;
    async fn update(&mut self, id: i64, data: QuestionUpdate) -> Result<(), Error>;
    async fn set_position(&mut self, id: i64, position: i64) -> Result<(), Error>;
    async fn set_image(&mut self, id: i64, path: &str) -> Result<(), Error>;
    async fn delete(&mut self, id: i64) -> Result<u64, Error>;
}

pub trait OptionCommon {
    async fn insert(&mut self, option: OptionInsert) -> Result<i64, Error>;
    async fn get(&mut self, id: i64) -> Result<Option<Opt>, Error>;
    /// Options of a question in position order.
    async fn query_by_question(&mut self, question_id: i64) -> Result<Vec<Opt>, Error>;
    /// Options of every question in a survey, grouped by question position then option position.
    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Opt>, Error>;
    async fn max_position(&mut self, question_id: i64) -> Result<Option<i64>, Error>;
    async fn update_text(&mut self, id: i64, option_text: &str) -> Result<(), Error>;
    async fn set_image(&mut self, id: i64, path: &str) -> Result<(), Error>;
    async fn delete(&mut self, id: i64) -> Result<u64, Error>;
    async fn is_belongs_to_question(&mut self, question_id: i64, option_id: i64) -> Result<bool, Error>;
}

pub trait ResponseCommon {
    async fn insert(&mut self, response: ResponseInsert) -> Result<i64, Error>;
    /// Responses of a survey in submission order.
    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Response>, Error>;
    async fn count(&mut self, survey_id: i64) -> Result<i64, Error>;
}

pub trait AnswerCommon {
    async fn insert(&mut self, answer: AnswerInsert) -> Result<i64, Error>;
    /// Answers of a survey's responses, ordered by response submission then answer id.
    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<AnswerRow>, Error>;
}

pub trait Common: SurveyCommon + QuestionCommon + OptionCommon + ResponseCommon + AnswerCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
