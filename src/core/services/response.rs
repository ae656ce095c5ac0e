use crate::core::models::{
    answer::{coerce_id, coerce_number, AnswerValue, Insert as AnswerInsert, Submission, Submit},
    common::Requester,
    question::{Question, QuestionType},
    response::{Insert as ResponseInsert, Receipt},
};
use crate::core::ports::repository::{AnswerCommon, OptionCommon, QuestionCommon, ResponseCommon, Store, TxStore};
use crate::core::services::survey::get_survey;
use crate::error::Error;
use chrono::Local;
use log::{info, warn};
use std::collections::HashMap;

/// Turns one submitted answer into a storable value, or says why it is skipped.
async fn accept<S>(storer: &mut S, question: &Question, submit: &Submit) -> Result<Result<AnswerValue, String>, Error>
where
    S: Store,
{
    let value = match question.question_type {
        QuestionType::MultipleChoice | QuestionType::ImageChoice => {
            let Some(option_id) = submit.option_id.as_ref().and_then(coerce_id) else {
                return Ok(Err("missing option id".into()));
            };
            if !OptionCommon::is_belongs_to_question(storer, question.id, option_id).await? {
                return Ok(Err(format!("option {} does not belong to the question", option_id)));
            }
            AnswerValue::Choice(option_id)
        }
        QuestionType::Text => {
            let text = submit.text_answer.clone().unwrap_or_default();
            if text.is_empty() && question.required {
                return Ok(Err("required text answer is empty".into()));
            }
            AnswerValue::Text(text)
        }
        QuestionType::Rating | QuestionType::Slider => match submit.number_answer.as_ref().and_then(coerce_number) {
            Some(n) => AnswerValue::Number(n),
            None => return Ok(Err("number answer is not numeric".into())),
        },
    };
    Ok(Ok(value))
}

/// Records one response with every acceptable answer. Bad answers are skipped,
/// the response itself is always kept.
pub async fn submit<T>(mut storer: T, requester: &Requester, survey_id: i64, submission: Submission) -> Result<Receipt, Error>
where
    T: TxStore,
{
    let survey = get_survey(&mut storer, survey_id).await?;
    if survey.is_expired(Local::now().date_naive()) {
        return Err(Error::Expired);
    }
    if !survey.published && !requester.is_creator(survey.creator_ip.as_deref()) {
        return Err(Error::Unpublished);
    }
    if submission.answers.is_empty() {
        return Err(Error::BadRequest("No answers provided".into()));
    }

    let response_id = ResponseCommon::insert(
        &mut storer,
        ResponseInsert {
            survey_id,
            respondent_ip: Some(requester.ip.clone()),
        },
    )
    .await?;
    let questions: HashMap<i64, Question> = QuestionCommon::query_by_survey(&mut storer, survey_id).await?.into_iter().map(|q| (q.id, q)).collect();

    let mut recorded = 0;
    for submit in &submission.answers {
        let Some(question_id) = submit.question_id.as_ref().and_then(coerce_id) else {
            warn!("response {}: answer without question id skipped", response_id);
            continue;
        };
        let Some(question) = questions.get(&question_id) else {
            warn!("response {}: question {} is not part of survey {}", response_id, question_id, survey_id);
            continue;
        };
        match accept(&mut storer, question, submit).await? {
            Ok(value) => {
                AnswerCommon::insert(&mut storer, AnswerInsert { response_id, question_id, value }).await?;
                recorded += 1;
            }
            Err(reason) => warn!("response {}: question {} skipped, {}", response_id, question_id, reason),
        }
    }
    storer.commit().await?;
    info!("response {} recorded for survey {} ({}/{} answers)", response_id, survey_id, recorded, submission.answers.len());
    Ok(Receipt {
        success: true,
        response_id,
        answers_recorded: recorded,
        answers_submitted: submission.answers.len(),
    })
}
