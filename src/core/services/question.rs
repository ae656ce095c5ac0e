use crate::core::models::{
    common::{next_position, Requester},
    option::Insert as OptionInsert,
    question::{Insert as QuestionInsert, Question, QuestionCreate, QuestionPatch, QuestionWithOptions, Reorder, Update as QuestionUpdate},
};
use crate::core::ports::repository::{OptionCommon, QuestionCommon, Store, TxStore};
use crate::core::services::survey::editable_survey;
use crate::core::validation;
use crate::error::Error;
use log::warn;
use std::collections::HashSet;

pub(crate) async fn get_question<S>(storer: &mut S, id: i64) -> Result<Question, Error>
where
    S: Store,
{
    QuestionCommon::get(storer, id).await?.ok_or_else(|| Error::not_found("Question"))
}

/// Loads a question whose owning survey the requester may edit.
pub(crate) async fn editable_question<S>(storer: &mut S, requester: &Requester, id: i64) -> Result<Question, Error>
where
    S: Store,
{
    let question = get_question(storer, id).await?;
    editable_survey(storer, requester, question.survey_id).await?;
    Ok(question)
}

pub async fn add_question<T>(mut storer: T, requester: &Requester, survey_id: i64, question: QuestionCreate) -> Result<QuestionWithOptions, Error>
where
    T: TxStore,
{
    editable_survey(&mut storer, requester, survey_id).await?;
    validation::question(&question.question_text, &question.question_type).into_result()?;
    let question_type = validation::question_type(&question.question_type)?;
    let position = next_position(QuestionCommon::max_position(&mut storer, survey_id).await?);
    let id = QuestionCommon::insert(
        &mut storer,
        QuestionInsert {
            survey_id,
            question_text: question.question_text,
            question_type,
            position,
            image_path: None,
            required: question.required,
        },
    )
    .await?;
    let valid_options = question.options.into_iter().filter(|o| {
        let ok = validation::option(o).is_empty();
        if !ok {
            warn!("skipping invalid option for question {}", id);
        }
        ok
    });
    for (position, option_text) in (1..).zip(valid_options) {
        OptionCommon::insert(
            &mut storer,
            OptionInsert {
                question_id: id,
                option_text,
                position,
                image_path: None,
            },
        )
        .await?;
    }
    let created = QuestionWithOptions {
        question: get_question(&mut storer, id).await?,
        options: OptionCommon::query_by_question(&mut storer, id).await?,
    };
    storer.commit().await?;
    Ok(created)
}

pub async fn update_question<T>(mut storer: T, requester: &Requester, id: i64, patch: QuestionPatch) -> Result<Question, Error>
where
    T: TxStore,
{
    let current = editable_question(&mut storer, requester, id).await?;
    if let Some(text) = &patch.question_text {
        validation::question_text_only(text).into_result()?;
    }
    let question_type = match &patch.question_type {
        Some(raw) => validation::question_type(raw)?,
        None => current.question_type,
    };
    QuestionCommon::update(
        &mut storer,
        id,
        QuestionUpdate {
            question_text: patch.question_text.unwrap_or(current.question_text),
            question_type,
            required: patch.required.unwrap_or(current.required),
        },
    )
    .await?;
    let question = get_question(&mut storer, id).await?;
    storer.commit().await?;
    Ok(question)
}

/// Returns the owning survey id so callers can drop cached copies.
pub async fn delete_question<T>(mut storer: T, requester: &Requester, id: i64) -> Result<i64, Error>
where
    T: TxStore,
{
    let question = editable_question(&mut storer, requester, id).await?;
    QuestionCommon::delete(&mut storer, id).await?;
    storer.commit().await?;
    Ok(question.survey_id)
}

pub async fn reorder_questions<T>(mut storer: T, requester: &Requester, survey_id: i64, reorder: Reorder) -> Result<(), Error>
where
    T: TxStore,
{
    editable_survey(&mut storer, requester, survey_id).await?;
    let existing: HashSet<i64> = QuestionCommon::query_by_survey(&mut storer, survey_id).await?.into_iter().map(|q| q.id).collect();
    let given: HashSet<i64> = reorder.question_ids.iter().copied().collect();
    if given.len() != reorder.question_ids.len() || given != existing {
        return Err(Error::BadRequest("Question ids must match the survey's questions exactly".into()));
    }
    for (position, id) in (1..).zip(reorder.question_ids) {
        QuestionCommon::set_position(&mut storer, id, position).await?;
    }
    storer.commit().await?;
    Ok(())
}

/// Returns the owning survey id.
pub async fn set_question_image<T>(mut storer: T, requester: &Requester, id: i64, path: &str) -> Result<i64, Error>
where
    T: TxStore,
{
    let question = editable_question(&mut storer, requester, id).await?;
    QuestionCommon::set_image(&mut storer, id, path).await?;
    storer.commit().await?;
    Ok(question.survey_id)
}
