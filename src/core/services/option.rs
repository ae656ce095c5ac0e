use crate::core::models::{
    common::{next_position, Requester},
    option::{Insert as OptionInsert, Opt, OptCreate},
};
use crate::core::ports::repository::{OptionCommon, Store, TxStore};
use crate::core::services::question::editable_question;
use crate::core::validation;
use crate::error::Error;

async fn get_option<S>(storer: &mut S, id: i64) -> Result<Opt, Error>
where
    S: Store,
{
    OptionCommon::get(storer, id).await?.ok_or_else(|| Error::not_found("Option"))
}

/// Loads an option and the id of its survey, checking edit rights on that survey.
pub(crate) async fn editable_option<S>(storer: &mut S, requester: &Requester, id: i64) -> Result<(Opt, i64), Error>
where
    S: Store,
{
    let opt = get_option(storer, id).await?;
    let question = editable_question(storer, requester, opt.question_id).await?;
    Ok((opt, question.survey_id))
}

/// Returns the created option and its survey id.
pub async fn add_option<T>(mut storer: T, requester: &Requester, question_id: i64, option: OptCreate) -> Result<(Opt, i64), Error>
where
    T: TxStore,
{
    let question = editable_question(&mut storer, requester, question_id).await?;
    validation::option(&option.option_text).into_result()?;
    let position = next_position(OptionCommon::max_position(&mut storer, question_id).await?);
    let id = OptionCommon::insert(
        &mut storer,
        OptionInsert {
            question_id,
            option_text: option.option_text,
            position,
            image_path: None,
        },
    )
    .await?;
    let created = get_option(&mut storer, id).await?;
    storer.commit().await?;
    Ok((created, question.survey_id))
}

pub async fn update_option<T>(mut storer: T, requester: &Requester, id: i64, option: OptCreate) -> Result<(Opt, i64), Error>
where
    T: TxStore,
{
    let (_, survey_id) = editable_option(&mut storer, requester, id).await?;
    validation::option(&option.option_text).into_result()?;
    OptionCommon::update_text(&mut storer, id, &option.option_text).await?;
    let updated = get_option(&mut storer, id).await?;
    storer.commit().await?;
    Ok((updated, survey_id))
}

/// Returns the owning survey id.
pub async fn delete_option<T>(mut storer: T, requester: &Requester, id: i64) -> Result<i64, Error>
where
    T: TxStore,
{
    let (_, survey_id) = editable_option(&mut storer, requester, id).await?;
    OptionCommon::delete(&mut storer, id).await?;
    storer.commit().await?;
    Ok(survey_id)
}

/// Returns the owning survey id.
pub async fn set_option_image<T>(mut storer: T, requester: &Requester, id: i64, path: &str) -> Result<i64, Error>
where
    T: TxStore,
{
    let (_, survey_id) = editable_option(&mut storer, requester, id).await?;
    OptionCommon::set_image(&mut storer, id, path).await?;
    storer.commit().await?;
    Ok(survey_id)
}
