use crate::core::models::{
    common::Requester,
    option::{Insert as OptionInsert, Opt},
    question::{Insert as QuestionInsert, QuestionWithOptions},
    survey::{
        ImageSlot, Insert as SurveyInsert, PrintView, Query as SurveyQuery, SettingsPatch, Survey, SurveyCreate, SurveyDetail, SurveyView, Update as SurveyUpdate,
        COPY_PREFIX, DEFAULT_THEME,
    },
};
use crate::core::ports::repository::{OptionCommon, QuestionCommon, Store, SurveyCommon, TxStore};
use crate::core::validation;
use crate::error::Error;
use chrono::{Local, NaiveDate};
use itertools::Itertools;
use log::info;

pub(crate) async fn get_survey<S>(storer: &mut S, id: i64) -> Result<Survey, Error>
where
    S: Store,
{
    SurveyCommon::get(storer, id).await?.ok_or_else(|| Error::not_found("Survey"))
}

/// Loads a survey the requester may edit.
pub(crate) async fn editable_survey<S>(storer: &mut S, requester: &Requester, id: i64) -> Result<Survey, Error>
where
    S: Store,
{
    let survey = get_survey(storer, id).await?;
    if !requester.can_edit(survey.creator_ip.as_deref()) {
        return Err(Error::unauthorized());
    }
    Ok(survey)
}

/// Inserts `target` and copies every question and option of `source_id` beneath it,
/// keeping positions. Runs inside the caller's transaction.
async fn copy_survey_tree<S>(storer: &mut S, source_id: i64, target: SurveyInsert) -> Result<i64, Error>
where
    S: Store,
{
    let survey_id = SurveyCommon::insert(storer, target).await?;
    for q in QuestionCommon::query_by_survey(storer, source_id).await? {
        let question_id = QuestionCommon::insert(
            storer,
            QuestionInsert {
                survey_id,
                question_text: q.question_text,
                question_type: q.question_type,
                position: q.position,
                image_path: q.image_path,
                required: q.required,
            },
        )
        .await?;
        for o in OptionCommon::query_by_question(storer, q.id).await? {
            OptionCommon::insert(
                storer,
                OptionInsert {
                    question_id,
                    option_text: o.option_text,
                    position: o.position,
                    image_path: o.image_path,
                },
            )
            .await?;
        }
    }
    Ok(survey_id)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn create_survey<T>(mut storer: T, requester: &Requester, survey: SurveyCreate) -> Result<i64, Error>
where
    T: TxStore,
{
    validation::survey(&survey.title, survey.description.as_deref()).into_result()?;
    let id = match survey.template_id {
        None => {
            SurveyCommon::insert(
                &mut storer,
                SurveyInsert {
                    title: survey.title,
                    description: survey.description,
                    creator_ip: Some(requester.ip.clone()),
                    theme: non_blank(survey.theme).unwrap_or_else(|| DEFAULT_THEME.into()),
                    header_image: None,
                    logo_image: None,
                    is_template: false,
                },
            )
            .await?
        }
        Some(template_id) => {
            let template = SurveyCommon::get_template(&mut storer, template_id).await?.ok_or_else(|| Error::not_found("Template"))?;
            copy_survey_tree(
                &mut storer,
                template.id,
                SurveyInsert {
                    title: survey.title,
                    description: survey.description.or(template.description),
                    creator_ip: Some(requester.ip.clone()),
                    theme: non_blank(survey.theme).unwrap_or(template.theme),
                    header_image: template.header_image,
                    logo_image: template.logo_image,
                    is_template: false,
                },
            )
            .await?
        }
    };
    storer.commit().await?;
    info!("survey {} created by {}", id, requester.ip);
    Ok(id)
}

fn parse_expiry(raw: &str) -> Result<Option<NaiveDate>, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| Error::BadRequest("Invalid expiry date format. Please use YYYY-MM-DD".into()))
}

pub async fn update_settings<T>(mut storer: T, requester: &Requester, id: i64, patch: SettingsPatch) -> Result<Survey, Error>
where
    T: TxStore,
{
    let current = editable_survey(&mut storer, requester, id).await?;
    let title = patch.title.unwrap_or(current.title);
    let description = patch.description.or(current.description);
    validation::survey(&title, description.as_deref()).into_result()?;
    let expiry_date = match patch.expiry_date {
        Some(raw) => parse_expiry(&raw)?,
        None => current.expiry_date,
    };
    SurveyCommon::update(
        &mut storer,
        id,
        SurveyUpdate {
            title,
            description,
            theme: non_blank(patch.theme).unwrap_or(current.theme),
            expiry_date,
        },
    )
    .await?;
    let survey = get_survey(&mut storer, id).await?;
    storer.commit().await?;
    Ok(survey)
}

pub async fn toggle_publish<T>(mut storer: T, requester: &Requester, id: i64) -> Result<bool, Error>
where
    T: TxStore,
{
    let survey = editable_survey(&mut storer, requester, id).await?;
    let published = !survey.published;
    SurveyCommon::set_published(&mut storer, id, published).await?;
    storer.commit().await?;
    Ok(published)
}

pub async fn toggle_archive<T>(mut storer: T, requester: &Requester, id: i64) -> Result<bool, Error>
where
    T: TxStore,
{
    let survey = editable_survey(&mut storer, requester, id).await?;
    let archived = !survey.archived;
    SurveyCommon::set_archived(&mut storer, id, archived).await?;
    storer.commit().await?;
    Ok(archived)
}

pub async fn delete_survey<T>(mut storer: T, requester: &Requester, id: i64) -> Result<(), Error>
where
    T: TxStore,
{
    editable_survey(&mut storer, requester, id).await?;
    SurveyCommon::delete(&mut storer, id).await?;
    storer.commit().await?;
    info!("survey {} deleted by {}", id, requester.ip);
    Ok(())
}

pub async fn duplicate_survey<T>(mut storer: T, requester: &Requester, id: i64) -> Result<i64, Error>
where
    T: TxStore,
{
    let source = editable_survey(&mut storer, requester, id).await?;
    let new_id = copy_survey_tree(
        &mut storer,
        source.id,
        SurveyInsert {
            title: format!("{}{}", COPY_PREFIX, source.title),
            description: source.description,
            creator_ip: Some(requester.ip.clone()),
            theme: source.theme,
            header_image: source.header_image,
            logo_image: source.logo_image,
            is_template: false,
        },
    )
    .await?;
    storer.commit().await?;
    Ok(new_id)
}

pub async fn list_surveys<S>(storer: &mut S, requester: &Requester, archived: bool) -> Result<Vec<Survey>, Error>
where
    S: Store,
{
    SurveyCommon::query(
        storer,
        &SurveyQuery {
            creator_ip: requester.ip.clone(),
            archived,
        },
    )
    .await
}

pub async fn list_templates<S>(storer: &mut S) -> Result<Vec<Survey>, Error>
where
    S: Store,
{
    SurveyCommon::templates(storer).await
}

/// Assembles the survey tree: questions in position order, each with its options.
pub async fn survey_detail<S>(storer: &mut S, survey: Survey) -> Result<SurveyDetail, Error>
where
    S: Store,
{
    let mut options = OptionCommon::query_by_survey(storer, survey.id).await?.into_iter().into_group_map_by(|o: &Opt| o.question_id);
    let questions = QuestionCommon::query_by_survey(storer, survey.id)
        .await?
        .into_iter()
        .map(|question| QuestionWithOptions {
            options: options.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect();
    Ok(SurveyDetail { survey, questions })
}

/// Survey as seen by a visitor. Editors always get the full tree; everyone else
/// is turned away from expired or unpublished surveys.
pub async fn view_survey<S>(storer: &mut S, requester: &Requester, survey: Survey) -> Result<SurveyView, Error>
where
    S: Store,
{
    let is_creator = requester.is_creator(survey.creator_ip.as_deref());
    if !requester.can_edit(survey.creator_ip.as_deref()) {
        if survey.is_expired(Local::now().date_naive()) {
            return Err(Error::Expired);
        }
        if !survey.published {
            return Err(Error::Unpublished);
        }
    }
    let detail = survey_detail(storer, survey).await?;
    Ok(SurveyView { detail, is_creator })
}

pub async fn print_view<S>(storer: &mut S, survey: Survey) -> Result<PrintView, Error>
where
    S: Store,
{
    let detail = survey_detail(storer, survey).await?;
    Ok(PrintView {
        detail,
        generated_at: Local::now().naive_local(),
    })
}

pub async fn set_survey_image<T>(mut storer: T, requester: &Requester, id: i64, slot: ImageSlot, path: &str) -> Result<(), Error>
where
    T: TxStore,
{
    editable_survey(&mut storer, requester, id).await?;
    SurveyCommon::set_image(&mut storer, id, slot, path).await?;
    storer.commit().await?;
    Ok(())
}
