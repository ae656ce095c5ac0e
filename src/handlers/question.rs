use crate::config::Limits;
use crate::core::models::{
    common::Requester,
    question::{Question, QuestionCreate, QuestionPatch, QuestionWithOptions, Reorder},
};
use crate::core::ports::limiter::RateLimiter;
use crate::core::services::question as service;
use crate::error::Error;
use crate::handlers::{Cache, DB};
use crate::response::Success;
use actix_web::web::{Data, Json, Path};

pub async fn create<L>(
    requester: Requester,
    path: Path<i64>,
    Json(body): Json<QuestionCreate>,
    db: DB,
    cache: Cache,
    limiter: Data<L>,
    limits: Data<Limits>,
) -> Result<Json<QuestionWithOptions>, Error>
where
    L: RateLimiter,
{
    let survey_id = path.into_inner();
    limiter.check("add_question", &requester.ip, limits.add_question)?;
    let question = service::add_question(db.begin().await?, &requester, survey_id, body).await?;
    cache.invalidate(survey_id);
    Ok(Json(question))
}

pub async fn update(requester: Requester, path: Path<i64>, Json(patch): Json<QuestionPatch>, db: DB, cache: Cache) -> Result<Json<Question>, Error> {
    let question = service::update_question(db.begin().await?, &requester, path.into_inner(), patch).await?;
    cache.invalidate(question.survey_id);
    Ok(Json(question))
}

pub async fn delete_question(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<Success>, Error> {
    let survey_id = service::delete_question(db.begin().await?, &requester, path.into_inner()).await?;
    cache.invalidate(survey_id);
    Ok(Json(Success::ok()))
}

pub async fn reorder(requester: Requester, path: Path<i64>, Json(body): Json<Reorder>, db: DB, cache: Cache) -> Result<Json<Success>, Error> {
    let survey_id = path.into_inner();
    service::reorder_questions(db.begin().await?, &requester, survey_id, body).await?;
    cache.invalidate(survey_id);
    Ok(Json(Success::ok()))
}
