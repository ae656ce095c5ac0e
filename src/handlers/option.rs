use crate::core::models::{
    common::Requester,
    option::{Opt, OptCreate},
};
use crate::core::services::option as service;
use crate::error::Error;
use crate::handlers::{Cache, DB};
use crate::response::Success;
use actix_web::web::{Json, Path};

pub async fn create(requester: Requester, path: Path<i64>, Json(body): Json<OptCreate>, db: DB, cache: Cache) -> Result<Json<Opt>, Error> {
    let (opt, survey_id) = service::add_option(db.begin().await?, &requester, path.into_inner(), body).await?;
    cache.invalidate(survey_id);
    Ok(Json(opt))
}

pub async fn update(requester: Requester, path: Path<i64>, Json(body): Json<OptCreate>, db: DB, cache: Cache) -> Result<Json<Opt>, Error> {
    let (opt, survey_id) = service::update_option(db.begin().await?, &requester, path.into_inner(), body).await?;
    cache.invalidate(survey_id);
    Ok(Json(opt))
}

pub async fn delete_option(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<Success>, Error> {
    let survey_id = service::delete_option(db.begin().await?, &requester, path.into_inner()).await?;
    cache.invalidate(survey_id);
    Ok(Json(Success::ok()))
}
