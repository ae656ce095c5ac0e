use crate::config::Limits;
use crate::core::models::{common::Requester, report::Results};
use crate::core::ports::limiter::RateLimiter;
use crate::core::services::report as service;
use crate::error::Error;
use crate::handlers::DB;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType, CONTENT_TYPE};
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use chrono::Local;

pub async fn results(requester: Requester, path: Path<i64>, db: DB) -> Result<Json<Results>, Error> {
    let mut conn = db.acquire().await?;
    Ok(Json(service::results(&mut conn, &requester, path.into_inner()).await?))
}

pub async fn export<L>(requester: Requester, path: Path<i64>, db: DB, limiter: Data<L>, limits: Data<Limits>) -> Result<HttpResponse, Error>
where
    L: RateLimiter,
{
    limiter.check("export", &requester.ip, limits.export)?;
    let mut conn = db.acquire().await?;
    let export = service::export(&mut conn, &requester, path.into_inner(), Local::now().date_naive()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.content))
}
