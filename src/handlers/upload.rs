use crate::core::models::{common::Requester, survey::ImageSlot, upload_file::UploadedFileCreate};
use crate::core::ports::uploader::{Uploader, MAX_UPLOAD_SIZE};
use crate::core::services::{
    option::{editable_option, set_option_image},
    question::{editable_question, set_question_image},
    survey::{editable_survey, set_survey_image},
};
use crate::error::Error;
use crate::handlers::{Cache, DB};
use crate::response::Uploaded;
use actix_multipart::Multipart;
use actix_web::web::{Data, Json, Path};
use futures_util::TryStreamExt;

/// First file field of the form, size-capped while streaming.
async fn read_file(mut payload: Multipart) -> Result<UploadedFileCreate, Error> {
    while let Some(mut field) = payload.try_next().await? {
        let Some(name) = field.content_disposition().get_filename().map(str::to_owned) else {
            continue;
        };
        if name.is_empty() {
            return Err(Error::BadRequest("No selected file".into()));
        }
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if content.len() + chunk.len() > MAX_UPLOAD_SIZE {
                return Err(Error::BadRequest("File is too large".into()));
            }
            content.extend_from_slice(&chunk);
        }
        return Ok(UploadedFileCreate { name, content });
    }
    Err(Error::BadRequest("No file part".into()))
}

// Edit rights are checked before anything reaches the uploader, and again
// inside the attaching transaction.
async fn survey_image<U>(requester: Requester, survey_id: i64, slot: ImageSlot, payload: Multipart, db: DB, cache: Cache, uploader: Data<U>) -> Result<Json<Uploaded>, Error>
where
    U: Uploader,
{
    {
        let mut conn = db.acquire().await?;
        editable_survey(&mut conn, &requester, survey_id).await?;
    }
    let path = uploader.put(read_file(payload).await?).await?;
    set_survey_image(db.begin().await?, &requester, survey_id, slot, &path).await?;
    cache.invalidate(survey_id);
    Ok(Json(Uploaded { path }))
}

pub async fn survey_header<U>(requester: Requester, path: Path<i64>, payload: Multipart, db: DB, cache: Cache, uploader: Data<U>) -> Result<Json<Uploaded>, Error>
where
    U: Uploader,
{
    survey_image(requester, path.into_inner(), ImageSlot::Header, payload, db, cache, uploader).await
}

pub async fn survey_logo<U>(requester: Requester, path: Path<i64>, payload: Multipart, db: DB, cache: Cache, uploader: Data<U>) -> Result<Json<Uploaded>, Error>
where
    U: Uploader,
{
    survey_image(requester, path.into_inner(), ImageSlot::Logo, payload, db, cache, uploader).await
}

pub async fn question_image<U>(requester: Requester, path: Path<i64>, payload: Multipart, db: DB, cache: Cache, uploader: Data<U>) -> Result<Json<Uploaded>, Error>
where
    U: Uploader,
{
    let question_id = path.into_inner();
    {
        let mut conn = db.acquire().await?;
        editable_question(&mut conn, &requester, question_id).await?;
    }
    let image = uploader.put(read_file(payload).await?).await?;
    let survey_id = set_question_image(db.begin().await?, &requester, question_id, &image).await?;
    cache.invalidate(survey_id);
    Ok(Json(Uploaded { path: image }))
}

pub async fn option_image<U>(requester: Requester, path: Path<i64>, payload: Multipart, db: DB, cache: Cache, uploader: Data<U>) -> Result<Json<Uploaded>, Error>
where
    U: Uploader,
{
    let option_id = path.into_inner();
    {
        let mut conn = db.acquire().await?;
        editable_option(&mut conn, &requester, option_id).await?;
    }
    let image = uploader.put(read_file(payload).await?).await?;
    let survey_id = set_option_image(db.begin().await?, &requester, option_id, &image).await?;
    cache.invalidate(survey_id);
    Ok(Json(Uploaded { path: image }))
}
