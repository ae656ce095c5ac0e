use crate::core::models::{
    common::Requester,
    survey::{PrintView, SettingsPatch, Survey, SurveyCreate, SurveyView},
};
use crate::core::services::survey as service;
use crate::error::Error;
use crate::handlers::{cached_survey, Cache, DB};
use crate::response::{CreateResponse, List, Success};
use actix_web::web::{Json, Path, Query};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    archived: bool,
}

pub async fn list(requester: Requester, Query(query): Query<ListQuery>, db: DB) -> Result<Json<List<Survey>>, Error> {
    let mut conn = db.acquire().await?;
    let surveys = service::list_surveys(&mut conn, &requester, query.archived).await?;
    Ok(Json(List::new(surveys)))
}

pub async fn templates(db: DB) -> Result<Json<List<Survey>>, Error> {
    let mut conn = db.acquire().await?;
    let templates = service::list_templates(&mut conn).await?;
    Ok(Json(List::new(templates)))
}

pub async fn create(requester: Requester, Json(body): Json<SurveyCreate>, db: DB) -> Result<Json<CreateResponse>, Error> {
    let id = service::create_survey(db.begin().await?, &requester, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn detail(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<SurveyView>, Error> {
    let survey_id = path.into_inner();
    let mut conn = db.acquire().await?;
    let survey = cached_survey(&cache, &mut conn, survey_id).await?;
    Ok(Json(service::view_survey(&mut conn, &requester, survey).await?))
}

pub async fn print(path: Path<i64>, db: DB, cache: Cache) -> Result<Json<PrintView>, Error> {
    let survey_id = path.into_inner();
    let mut conn = db.acquire().await?;
    let survey = cached_survey(&cache, &mut conn, survey_id).await?;
    Ok(Json(service::print_view(&mut conn, survey).await?))
}

pub async fn update(requester: Requester, path: Path<i64>, Json(patch): Json<SettingsPatch>, db: DB, cache: Cache) -> Result<Json<Survey>, Error> {
    let survey_id = path.into_inner();
    let survey = service::update_settings(db.begin().await?, &requester, survey_id, patch).await?;
    cache.invalidate(survey_id);
    Ok(Json(survey))
}

pub async fn publish(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<Value>, Error> {
    let survey_id = path.into_inner();
    let published = service::toggle_publish(db.begin().await?, &requester, survey_id).await?;
    cache.invalidate(survey_id);
    Ok(Json(json!({ "success": true, "published": published })))
}

pub async fn archive(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<Value>, Error> {
    let survey_id = path.into_inner();
    let archived = service::toggle_archive(db.begin().await?, &requester, survey_id).await?;
    cache.invalidate(survey_id);
    Ok(Json(json!({ "success": true, "archived": archived })))
}

pub async fn duplicate(requester: Requester, path: Path<i64>, db: DB) -> Result<Json<CreateResponse>, Error> {
    let survey_id = path.into_inner();
    let id = service::duplicate_survey(db.begin().await?, &requester, survey_id).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn delete_survey(requester: Requester, path: Path<i64>, db: DB, cache: Cache) -> Result<Json<Success>, Error> {
    let survey_id = path.into_inner();
    service::delete_survey(db.begin().await?, &requester, survey_id).await?;
    cache.invalidate(survey_id);
    Ok(Json(Success::ok()))
}

#[cfg(test)]
mod tests {
    use crate::config::Limits;
    use crate::handlers::testing::{test_app, OTHER_PEER, PEER};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn create_view_and_gate() {
        let app = test_app!(Limits::default());
        let req = TestRequest::post()
            .uri("/surveys")
            .peer_addr(PEER.parse().unwrap())
            .set_json(json!({ "title": "Coffee habits", "description": "Morning routine" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_i64().unwrap();

        let req = TestRequest::get().uri(&format!("/surveys/{}", id)).peer_addr(PEER.parse().unwrap()).to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["title"], "Coffee habits");
        assert_eq!(view["is_creator"], true);
        assert_eq!(view["questions"], json!([]));

        let req = TestRequest::get().uri(&format!("/surveys/{}", id)).peer_addr(OTHER_PEER.parse().unwrap()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = TestRequest::post().uri(&format!("/surveys/{}/publish", id)).peer_addr(PEER.parse().unwrap()).to_request();
        let toggled: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(toggled["published"], true);

        let req = TestRequest::get().uri(&format!("/surveys/{}", id)).peer_addr(OTHER_PEER.parse().unwrap()).to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["is_creator"], false);
        assert_eq!(view["published"], true);
    }

    #[actix_web::test]
    async fn validation_and_missing() {
        let app = test_app!(Limits::default());
        let req = TestRequest::post().uri("/surveys").peer_addr(PEER.parse().unwrap()).set_json(json!({ "title": "no" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Survey title must be at least 3 characters long");

        let req = TestRequest::delete().uri("/surveys/777").peer_addr(PEER.parse().unwrap()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn templates_list_and_archive() {
        let app = test_app!(Limits::default());
        let req = TestRequest::get().uri("/templates").to_request();
        let templates: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(templates["total"], 2);

        let template_id = templates["list"][0]["id"].as_i64().unwrap();
        let req = TestRequest::post()
            .uri("/surveys")
            .peer_addr(PEER.parse().unwrap())
            .set_json(json!({ "title": "Seeded", "template_id": template_id }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_i64().unwrap();

        let req = TestRequest::post().uri(&format!("/surveys/{}/archive", id)).peer_addr(PEER.parse().unwrap()).to_request();
        let toggled: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(toggled["archived"], true);

        let req = TestRequest::get().uri("/surveys?archived=true").peer_addr(PEER.parse().unwrap()).to_request();
        let archived: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(archived["total"], 1);
        let req = TestRequest::get().uri("/surveys").peer_addr(PEER.parse().unwrap()).to_request();
        let active: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(active["total"], 0);
    }

    #[actix_web::test]
    async fn update_invalidates_cached_row() {
        let app = test_app!(Limits::default());
        let req = TestRequest::post().uri("/surveys").peer_addr(PEER.parse().unwrap()).set_json(json!({ "title": "Before" })).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_i64().unwrap();

        let req = TestRequest::get().uri(&format!("/surveys/{}/print", id)).to_request();
        let printed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(printed["title"], "Before");
        assert!(printed["generated_at"].is_string());

        let req = TestRequest::put()
            .uri(&format!("/surveys/{}", id))
            .peer_addr(PEER.parse().unwrap())
            .set_json(json!({ "title": "After", "theme": "light" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["theme"], "light");

        let req = TestRequest::get().uri(&format!("/surveys/{}/print", id)).to_request();
        let printed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(printed["title"], "After");
    }
}
