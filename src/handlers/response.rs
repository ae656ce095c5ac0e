use crate::config::Limits;
use crate::core::models::{answer::Submission, common::Requester, response::Receipt};
use crate::core::ports::limiter::RateLimiter;
use crate::core::services::response as service;
use crate::error::Error;
use crate::handlers::DB;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpRequest;
use log::warn;

pub const CSRF_HEADER: &str = "X-CSRFToken";

pub async fn submit<L>(
    requester: Requester,
    req: HttpRequest,
    path: Path<i64>,
    Json(body): Json<Submission>,
    db: DB,
    limiter: Data<L>,
    limits: Data<Limits>,
) -> Result<Json<Receipt>, Error>
where
    L: RateLimiter,
{
    let survey_id = path.into_inner();
    limiter.check("submit", &requester.ip, limits.submit)?;
    // Token is not verified; a missing header is only reported.
    if !req.headers().contains_key(CSRF_HEADER) {
        warn!("submission for survey {} without {} header", survey_id, CSRF_HEADER);
    }
    let receipt = service::submit(db.begin().await?, &requester, survey_id, body).await?;
    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use crate::config::Limits;
    use crate::core::ports::limiter::Limit;
    use crate::handlers::testing::{test_app, OTHER_PEER, PEER};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn submit_flow() {
        let app = test_app!(Limits {
            submit: Limit::per_minute(3),
            ..Limits::default()
        });
        let req = TestRequest::post().uri("/surveys").peer_addr(PEER.parse().unwrap()).set_json(json!({ "title": "Feedback" })).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let sid = created["id"].as_i64().unwrap();
        let req = TestRequest::post()
            .uri(&format!("/surveys/{}/questions", sid))
            .peer_addr(PEER.parse().unwrap())
            .set_json(json!({ "question_text": "Any comments?", "question_type": "text" }))
            .to_request();
        let question: Value = test::call_and_read_body_json(&app, req).await;
        let body = json!({ "answers": [{ "question_id": question["id"], "text_answer": "Nice" }] });

        let req = TestRequest::post().uri(&format!("/surveys/{}/responses", sid)).peer_addr(OTHER_PEER.parse().unwrap()).set_json(&body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = TestRequest::post().uri(&format!("/surveys/{}/publish", sid)).peer_addr(PEER.parse().unwrap()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = TestRequest::post()
            .uri(&format!("/surveys/{}/responses", sid))
            .peer_addr(OTHER_PEER.parse().unwrap())
            .insert_header(("X-CSRFToken", "anything"))
            .set_json(&body)
            .to_request();
        let receipt: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(receipt["success"], true);
        assert_eq!(receipt["answers_recorded"], 1);

        let req = TestRequest::post()
            .uri(&format!("/surveys/{}/responses", sid))
            .peer_addr(OTHER_PEER.parse().unwrap())
            .set_json(json!({ "answers": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "No answers provided");

        let req = TestRequest::post().uri(&format!("/surveys/{}/responses", sid)).peer_addr(OTHER_PEER.parse().unwrap()).set_json(&body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
