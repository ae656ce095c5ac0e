use crate::config::Limits;
use crate::core::models::{
    common::Requester,
    generation::{GenerateRequest, GeneratedQuestions},
};
use crate::core::ports::{generator::QuestionGenerator, limiter::RateLimiter};
use crate::core::services::generation as service;
use crate::error::Error;
use actix_web::web::{Data, Json};

pub async fn generate<G, L>(requester: Requester, Json(body): Json<GenerateRequest>, generator: Data<G>, limiter: Data<L>, limits: Data<Limits>) -> Result<Json<GeneratedQuestions>, Error>
where
    G: QuestionGenerator,
    L: RateLimiter,
{
    limiter.check("generate_questions", &requester.ip, limits.generate_questions)?;
    Ok(Json(service::generate_questions(generator.get_ref(), &body).await?))
}
