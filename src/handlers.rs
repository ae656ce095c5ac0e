pub mod generation;
pub mod health;
pub mod option;
pub mod question;
pub mod report;
pub mod response;
pub mod survey;
pub mod upload;

use crate::core::models::survey::Survey;
use crate::core::ports::{generator::QuestionGenerator, limiter::RateLimiter, uploader::Uploader};
use crate::core::services::survey::get_survey;
use crate::database::sqlx::{Conn, SqliteSqlxManager};
use crate::error::Error;
use crate::impls::cache::SurveyCache;
use actix_web::web::{delete, get, post, put, scope, Data, JsonConfig, ServiceConfig};

pub type DB = Data<SqliteSqlxManager>;
pub type Cache = Data<SurveyCache>;

/// Survey row through the read cache.
pub(crate) async fn cached_survey(cache: &SurveyCache, conn: &mut Conn, id: i64) -> Result<Survey, Error> {
    if let Some(survey) = cache.get(id) {
        return Ok(survey);
    }
    let survey = get_survey(conn, id).await?;
    cache.insert(survey.clone());
    Ok(survey)
}

fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _| Error::BadRequest(err.to_string()).into())
}

pub fn routes<U, G, L>(cfg: &mut ServiceConfig)
where
    U: Uploader + 'static,
    G: QuestionGenerator + 'static,
    L: RateLimiter + 'static,
{
    cfg.app_data(json_config())
        .route("/health", get().to(health::health))
        .route("/templates", get().to(survey::templates))
        .route("/generate-questions", post().to(generation::generate::<G, L>))
        .service(
            scope("/surveys")
                .route("", get().to(survey::list))
                .route("", post().to(survey::create))
                .service(
                    scope("/{survey_id}")
                        .route("", get().to(survey::detail))
                        .route("", put().to(survey::update))
                        .route("", delete().to(survey::delete_survey))
                        .route("/print", get().to(survey::print))
                        .route("/publish", post().to(survey::publish))
                        .route("/archive", post().to(survey::archive))
                        .route("/duplicate", post().to(survey::duplicate))
                        .route("/header_image", post().to(upload::survey_header::<U>))
                        .route("/logo_image", post().to(upload::survey_logo::<U>))
                        .route("/questions", post().to(question::create::<L>))
                        .route("/questions/order", put().to(question::reorder))
                        .route("/responses", post().to(response::submit::<L>))
                        .route("/results", get().to(report::results))
                        .route("/export", get().to(report::export::<L>)),
                ),
        )
        .service(
            scope("/questions/{question_id}")
                .route("", put().to(question::update))
                .route("", delete().to(question::delete_question))
                .route("/image", post().to(upload::question_image::<U>))
                .route("/options", post().to(option::create)),
        )
        .service(
            scope("/options/{option_id}")
                .route("", put().to(option::update))
                .route("", delete().to(option::delete_option))
                .route("/image", post().to(upload::option_image::<U>)),
        );
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::core::models::upload_file::UploadedFileCreate;
    use crate::core::ports::{generator::QuestionGenerator, uploader::Uploader};
    use crate::error::Error;

    pub struct MemoryUploader;

    impl Uploader for MemoryUploader {
        async fn put(&self, file: UploadedFileCreate) -> Result<String, Error> {
            if crate::core::ports::uploader::allowed_extension(&file.name).is_none() {
                return Err(Error::BadRequest("Invalid file type".into()));
            }
            Ok(format!("/static/uploads/test_{}", file.name))
        }
    }

    pub struct Echo;

    impl QuestionGenerator for Echo {
        async fn complete(&self, _prompt: &str) -> Result<String, Error> {
            Ok("```json\n{\"questions\": [{\"question_text\": \"How do you set prices?\", \"question_type\": \"text\"}]}\n```".into())
        }
    }

    /// Service over a fresh in-memory database with test collaborators.
    /// The second form swaps in a real uploader.
    macro_rules! test_app {
        ($limits:expr) => {
            $crate::handlers::testing::test_app!($limits, $crate::handlers::testing::MemoryUploader, $crate::handlers::testing::MemoryUploader)
        };
        ($limits:expr, $uploader:ty, $upload:expr) => {{
            let manager = $crate::testing::manager().await;
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new(manager))
                    .app_data(actix_web::web::Data::new($crate::impls::cache::SurveyCache::default()))
                    .app_data(actix_web::web::Data::new($crate::impls::limiters::sliding_window::SlidingWindow::new()))
                    .app_data(actix_web::web::Data::new($limits))
                    .app_data(actix_web::web::Data::<$uploader>::new($upload))
                    .app_data(actix_web::web::Data::new($crate::handlers::testing::Echo))
                    .configure(
                        $crate::handlers::routes::<
                            $uploader,
                            $crate::handlers::testing::Echo,
                            $crate::impls::limiters::sliding_window::SlidingWindow,
                        >,
                    ),
            )
            .await
        }};
    }
    pub(crate) use test_app;

    pub const PEER: &str = "10.0.0.1:5555";
    pub const OTHER_PEER: &str = "10.0.0.2:5555";
}
