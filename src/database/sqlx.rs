use crate::core::models::{
    answer::{AnswerRow, Insert as AnswerInsert},
    option::{Insert as OptionInsert, Opt},
    question::{Insert as QuestionInsert, Question, Update as QuestionUpdate},
    response::{Insert as ResponseInsert, Response},
    survey::{ImageSlot, Insert as SurveyInsert, Query as SurveyQuery, Survey, Update as SurveyUpdate},
};
use crate::core::ports::repository::{AnswerCommon, Common, OptionCommon, QuestionCommon, ResponseCommon, Store, SurveyCommon, TxStore};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use std::ops::DerefMut;
use std::str::FromStr;

pub struct SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    executor: E,
}

impl<E> SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

pub type Conn = SqliteSqlx<PoolConnection<Sqlite>>;
pub type Tx = SqliteSqlx<Transaction<'static, Sqlite>>;

#[derive(Clone)]
pub struct SqliteSqlxManager {
    pool: SqlitePool,
}

impl SqliteSqlxManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file and applies migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
        let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn begin(&self) -> Result<Tx, Error> {
        let tx = self.pool.begin().await?;
        Ok(SqliteSqlx { executor: tx })
    }

    pub async fn acquire(&self) -> Result<Conn, Error> {
        let conn = self.pool.acquire().await?;
        Ok(SqliteSqlx { executor: conn })
    }
}

impl<E> SurveyCommon for SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    async fn insert(&mut self, data: SurveyInsert) -> Result<i64, Error> {
        let id = query_scalar(
            "INSERT INTO surveys (title, description, creator_ip, theme, header_image, logo_image, is_template)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id",
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.creator_ip)
        .bind(data.theme)
        .bind(data.header_image)
        .bind(data.logo_image)
        .bind(data.is_template)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i64) -> Result<Option<Survey>, Error> {
        let survey = query_as(
            "SELECT id, title, description, created_at, creator_ip, theme, header_image, logo_image, is_template, published, archived, expiry_date
            FROM surveys WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.executor)
        .await?;
        Ok(survey)
    }

    async fn get_template(&mut self, id: i64) -> Result<Option<Survey>, Error> {
        let survey = query_as(
            "SELECT id, title, description, created_at, creator_ip, theme, header_image, logo_image, is_template, published, archived, expiry_date
            FROM surveys WHERE id = ? AND is_template = 1",
        )
        .bind(id)
        .fetch_optional(&mut *self.executor)
        .await?;
        Ok(survey)
    }

    async fn query(&mut self, query: &SurveyQuery) -> Result<Vec<Survey>, Error> {
        let surveys = query_as(
            "SELECT id, title, description, created_at, creator_ip, theme, header_image, logo_image, is_template, published, archived, expiry_date
            FROM surveys
            WHERE (creator_ip = ? OR creator_ip IS NULL OR creator_ip = '')
                AND is_template = 0
                AND archived = ?
            ORDER BY created_at DESC, id DESC",
        )
        .bind(&query.creator_ip)
        .bind(query.archived)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(surveys)
    }

    async fn templates(&mut self) -> Result<Vec<Survey>, Error> {
        let surveys = query_as(
            "SELECT id, title, description, created_at, creator_ip, theme, header_image, logo_image, is_template, published, archived, expiry_date
            FROM surveys WHERE is_template = 1 ORDER BY id",
        )
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(surveys)
    }

    async fn update(&mut self, id: i64, data: SurveyUpdate) -> Result<(), Error> {
        query("UPDATE surveys SET title = ?, description = ?, theme = ?, expiry_date = ? WHERE id = ?")
            .bind(data.title)
            .bind(data.description)
            .bind(data.theme)
            .bind(data.expiry_date)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_published(&mut self, id: i64, published: bool) -> Result<(), Error> {
        query("UPDATE surveys SET published = ? WHERE id = ?")
            .bind(published)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_archived(&mut self, id: i64, archived: bool) -> Result<(), Error> {
        query("UPDATE surveys SET archived = ? WHERE id = ?")
            .bind(archived)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_image(&mut self, id: i64, slot: ImageSlot, path: &str) -> Result<(), Error> {
        query(&format!("UPDATE surveys SET {} = ? WHERE id = ?", slot.column()))
            .bind(path)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i64) -> Result<u64, Error> {
        let res = query("DELETE FROM surveys WHERE id = ?").bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl<E> QuestionCommon for SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error> {
        let id = query_scalar(
            "INSERT INTO questions (survey_id, question_text, question_type, position, image_path, required)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id",
        )
        .bind(question.survey_id)
        .bind(question.question_text)
        .bind(question.question_type)
        .bind(question.position)
        .bind(question.image_path)
        .bind(question.required)
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i64) -> Result<Option<Question>, Error> {
        let question = query_as(
            "SELECT id, survey_id, question_text, question_type, position, image_path, required, created_at
            FROM questions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.executor)
        .await?;
        Ok(question)
    }

    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Question>, Error> {
        let questions = query_as(
            "SELECT id, survey_id, question_text, question_type, position, image_path, required, created_at
            FROM questions WHERE survey_id = ?
            ORDER BY position, id",
        )
        .bind(survey_id)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(questions)
    }

    async fn max_position(&mut self, survey_id: i64) -> Result<Option<i64>, Error> {
        let max = query_scalar("SELECT MAX(position) FROM questions WHERE survey_id = ?")
            .bind(survey_id)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(max)
    }

    async fn update(&mut self, id: i64, data: QuestionUpdate) -> Result<(), Error> {
        query("UPDATE questions SET question_text = ?, question_type = ?, required = ? WHERE id = ?")
            .bind(data.question_text)
            .bind(data.question_type)
            .bind(data.required)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_position(&mut self, id: i64, position: i64) -> Result<(), Error> {
        query("UPDATE questions SET position = ? WHERE id = ?")
            .bind(position)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_image(&mut self, id: i64, path: &str) -> Result<(), Error> {
        query("UPDATE questions SET image_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i64) -> Result<u64, Error> {
        let res = query("DELETE FROM questions WHERE id = ?").bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl<E> OptionCommon for SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    async fn insert(&mut self, option: OptionInsert) -> Result<i64, Error> {
        let id = query_scalar("INSERT INTO options (question_id, option_text, position, image_path) VALUES (?, ?, ?, ?) RETURNING id")
            .bind(option.question_id)
            .bind(option.option_text)
            .bind(option.position)
            .bind(option.image_path)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i64) -> Result<Option<Opt>, Error> {
        let opt = query_as("SELECT id, question_id, option_text, position, image_path, created_at FROM options WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(opt)
    }

    async fn query_by_question(&mut self, question_id: i64) -> Result<Vec<Opt>, Error> {
        let opts = query_as(
            "SELECT id, question_id, option_text, position, image_path, created_at
            FROM options WHERE question_id = ?
            ORDER BY position, id",
        )
        .bind(question_id)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(opts)
    }

    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Opt>, Error> {
        let opts = query_as(
            "SELECT o.id, o.question_id, o.option_text, o.position, o.image_path, o.created_at
            FROM options AS o
            JOIN questions AS q ON o.question_id = q.id
            WHERE q.survey_id = ?
            ORDER BY q.position, q.id, o.position, o.id",
        )
        .bind(survey_id)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(opts)
    }

    async fn max_position(&mut self, question_id: i64) -> Result<Option<i64>, Error> {
        let max = query_scalar("SELECT MAX(position) FROM options WHERE question_id = ?")
            .bind(question_id)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(max)
    }

    async fn update_text(&mut self, id: i64, option_text: &str) -> Result<(), Error> {
        query("UPDATE options SET option_text = ? WHERE id = ?")
            .bind(option_text)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn set_image(&mut self, id: i64, path: &str) -> Result<(), Error> {
        query("UPDATE options SET image_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i64) -> Result<u64, Error> {
        let res = query("DELETE FROM options WHERE id = ?").bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn is_belongs_to_question(&mut self, question_id: i64, option_id: i64) -> Result<bool, Error> {
        let res = query_scalar("SELECT EXISTS(SELECT 1 FROM options WHERE id = ? AND question_id = ?)")
            .bind(option_id)
            .bind(question_id)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(res)
    }
}

impl<E> ResponseCommon for SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    async fn insert(&mut self, response: ResponseInsert) -> Result<i64, Error> {
        let id = query_scalar("INSERT INTO responses (survey_id, respondent_ip) VALUES (?, ?) RETURNING id")
            .bind(response.survey_id)
            .bind(response.respondent_ip)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<Response>, Error> {
        let responses = query_as(
            "SELECT id, survey_id, respondent_ip, created_at
            FROM responses WHERE survey_id = ?
            ORDER BY created_at, id",
        )
        .bind(survey_id)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(responses)
    }

    async fn count(&mut self, survey_id: i64) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM responses WHERE survey_id = ?")
            .bind(survey_id)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(n)
    }
}

impl<E> AnswerCommon for SqliteSqlx<E>
where
    E: DerefMut<Target = SqliteConnection>,
{
    async fn insert(&mut self, answer: AnswerInsert) -> Result<i64, Error> {
        let value = answer.value;
        let id = query_scalar(
            "INSERT INTO answers (response_id, question_id, option_id, text_answer, number_answer)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id",
        )
        .bind(answer.response_id)
        .bind(answer.question_id)
        .bind(value.option_id())
        .bind(value.text())
        .bind(value.number())
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }

    async fn query_by_survey(&mut self, survey_id: i64) -> Result<Vec<AnswerRow>, Error> {
        let answers = query_as(
            "SELECT a.id, a.response_id, a.question_id, a.option_id, a.text_answer, a.number_answer
            FROM answers AS a
            JOIN responses AS r ON a.response_id = r.id
            WHERE r.survey_id = ?
            ORDER BY r.created_at, r.id, a.id",
        )
        .bind(survey_id)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(answers)
    }
}

impl<E> Common for SqliteSqlx<E> where E: DerefMut<Target = SqliteConnection> {}
impl<E> Store for SqliteSqlx<E> where E: DerefMut<Target = SqliteConnection> {}

impl TxStore for Tx {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}
