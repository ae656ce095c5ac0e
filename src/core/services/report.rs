use crate::core::models::{
    answer::{Answer, AnswerValue},
    common::Requester,
    option::Opt,
    question::{QuestionType, QuestionWithOptions},
    report::{Export, HistogramBin, OptionCount, QuestionSeries, ResolvedAnswer, ResponseSummary, Results, Series, DEFAULT_BINS, NO_ANSWER},
    response::Response,
    survey::SurveyDetail,
};
use crate::core::ports::repository::{AnswerCommon, ResponseCommon, Store};
use crate::core::services::survey::{editable_survey, survey_detail};
use crate::error::Error;
use chrono::NaiveDate;
use itertools::Itertools;
use log::warn;
use std::collections::HashMap;

/// Equal-width bins over `[min, max]`, the last bin closed. A single distinct
/// value gets the unit range around it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Chart series for one question from its answers in submission order.
pub fn question_series(question: &QuestionWithOptions, answers: &[&Answer]) -> Series {
    if answers.is_empty() {
        return Series::NoData;
    }
    match question.question.question_type {
        QuestionType::MultipleChoice | QuestionType::ImageChoice => {
            let counts = answers.iter().filter_map(|a| a.value.option_id()).counts();
            Series::Choice {
                counts: question
                    .options
                    .iter()
                    .map(|o| OptionCount {
                        option_id: o.id,
                        option_text: o.option_text.clone(),
                        count: counts.get(&o.id).copied().unwrap_or(0) as i64,
                    })
                    .collect(),
            }
        }
        QuestionType::Rating | QuestionType::Slider => {
            let values: Vec<f64> = answers.iter().filter_map(|a| a.value.number()).collect();
            let histogram = histogram(&values, DEFAULT_BINS);
            Series::Numeric { values, histogram }
        }
        QuestionType::Text => Series::Text {
            answers: answers.iter().filter_map(|a| a.value.text()).filter(|t| !t.is_empty()).map(str::to_owned).collect(),
        },
    }
}

/// Answers of a survey converted to tagged values; malformed rows are dropped.
async fn load_answers<S>(storer: &mut S, survey_id: i64) -> Result<Vec<Answer>, Error>
where
    S: Store,
{
    let answers = AnswerCommon::query_by_survey(storer, survey_id)
        .await?
        .into_iter()
        .filter_map(|row| match Answer::try_from(row) {
            Ok(answer) => Some(answer),
            Err(row) => {
                warn!("answer {} has no single payload, ignored", row.id);
                None
            }
        })
        .collect();
    Ok(answers)
}

fn option_text(options: &[Opt], option_id: i64) -> Option<String> {
    options.iter().find(|o| o.id == option_id).map(|o| o.option_text.clone())
}

fn resolve(question: &QuestionWithOptions, answer: &Answer) -> ResolvedAnswer {
    let q = &question.question;
    ResolvedAnswer {
        question_id: q.id,
        question_text: q.question_text.clone(),
        question_type: q.question_type,
        option_id: answer.value.option_id(),
        option_text: answer.value.option_id().and_then(|id| option_text(&question.options, id)),
        text_answer: answer.value.text().map(str::to_owned),
        number_answer: answer.value.number(),
    }
}

fn build_results(detail: SurveyDetail, responses: Vec<Response>, answers: Vec<Answer>) -> Results {
    let by_question = answers.iter().into_group_map_by(|a| a.question_id);
    let series = detail
        .questions
        .iter()
        .map(|q| QuestionSeries {
            question_id: q.question.id,
            position: q.question.position,
            question_text: q.question.question_text.clone(),
            question_type: q.question.question_type,
            series: question_series(q, by_question.get(&q.question.id).map(Vec::as_slice).unwrap_or_default()),
        })
        .collect();

    let questions: HashMap<i64, &QuestionWithOptions> = detail.questions.iter().map(|q| (q.question.id, q)).collect();
    let by_response = answers.iter().into_group_map_by(|a| a.response_id);
    let summaries = responses
        .iter()
        .rev()
        .map(|r| ResponseSummary {
            id: r.id,
            created_at: r.created_at,
            respondent_ip: r.respondent_ip.clone(),
            answers: by_response
                .get(&r.id)
                .into_iter()
                .flatten()
                .filter_map(|a| questions.get(&a.question_id).map(|q| resolve(q, a)))
                .collect(),
        })
        .collect();

    Results {
        response_count: responses.len(),
        series,
        responses: summaries,
        survey: detail.survey,
    }
}

/// Per-question series plus every response, newest first.
pub async fn results<S>(storer: &mut S, requester: &Requester, survey_id: i64) -> Result<Results, Error>
where
    S: Store,
{
    let survey = editable_survey(storer, requester, survey_id).await?;
    let detail = survey_detail(storer, survey).await?;
    let responses = ResponseCommon::query_by_survey(storer, survey_id).await?;
    let answers = load_answers(storer, survey_id).await?;
    Ok(build_results(detail, responses, answers))
}

fn cell(question: &QuestionWithOptions, answer: Option<&Answer>) -> String {
    match answer.map(|a| &a.value) {
        Some(AnswerValue::Choice(id)) => option_text(&question.options, *id).unwrap_or_else(|| NO_ANSWER.into()),
        Some(AnswerValue::Text(t)) if !t.is_empty() => t.clone(),
        Some(AnswerValue::Number(n)) => format!("{:?}", n),
        _ => NO_ANSWER.into(),
    }
}

pub fn export_filename(title: &str, today: NaiveDate) -> String {
    format!("{}_responses_{}.csv", title.replace(' ', "_"), today.format("%Y%m%d"))
}

/// One row per response in submission order, one column per question.
pub fn write_csv(detail: &SurveyDetail, responses: &[Response], answers: &[Answer]) -> Result<Vec<u8>, Error> {
    let mut first: HashMap<(i64, i64), &Answer> = HashMap::new();
    for a in answers {
        first.entry((a.response_id, a.question_id)).or_insert(a);
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Response ID".to_owned(), "Submission Time".to_owned(), "Respondent".to_owned()];
    header.extend(detail.questions.iter().map(|q| format!("Q{}: {}", q.question.position, q.question.question_text)));
    writer.write_record(&header)?;
    for r in responses {
        let mut row = vec![r.id.to_string(), r.created_at.to_string(), r.respondent_ip.clone().unwrap_or_default()];
        row.extend(detail.questions.iter().map(|q| cell(q, first.get(&(r.id, q.question.id)).copied())));
        writer.write_record(&row)?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

pub async fn export<S>(storer: &mut S, requester: &Requester, survey_id: i64, today: NaiveDate) -> Result<Export, Error>
where
    S: Store,
{
    let survey = editable_survey(storer, requester, survey_id).await?;
    let detail = survey_detail(storer, survey).await?;
    let responses = ResponseCommon::query_by_survey(storer, survey_id).await?;
    let answers = load_answers(storer, survey_id).await?;
    Ok(Export {
        filename: export_filename(&detail.survey.title, today),
        content: write_csv(&detail, &responses, &answers)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{answer::Submission, question::QuestionCreate, survey::SurveyCreate};
    use crate::core::services::{question::add_question, response::submit, survey::create_survey, survey::toggle_publish};
    use crate::testing::{manager, owner, stranger};
    use serde_json::json;

    #[test]
    fn histogram_spreads_values() {
        let bins = histogram(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1, 1, 1]);
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[4].upper, 5.0);

        let bins = histogram(&[1.0, 1.0, 5.0], 2);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn histogram_of_one_value() {
        let bins = histogram(&[3.0, 3.0], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].lower, 2.5);
        assert_eq!(bins[4].upper, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(bins[2].count, 2);
        assert!(histogram(&[], 5).is_empty());
    }

    #[test]
    fn filename_replaces_spaces() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename("Team lunch poll", day), "Team_lunch_poll_responses_20240309.csv");
    }

    async fn abc_survey(manager: &crate::database::sqlx::SqliteSqlxManager) -> (i64, QuestionWithOptions) {
        let sid = create_survey(
            manager.begin().await.unwrap(),
            &owner(),
            SurveyCreate {
                title: "Letters poll".into(),
                description: None,
                theme: None,
                template_id: None,
            },
        )
        .await
        .unwrap();
        let q = add_question(
            manager.begin().await.unwrap(),
            &owner(),
            sid,
            QuestionCreate {
                question_text: "Pick a letter".into(),
                question_type: "multiple-choice".into(),
                required: false,
                options: vec!["A".into(), "B".into(), "C".into()],
            },
        )
        .await
        .unwrap();
        toggle_publish(manager.begin().await.unwrap(), &owner(), sid).await.unwrap();
        (sid, q)
    }

    fn one_answer(question_id: i64, option_id: i64) -> Submission {
        serde_json::from_value(json!({ "answers": [{ "question_id": question_id, "option_id": option_id }] })).unwrap()
    }

    #[tokio::test]
    async fn choice_counts_and_export_rows() {
        let manager = manager().await;
        let (sid, q) = abc_survey(&manager).await;
        let (a, b) = (q.options[0].id, q.options[1].id);
        for option in [a, a, b] {
            submit(manager.begin().await.unwrap(), &stranger(), sid, one_answer(q.question.id, option)).await.unwrap();
        }

        let mut conn = manager.acquire().await.unwrap();
        let results = results(&mut conn, &owner(), sid).await.unwrap();
        assert_eq!(results.response_count, 3);
        let Series::Choice { counts } = &results.series[0].series else {
            panic!("expected choice series");
        };
        let counts: Vec<_> = counts.iter().map(|c| (c.option_text.as_str(), c.count)).collect();
        assert_eq!(counts, vec![("A", 2), ("B", 1), ("C", 0)]);
        assert!(results.responses[0].id > results.responses[2].id);
        assert_eq!(results.responses[2].answers[0].option_text.as_deref(), Some("A"));

        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let export = export(&mut conn, &owner(), sid, day).await.unwrap();
        assert_eq!(export.filename, "Letters_poll_responses_20240102.csv");
        let mut reader = csv::Reader::from_reader(export.content.as_slice());
        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), 4);
        assert_eq!(&header[3], "Q1: Pick a letter");
        let cells: Vec<String> = reader.records().map(|r| r.unwrap()[3].to_owned()).collect();
        assert_eq!(cells, vec!["A", "A", "B"]);
    }

    #[tokio::test]
    async fn skipped_question_exports_no_answer() {
        let manager = manager().await;
        let (sid, q) = abc_survey(&manager).await;
        let rating = add_question(
            manager.begin().await.unwrap(),
            &owner(),
            sid,
            QuestionCreate {
                question_text: "Rate the letters".into(),
                question_type: "rating".into(),
                required: false,
                options: vec![],
            },
        )
        .await
        .unwrap();
        submit(manager.begin().await.unwrap(), &stranger(), sid, one_answer(q.question.id, q.options[2].id)).await.unwrap();
        let with_rating = serde_json::from_value(json!({ "answers": [{ "question_id": rating.question.id, "number_answer": 4 }] })).unwrap();
        submit(manager.begin().await.unwrap(), &stranger(), sid, with_rating).await.unwrap();

        let mut conn = manager.acquire().await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let export = export(&mut conn, &owner(), sid, day).await.unwrap();
        let mut reader = csv::Reader::from_reader(export.content.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert!(rows.iter().all(|r| r.len() == 5));
        assert_eq!((&rows[0][3], &rows[0][4]), ("C", NO_ANSWER));
        assert_eq!((&rows[1][3], &rows[1][4]), (NO_ANSWER, "4.0"));
        assert_eq!(&rows[0][2], "10.0.0.2");

        let results = results(&mut conn, &owner(), sid).await.unwrap();
        let Series::Numeric { values, histogram } = &results.series[1].series else {
            panic!("expected numeric series");
        };
        assert_eq!(values, &vec![4.0]);
        assert_eq!(histogram.len(), DEFAULT_BINS);
    }

    #[tokio::test]
    async fn unanswered_questions_have_no_data() {
        let manager = manager().await;
        let (sid, _) = abc_survey(&manager).await;
        let mut conn = manager.acquire().await.unwrap();
        let results = results(&mut conn, &owner(), sid).await.unwrap();
        assert_eq!(results.series[0].series, Series::NoData);
        assert!(matches!(super::results(&mut conn, &stranger(), sid).await.unwrap_err(), Error::Forbidden(_)));
    }

    #[test]
    fn empty_text_exports_marker() {
        let question = QuestionWithOptions {
            question: crate::core::models::question::Question {
                id: 1,
                survey_id: 1,
                question_text: "Anything else?".into(),
                question_type: QuestionType::Text,
                position: 1,
                image_path: None,
                required: false,
                created_at: chrono::NaiveDateTime::default(),
            },
            options: vec![],
        };
        let answer = |value| Answer {
            id: 1,
            response_id: 1,
            question_id: 1,
            value,
        };
        assert_eq!(cell(&question, Some(&answer(AnswerValue::Text(String::new())))), NO_ANSWER);
        assert_eq!(cell(&question, Some(&answer(AnswerValue::Text("Great".into())))), "Great");
        assert_eq!(cell(&question, None), NO_ANSWER);
        assert_eq!(question_series(&question, &[&answer(AnswerValue::Text(String::new()))]), Series::Text { answers: vec![] });
    }
}
