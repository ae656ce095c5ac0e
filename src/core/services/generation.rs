use crate::core::models::generation::{GenerateRequest, GeneratedQuestions};
use crate::core::ports::generator::QuestionGenerator;
use crate::error::Error;
use log::{error, info};

pub fn build_prompt(topic: &str, count: i64, include_visuals: bool) -> String {
    let visuals = if include_visuals {
        "For multiple-choice questions, suggest relevant images that could be used for visual appeal.\n"
    } else {
        ""
    };
    format!(
        r#"Generate {count} survey questions for market research on {topic}.
Include a mix of question types (multiple-choice, rating scales, sliders).
{visuals}Format as JSON with this exact structure:
{{
    "questions": [
        {{
            "question_text": "The question text here",
            "question_type": "multiple-choice|rating|slider|text",
            "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
            "suggested_image": "Brief description of an appropriate image (e.g., 'product features comparison chart')"
        }}
    ]
}}
Only return the JSON, no additional text."#
    )
}

/// Slice from the first `{` to the last `}`, or the whole reply when there is none.
pub fn json_slice(reply: &str) -> &str {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => &reply[start..=end],
        _ => reply,
    }
}

pub fn parse_reply(reply: &str) -> Result<GeneratedQuestions, Error> {
    serde_json::from_str(json_slice(reply)).map_err(|e| {
        error!("failed to parse generator reply: {}: {}", e, reply);
        Error::UpstreamFailure(format!("unparseable reply: {}", e))
    })
}

pub async fn generate_questions<G>(generator: &G, req: &GenerateRequest) -> Result<GeneratedQuestions, Error>
where
    G: QuestionGenerator,
{
    let prompt = build_prompt(req.topic(), req.count(), req.include_visuals);
    info!("generating {} questions on {}", req.count(), req.topic());
    let reply = generator.complete(&prompt).await?;
    parse_reply(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl QuestionGenerator for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String, Error> {
            Ok(self.0.to_owned())
        }
    }

    struct Recorder(std::sync::Mutex<String>);

    impl QuestionGenerator for Recorder {
        async fn complete(&self, prompt: &str) -> Result<String, Error> {
            *self.0.lock().unwrap() = prompt.to_owned();
            Ok(r#"{"questions": []}"#.into())
        }
    }

    #[test]
    fn slices_wrapped_json() {
        assert_eq!(json_slice("Sure! ```json\n{\"a\": {\"b\": 1}}\n```"), "{\"a\": {\"b\": 1}}");
        assert_eq!(json_slice("no braces"), "no braces");
        assert_eq!(json_slice("} backwards {"), "} backwards {");
    }

    #[tokio::test]
    async fn parses_questions_out_of_chatter() {
        let generator = Canned(
            r#"Here you go:
            {"questions": [{"question_text": "How do you price?", "question_type": "multiple-choice", "options": ["Cost-plus", "Value"]},
                           {"question_text": "Rate our pricing", "question_type": "rating"}]}
            Thanks"#,
        );
        let out = generate_questions(&generator, &GenerateRequest::default()).await.unwrap();
        assert_eq!(out.questions.len(), 2);
        assert_eq!(out.questions[0].options, vec!["Cost-plus", "Value"]);
        assert!(out.questions[1].options.is_empty());
    }

    #[tokio::test]
    async fn garbage_is_upstream_failure() {
        let err = generate_questions(&Canned("I cannot help with that."), &GenerateRequest::default()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamFailure(_)));
    }

    #[tokio::test]
    async fn prompt_uses_defaults_and_clamps() {
        let recorder = Recorder(Default::default());
        let req = GenerateRequest {
            topic: Some("  ".into()),
            num_questions: Some(50),
            include_visuals: true,
        };
        generate_questions(&recorder, &req).await.unwrap();
        let prompt = recorder.0.lock().unwrap().clone();
        assert!(prompt.starts_with("Generate 10 survey questions for market research on pricing management."));
        assert!(prompt.contains("suggest relevant images"));
    }
}
