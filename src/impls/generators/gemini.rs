use crate::core::ports::generator::QuestionGenerator;
use crate::error::Error;
use log::{error, warn};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-flash:generateContent";
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl Reply {
    fn into_text(self) -> Option<String> {
        self.candidates.into_iter().next()?.content.parts.into_iter().next().map(|p| p.text)
    }
}

/// `generateContent` client. The API key travels as the `key` query parameter.
pub struct Gemini {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl Gemini {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(TIMEOUT).build().map_err(|e| {
            error!("failed to build http client: {}", e);
            Error::UpstreamFailure(e.to_string())
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

fn upstream(context: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        error!("{}: request timed out", context);
    } else {
        error!("{}: {}", context, e);
    }
    Error::UpstreamFailure(format!("{}: {}", context, e))
}

impl QuestionGenerator for Gemini {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let payload = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let reply: Reply = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| upstream("generator request failed", e))?
            .json()
            .await
            .map_err(|e| upstream("generator reply unreadable", e))?;
        reply.into_text().ok_or_else(|| {
            warn!("generator reply carried no candidates");
            Error::UpstreamFailure("no candidates".into())
        })
    }
}
