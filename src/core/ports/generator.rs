use crate::error::Error;

/// Text-generation backend used to draft survey questions.
pub trait QuestionGenerator {
    /// Sends `prompt` and returns the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}
