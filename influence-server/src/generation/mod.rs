//! Post text generation

pub mod gemini;

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

pub use gemini::GeminiGenerator;

/// Errors returned by a text generator
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("Model responded with {status}: {body}")]
    Provider { status: StatusCode, body: String },
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
    #[error("Model returned no text")]
    Empty,
}

/// Input for a single post completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// What the user wants the post to be about
    pub prompt: String,
    /// Display name of the member the post is written for
    pub author: String,
}

impl GenerationRequest {
    /// Full instruction sent to the model
    pub fn render(&self) -> String {
        let author = if self.author.trim().is_empty() {
            "a LinkedIn member"
        } else {
            self.author.trim()
        };
        format!(
            "You are an expert LinkedIn thought leader writing for {author}. \
             Your tone should be professional and insightful. \
             Based on the following prompt, write a concise LinkedIn post with 3-5 relevant hashtags.\n\n\
             PROMPT: \"{prompt}\"\n\n\
             LINKEDIN POST:",
            author = author,
            prompt = self.prompt.trim()
        )
    }
}

/// A black-box text completion service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produces a single post body for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
