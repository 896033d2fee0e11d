pub mod openai;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Reply contained no text")]
    EmptyReply,
}

/// A text-generation backend: prompt in, free-form text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
