//! AI service integration for image generation and chat
//!
//! Provides interfaces to Google's Imagen `predict` API for image variants and
//! to a local Ollama server for HTML-formatted chat replies.

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use gemini::GeminiImagenClient;
pub use mock::{MockChatClient, MockImageGenerationClient};
pub use ollama::OllamaChatClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Request `count` variants of `prompt` and return the provider's raw reply.
    ///
    /// The reply is left untyped so callers can tolerate the different shapes
    /// provider SDKs and API versions produce.
    async fn generate_images(&self, prompt: &str, count: u32) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send a fully rendered prompt and return the model's raw text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
