//! Data models and structures
//!
//! Defines the HTTP payloads served by the backend, the Ollama wire format
//! and the process configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";

/// Body of `POST /api/generate-image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ImageRequest {
    /// The prompt, or `None` when it is absent or empty.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ChatRequest {
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Ollama API Request/Response models
#[derive(Debug, Serialize)]
pub struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: OllamaOptions,
}

#[derive(Debug, Serialize)]
pub struct OllamaOptions {
    pub temperature: f32,
    pub num_ctx: u32,
}

#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    pub response: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the no-key placeholder fallback.
    pub generative_api_key: Option<String>,
    pub imagen_model: String,
    pub imagen_base_url: String,
    pub image_output_dir: PathBuf,
    pub image_timeout: Duration,
    pub ollama_endpoint: String,
    pub ollama_model: String,
    pub chat_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| crate::Error::Config(format!("Invalid PORT '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            generative_api_key: non_empty("GENERATIVE_API_KEY"),
            imagen_model: non_empty("IMAGEN_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGEN_MODEL.to_string()),
            imagen_base_url: non_empty("IMAGEN_BASE_URL")
                .unwrap_or_else(|| crate::ai::gemini::client::DEFAULT_BASE_URL.to_string()),
            image_output_dir: non_empty("IMAGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            image_timeout: parse_secs(non_empty("IMAGE_TIMEOUT_SECS"), "IMAGE_TIMEOUT_SECS")?,
            ollama_endpoint: non_empty("OLLAMA_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
            ollama_model: non_empty("OLLAMA_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            chat_timeout: parse_secs(non_empty("CHAT_TIMEOUT_SECS"), "CHAT_TIMEOUT_SECS")?,
            port,
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str) -> crate::Result<Duration> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| crate::Error::Config(format!("Invalid {} '{}'", key, raw))),
        None => Ok(Duration::from_secs(120)),
    }
}
