use super::ChatService;
use crate::models::{OllamaGenerateRequest, OllamaGenerateResponse, OllamaOptions};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const TEMPERATURE: f32 = 0.7;
const CONTEXT_WINDOW: u32 = 4096;

/// Client for a local Ollama `/api/generate` endpoint.
pub struct OllamaChatClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OllamaChatClient {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(endpoint, model, timeout, Client::new())
    }

    pub fn new_with_client(
        endpoint: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            endpoint,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl ChatService for OllamaChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
                num_ctx: CONTEXT_WINDOW,
            },
        };

        tracing::debug!("Sending generate request to Ollama model {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Ollama: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Ollama API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Ollama API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let parsed: OllamaGenerateResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(parsed.response)
    }
}

/// Drop markdown fence markers so the reply can be rendered as raw HTML.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "")
}
