//! Application orchestration for image generation and chat requests.

use crate::ai::{
    ollama, ChatService, GeminiImagenClient, ImageGenerationService, OllamaChatClient,
};
use crate::extract;
use crate::fallback::Fallback;
use crate::models::{Config, ImageResponse};
use crate::storage::{DiskImageStore, ImageStore};
use crate::{prompts, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{error, info, warn};

/// Number of variants requested from the image provider per call.
pub const IMAGE_VARIANTS: u32 = 4;

/// Coordinates the image provider, image persistence and the chat backend.
pub struct App {
    image_gen: Option<Box<dyn ImageGenerationService>>,
    chat: Box<dyn ChatService>,
    store: Box<dyn ImageStore>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    /// `None` means no provider API key is configured.
    pub image_gen: Option<Box<dyn ImageGenerationService>>,
    pub chat: Box<dyn ChatService>,
    pub store: Box<dyn ImageStore>,
}

/// Result of one image generation attempt that reached the provider.
enum Generation {
    Generated(ImageResponse),
    Empty,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            image_gen: services.image_gen,
            chat: services.chat,
            store: services.store,
        }
    }

    /// Construct an app from process configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let image_gen = match &config.generative_api_key {
            Some(api_key) => {
                info!("Image provider: Imagen (model: {})", config.imagen_model);
                Some(Box::new(
                    GeminiImagenClient::new_with_client(
                        api_key.clone(),
                        config.imagen_model.clone(),
                        config.image_timeout,
                        http_client.clone(),
                    )
                    .with_base_url(config.imagen_base_url.clone()),
                ) as Box<dyn ImageGenerationService>)
            }
            None => {
                warn!("GENERATIVE_API_KEY not set; image requests will return placeholders");
                None
            }
        };

        info!(
            "Chat provider: Ollama at {} (model: {})",
            config.ollama_endpoint, config.ollama_model
        );
        let chat = Box::new(OllamaChatClient::new_with_client(
            config.ollama_endpoint.clone(),
            config.ollama_model.clone(),
            config.chat_timeout,
            http_client,
        ));

        info!(
            "Generated images will be written to {}",
            config.image_output_dir.display()
        );
        let store = Box::new(DiskImageStore::new(&config.image_output_dir));

        Self::with_services(AppServices {
            image_gen,
            chat,
            store,
        })
    }

    /// Generate images for `prompt`, degrading to a placeholder on any failure.
    ///
    /// `prompt` must already be validated as non-empty.
    pub async fn generate_image(&self, prompt: &str) -> ImageResponse {
        let Some(image_gen) = self.image_gen.as_deref() else {
            warn!("Missing GENERATIVE_API_KEY; serving placeholder image");
            return Fallback::ConfigurationMissing.response(prompt);
        };

        match self.try_generate(image_gen, prompt).await {
            Ok(Generation::Generated(response)) => response,
            Ok(Generation::Empty) => Fallback::UpstreamEmptyResult.response(prompt),
            Err(e) => {
                error!("[generate-image] {:?}", e);
                Fallback::UpstreamFailure.response(prompt)
            }
        }
    }

    async fn try_generate(
        &self,
        image_gen: &dyn ImageGenerationService,
        prompt: &str,
    ) -> Result<Generation> {
        let response = image_gen.generate_images(prompt, IMAGE_VARIANTS).await?;

        let entries = match extract::generated_images(&response) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                warn!("No images returned: {}", response);
                return Ok(Generation::Empty);
            }
        };

        // Numbering is local to this request and advances only on a write.
        let mut sequence = 1usize;
        let mut first_written: Option<&str> = None;

        for (index, entry) in entries.iter().enumerate() {
            let Some(b64) = extract::image_bytes(entry) else {
                warn!("Skipping entry {} without image bytes: {}", index, entry);
                continue;
            };

            let bytes = BASE64.decode(b64)?;
            let file_name = format!("imagen-{}.png", sequence);
            let path = self.store.write_image(&file_name, &bytes).await?;
            info!("Wrote {}", path.display());

            first_written.get_or_insert(b64);
            sequence += 1;
        }

        match first_written {
            Some(b64) => Ok(Generation::Generated(ImageResponse {
                image_url: format!("data:image/png;base64,{}", b64),
                note: None,
            })),
            None => {
                warn!("All {} returned entries lacked image bytes", entries.len());
                Ok(Generation::Empty)
            }
        }
    }

    /// Ask the chat model for an HTML answer to `request`.
    pub async fn chat(&self, request: &str) -> Result<String> {
        let prompt = prompts::render(prompts::CHAT_HTML, &[("request", request)]);
        let text = self.chat.complete(&prompt).await?;
        Ok(ollama::strip_code_fences(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockImageGenerationClient};
    use crate::storage::MockImageStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn b64(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    /// Wraps a shared mock so tests can inspect it after handing it to the app.
    struct SharedImageGen(Arc<MockImageGenerationClient>);

    #[async_trait::async_trait]
    impl ImageGenerationService for SharedImageGen {
        async fn generate_images(&self, prompt: &str, count: u32) -> Result<serde_json::Value> {
            self.0.generate_images(prompt, count).await
        }
    }

    fn app_with(image_gen: Option<MockImageGenerationClient>, store: MockImageStore) -> App {
        App::with_services(AppServices {
            image_gen: image_gen.map(|g| Box::new(g) as Box<dyn ImageGenerationService>),
            chat: Box::new(MockChatClient::new()),
            store: Box::new(store),
        })
    }

    #[tokio::test]
    async fn test_no_api_key_returns_placeholder() {
        let store = MockImageStore::new();
        let app = app_with(None, store.clone());

        let response = app.generate_image("a red fox").await;

        assert_eq!(
            response,
            ImageResponse {
                image_url: "https://placehold.co/800x500?text=a%20red%20fox".to_string(),
                note: Some("fallback - no API key".to_string()),
            }
        );
        assert_eq!(store.get_write_count(), 0);
    }

    #[tokio::test]
    async fn test_requests_four_variants_with_prompt() {
        let image_gen = Arc::new(MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [{ "image": { "imageBytes": b64(b"png") } }]
        })));
        let app = App::with_services(AppServices {
            image_gen: Some(Box::new(SharedImageGen(image_gen.clone()))),
            chat: Box::new(MockChatClient::new()),
            store: Box::new(MockImageStore::new()),
        });

        app.generate_image("a red fox").await;

        assert_eq!(image_gen.get_requests(), vec![("a red fox".to_string(), 4)]);
    }

    #[tokio::test]
    async fn test_empty_list_returns_no_images_fallback() {
        let store = MockImageStore::new();
        let image_gen =
            MockImageGenerationClient::new().with_response(json!({ "generatedImages": [] }));
        let app = app_with(Some(image_gen), store.clone());

        let response = app.generate_image("a red fox").await;

        assert_eq!(response.note.as_deref(), Some("fallback - no images returned"));
        assert_eq!(
            response.image_url,
            "https://placehold.co/800x500?text=a%20red%20fox"
        );
        assert_eq!(store.get_write_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_list_returns_no_images_fallback() {
        let image_gen =
            MockImageGenerationClient::new().with_response(json!({ "something": "else" }));
        let app = app_with(Some(image_gen), MockImageStore::new());

        let response = app.generate_image("x").await;

        assert_eq!(response.note.as_deref(), Some("fallback - no images returned"));
    }

    #[tokio::test]
    async fn test_first_entry_bytes_become_data_url() {
        let first = b64(&[0x89, 0x50, 0x4E, 0x47, 0x01]);
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [
                { "image": { "imageBytes": first } },
                { "image": { "imageBytes": b64(b"second") } }
            ]
        }));
        let app = app_with(Some(image_gen), MockImageStore::new());

        let response = app.generate_image("a red fox").await;

        assert_eq!(response.image_url, format!("data:image/png;base64,{}", first));
        assert_eq!(response.note, None);
    }

    #[tokio::test]
    async fn test_skipped_entries_do_not_consume_sequence_numbers() {
        let store = MockImageStore::new();
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generated_images": [
                { "image": { "imageBytes": b64(b"one") } },
                { "raiFilteredReason": "blocked" },
                { "b64_json": b64(b"two") },
                { "image": {} },
                { "base64": b64(b"three") }
            ]
        }));
        let app = app_with(Some(image_gen), store.clone());

        app.generate_image("x").await;

        let files = store.get_files();
        assert_eq!(
            files.keys().cloned().collect::<Vec<_>>(),
            vec!["imagen-1.png", "imagen-2.png", "imagen-3.png"]
        );
        assert_eq!(files["imagen-1.png"], b"one".to_vec());
        assert_eq!(files["imagen-2.png"], b"two".to_vec());
        assert_eq!(files["imagen-3.png"], b"three".to_vec());
    }

    #[tokio::test]
    async fn test_unusable_first_entry_uses_first_written_bytes() {
        let second = b64(b"second");
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [
                { "image": {} },
                { "image": { "b64_json": second } }
            ]
        }));
        let app = app_with(Some(image_gen), MockImageStore::new());

        let response = app.generate_image("x").await;

        assert_eq!(response.image_url, format!("data:image/png;base64,{}", second));
        assert_eq!(response.note, None);
    }

    #[tokio::test]
    async fn test_no_usable_entries_returns_no_images_fallback() {
        let store = MockImageStore::new();
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [{ "image": {} }, { "base64": "" }]
        }));
        let app = app_with(Some(image_gen), store.clone());

        let response = app.generate_image("x").await;

        assert_eq!(response.note.as_deref(), Some("fallback - no images returned"));
        assert_eq!(store.get_write_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_upstream_fallback() {
        let image_gen = MockImageGenerationClient::new().with_failure(true);
        let app = app_with(Some(image_gen), MockImageStore::new());

        let response = app.generate_image("a red fox").await;

        assert_eq!(
            response,
            ImageResponse {
                image_url: "https://placehold.co/800x500?text=a%20red%20fox".to_string(),
                note: Some("fallback due to upstream error (check backend logs)".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_base64_returns_upstream_fallback() {
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [{ "image": { "imageBytes": "!!!not-base64!!!" } }]
        }));
        let app = app_with(Some(image_gen), MockImageStore::new());

        let response = app.generate_image("x").await;

        assert_eq!(
            response.note.as_deref(),
            Some("fallback due to upstream error (check backend logs)")
        );
    }

    #[tokio::test]
    async fn test_write_failure_returns_upstream_fallback() {
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [{ "image": { "imageBytes": b64(b"png") } }]
        }));
        let app = app_with(Some(image_gen), MockImageStore::new().with_failure(true));

        let response = app.generate_image("x").await;

        assert_eq!(
            response.note.as_deref(),
            Some("fallback due to upstream error (check backend logs)")
        );
    }

    #[tokio::test]
    async fn test_sequence_restarts_for_each_request() {
        let store = MockImageStore::new();
        let image_gen = MockImageGenerationClient::new().with_response(json!({
            "generatedImages": [{ "image": { "imageBytes": b64(b"png") } }]
        }));
        let app = app_with(Some(image_gen), store.clone());

        app.generate_image("first").await;
        app.generate_image("second").await;

        assert_eq!(store.get_write_count(), 2);
        assert_eq!(
            store.get_files().keys().cloned().collect::<Vec<_>>(),
            vec!["imagen-1.png"]
        );
    }

    #[tokio::test]
    async fn test_chat_wraps_prompt_and_strips_fences() {
        let chat = Arc::new(
            MockChatClient::new().with_response("```html\n<h2>Tides</h2>\n```".to_string()),
        );

        struct SharedChat(Arc<MockChatClient>);

        #[async_trait::async_trait]
        impl ChatService for SharedChat {
            async fn complete(&self, prompt: &str) -> Result<String> {
                self.0.complete(prompt).await
            }
        }

        let app = App::with_services(AppServices {
            image_gen: None,
            chat: Box::new(SharedChat(chat.clone())),
            store: Box::new(MockImageStore::new()),
        });

        let html = app.chat("explain tides").await.unwrap();

        assert_eq!(html, "\n<h2>Tides</h2>\n");
        let prompts = chat.get_prompts();
        assert!(prompts[0].starts_with("You are a helpful AI assistant."));
        assert!(prompts[0].ends_with("Request: \"explain tides\""));
    }

    #[tokio::test]
    async fn test_chat_failure_propagates() {
        let app = App::with_services(AppServices {
            image_gen: None,
            chat: Box::new(MockChatClient::new().with_failure(true)),
            store: Box::new(MockImageStore::new()),
        });

        assert!(app.chat("x").await.is_err());
    }
}
