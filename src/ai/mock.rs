use super::{ChatService, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Value>>>,
    should_fail: Arc<Mutex<bool>>,
    requests: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: Value) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Prompts and variant counts received so far.
    pub fn get_requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_images(&self, prompt: &str, count: u32) -> Result<Value> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((prompt.to_string(), count));
            requests.len()
        };

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock provider failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(serde_json::json!({ "generatedImages": [] }))
        } else {
            Ok(responses[(call - 1) % responses.len()].clone())
        }
    }
}

pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock chat failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<p>mock reply</p>".to_string())
        } else {
            Ok(responses[(call - 1) % responses.len()].clone())
        }
    }
}
