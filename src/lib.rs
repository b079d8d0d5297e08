//! Backend for a small chat and image-generation demo.
//!
//! Forwards prompts to Google's Imagen API, saves the returned images and
//! answers with a displayable URL, degrading to a placeholder image whenever
//! the provider cannot deliver. A second route proxies chat prompts to a local
//! Ollama server and returns HTML-formatted replies.

pub mod ai;
pub mod app;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod models;
pub mod prompts;
pub mod server;
pub mod storage;

pub use error::{Error, Result};
