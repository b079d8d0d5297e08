pub mod client;
pub mod imagen;

pub use imagen::GeminiImagenClient;
