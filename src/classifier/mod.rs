//! Classification client for the external multimodal model.
//!
//! The handler only sees [`ClassificationClient`]; the Gemini implementation
//! holds the credential and the injected instruction prompt.

pub mod errors;
pub mod gemini;
pub mod prompt;
pub mod traits;

pub use errors::{ClientError, ClientResult};
pub use gemini::GeminiClient;
pub use prompt::{load_prompt, DEFAULT_PROMPT};
pub use traits::ClassificationClient;
