/// Text-generation capability used by the analysis invoker.
///
/// A generator receives a fully rendered prompt and returns the model's
/// structured (JSON) answer, or `None` when the model produced nothing
/// usable. Only transport-level problems are errors.
pub mod gemini;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ModelConfig, Provider};

/// Errors raised while talking to the model provider.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model request timed out")]
    Timeout,

    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API key not set (expected environment variable {0})")]
    MissingApiKey(String),

    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Trait for structured text generation.
///
/// Implementations must be `Send + Sync` to be shared behind `Arc` across
/// request handlers.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation for `prompt`. No retries.
    async fn generate(&self, prompt: &str) -> Result<Option<Value>, GeneratorError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Build the configured generator.
///
/// A missing API key downgrades to a mock that never produces output, so
/// the service still starts and every analysis degrades to the empty result.
#[must_use]
pub fn from_config(model: &ModelConfig) -> Arc<dyn Generator> {
    match model.provider {
        Provider::Mock => {
            info!("Using mock generator");
            Arc::new(mock::MockGenerator::default())
        }
        Provider::Gemini => match gemini::GeminiGenerator::from_env(model) {
            Ok(g) => {
                info!("Using Gemini model {}", model.name);
                Arc::new(g)
            }
            Err(e) => {
                warn!("{e}; falling back to mock generator, analyses will return no findings");
                Arc::new(mock::MockGenerator::default())
            }
        },
    }
}
