/// Mock generator for tests and key-less runs.
///
/// Returns a fixed answer for every prompt and remembers the prompts it saw.
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Generator, GeneratorError};

enum Reply {
    Output(Value),
    NoOutput,
    Fail(String),
}

/// A generator with a canned reply.
///
/// The default instance produces no output.
pub struct MockGenerator {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Always answer with `output`.
    #[must_use]
    pub fn with_output(output: Value) -> Self {
        Self::new(Reply::Output(output))
    }

    /// Always answer with nothing, like a model that returned no candidates.
    #[must_use]
    pub fn no_output() -> Self {
        Self::new(Reply::NoOutput)
    }

    /// Always fail as if the transport broke.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Reply::Fail(message.into()))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::no_output()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<Value>, GeneratorError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.reply {
            Reply::Output(v) => Ok(Some(v.clone())),
            Reply::NoOutput => Ok(None),
            Reply::Fail(msg) => Err(GeneratorError::Unavailable(msg.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_output() {
        let mock = MockGenerator::with_output(json!({"bugs": []}));
        let out = mock.generate("prompt").await.unwrap();
        assert_eq!(out, Some(json!({"bugs": []})));
    }

    #[tokio::test]
    async fn test_mock_default_has_no_output() {
        let mock = MockGenerator::default();
        assert_eq!(mock.generate("prompt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockGenerator::failing("connection refused");
        let err = mock.generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let mock = MockGenerator::no_output();
        mock.generate("first").await.unwrap();
        mock.generate("second").await.unwrap();
        assert_eq!(mock.prompts(), vec!["first", "second"]);
    }
}
