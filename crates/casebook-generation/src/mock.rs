//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let backend = MockGenerationBackend::new()
//!     .with_response("# A\n\nfoo");
//!
//! let response = backend.generate(&request).await.unwrap();
//! assert_eq!(backend.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use casebook_core::{Error, GenerationBackend, GenerationRequest, GenerationResponse, Result};

#[derive(Debug, Clone)]
struct MockConfig {
    response: String,
    latency_ms: u64,
    fail_with: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            response: "# Summary\n\nMock generated content.".to_string(),
            latency_ms: 0,
            fail_with: None,
        }
    }
}

/// Mock generation backend with a call log.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the fixed response content.
    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = content.into();
        self
    }

    /// Set simulated latency.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_with = Some(message.into());
        self
    }

    /// Get all logged requests for assertion.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of generate calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse> {
        self.calls.lock().unwrap().push(req.clone());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(message) = &self.config.fail_with {
            return Err(Error::Generation(message.clone()));
        }

        Ok(GenerationResponse {
            content: self.config.response.clone(),
            model: Some("mock".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
