//! HTTP client for an external generation endpoint.
//!
//! The endpoint accepts a JSON payload of template sections, source
//! documents, and profile context, and returns `{"content": "..."}`.
//! Non-2xx responses and transport failures surface as errors; the caller
//! (the generation session) rolls back to its selection state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use casebook_core::{Error, GenerationBackend, GenerationRequest, GenerationResponse, Result};

use crate::config::HttpConfig;

/// Generation backend speaking JSON over HTTP.
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    #[serde(flatten)]
    request: &'a GenerationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireResponse {
    content: String,
    #[serde(default)]
    model: Option<String>,
}

impl HttpGenerationBackend {
    /// Build a backend from HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::Config(
                "generation endpoint URL is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse> {
        let start = Instant::now();
        debug!(
            subsystem = "generation",
            backend = "http",
            sections = req.template_sections.len(),
            sources = req.source_documents.len(),
            "generate: request"
        );

        let body = WireRequest {
            request: req,
            model: self.model.as_deref(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "generation",
                backend = "http",
                status = %status,
                "generate: endpoint returned error"
            );
            return Err(Error::Generation(format!(
                "endpoint returned {}: {}",
                status, detail
            )));
        }

        let wire: WireResponse = response.json().await?;
        info!(
            subsystem = "generation",
            backend = "http",
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = wire.content.len(),
            "generate: done"
        );

        Ok(GenerationResponse {
            content: wire.content,
            model: wire.model.or_else(|| self.model.clone()),
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
