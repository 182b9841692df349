//! Simulated generation backend.
//!
//! Used when no external endpoint is configured: waits a fixed delay to
//! approximate a network round-trip, then returns deterministic
//! heading-delimited content derived from the request. Development and UI
//! work run against this backend without any remote service.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use casebook_core::defaults;
use casebook_core::{GenerationBackend, GenerationRequest, GenerationResponse, Result};

/// Deterministic local stand-in for the generation endpoint.
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            defaults::SIMULATED_GENERATION_DELAY_MS,
        ))
    }
}

fn render_section(title: &str, instructions: &str, req: &GenerationRequest) -> String {
    let mut body = String::new();
    if !instructions.is_empty() {
        body.push_str(&format!("({})\n\n", instructions));
    }
    if req.source_documents.is_empty() {
        body.push_str("No source documents were provided for this section.");
    } else {
        body.push_str(&format!(
            "Drawn from {} source document(s): {}.",
            req.source_documents.len(),
            req.source_documents
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    format!("# {}\n\n{}", title, body)
}

#[async_trait]
impl GenerationBackend for SimulatedBackend {
    async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse> {
        debug!(
            subsystem = "generation",
            backend = "simulated",
            delay_ms = self.delay.as_millis() as u64,
            "generate: simulating"
        );
        tokio::time::sleep(self.delay).await;

        let mut parts: Vec<String> = Vec::new();
        if let Some(context) = &req.profile_context {
            parts.push(format!("# Context\n\n{}", context));
        }

        if req.template_sections.is_empty() {
            parts.push(render_section("Summary", "", req));
            parts.push(render_section("Observations", "", req));
            parts.push(render_section("Next steps", "", req));
        } else {
            for section in &req.template_sections {
                parts.push(render_section(&section.title, &section.instructions, req));
            }
        }

        Ok(GenerationResponse {
            content: parts.join("\n\n"),
            model: Some("simulated".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
