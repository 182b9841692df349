//! # casebook-generation
//!
//! Generation backend abstraction for casebook.
//!
//! This crate provides:
//! - [`HttpGenerationBackend`]: client for an external generation endpoint
//! - [`SimulatedBackend`]: fixed-delay, canned-section local stand-in
//! - [`MockGenerationBackend`]: deterministic test double with a call log
//! - [`GenerationConfig`]: TOML + environment configuration and backend
//!   selection
//!
//! The [`casebook_core::GenerationBackend`] trait is the seam; workflows
//! never know which backend they are talking to.

pub mod config;
pub mod http;
pub mod mock;
pub mod simulate;

pub use config::{BackendKind, ConfigError, ConfigResult, GenerationConfig};
pub use http::HttpGenerationBackend;
pub use mock::MockGenerationBackend;
pub use simulate::SimulatedBackend;

use casebook_core::{GenerationBackend, Result};

/// Build the configured backend.
pub fn backend_from_config(config: &GenerationConfig) -> Result<Box<dyn GenerationBackend>> {
    match config.backend {
        BackendKind::Http => Ok(Box::new(HttpGenerationBackend::new(&config.http)?)),
        BackendKind::Simulated => Ok(Box::new(SimulatedBackend::new(
            std::time::Duration::from_millis(config.simulated.delay_ms),
        ))),
    }
}
