//! # casebook-core
//!
//! Core types, traits, and abstractions shared by every casebook crate:
//!
//! - Domain models (profiles, folders, files, notes, templates, reports,
//!   audit trail)
//! - Error taxonomy and `Result` alias
//! - Repository and backend traits (the injection seams for the database,
//!   object storage, and the generation endpoint)
//! - Structured logging field constants
//! - Centralized defaults
//! - UUIDv7 helpers and best-effort section parsing

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod sections;
pub mod traits;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::*;
pub use sections::{parse_sections, render_sections};
pub use traits::*;
pub use uuid_utils::new_v7;
