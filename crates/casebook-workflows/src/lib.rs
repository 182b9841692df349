//! # casebook-workflows
//!
//! Orchestration layer for casebook. These are the functions UI event
//! handlers call: each one sequences its store operations, applies the
//! documented error policy at every step, and records an audit entry
//! after the primary mutation succeeds.
//!
//! Workflows receive their repositories, object store, and generation
//! backend as trait objects, so tests run them against in-memory fakes.
//!
//! - [`cascade::delete_folder`]: blobs → file rows → folder row, in order
//! - [`upload::upload_file`]: object storage with small/text inline fallback
//! - [`audit::AuditRecorder`]: fire-and-forget audit trail appends
//! - [`records`]: create/update/delete with validation and audit
//! - [`generation::GenerationSession`]: the selection → generating →
//!   editing → saved/discarded state machine

pub mod audit;
pub mod cascade;
pub mod generation;
pub mod records;
pub mod upload;

pub use audit::{actions, AuditRecorder};
pub use cascade::delete_folder;
pub use generation::{Draft, GenerationSession, SelectionPolicy, SessionState};
pub use records::{
    create_folder, create_note, create_report, delete_file, delete_note, download_file,
    rename_folder, update_note, update_report,
};
pub use upload::{fallback_eligible, storage_key, upload_file, UploadRequest};
