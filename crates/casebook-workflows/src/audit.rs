//! Fire-and-forget audit trail recording.
//!
//! Every mutating workflow records what happened *after* the primary
//! mutation succeeds. The write runs on a detached task and its error
//! channel is disconnected from the workflow's result: a failed append is
//! logged and dropped, never retried, and never fails the primary action.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use casebook_core::{AuditEntry, AuditLogRepository, ResourceKind};

/// Audit action names, `{resource}.{verb}`.
pub mod actions {
    pub const FOLDER_CREATE: &str = "folder.create";
    pub const FOLDER_RENAME: &str = "folder.rename";
    pub const FOLDER_DELETE: &str = "folder.delete";
    pub const FILE_UPLOAD: &str = "file.upload";
    pub const FILE_DELETE: &str = "file.delete";
    pub const NOTE_CREATE: &str = "note.create";
    pub const NOTE_UPDATE: &str = "note.update";
    pub const NOTE_DELETE: &str = "note.delete";
    pub const REPORT_CREATE: &str = "report.create";
    pub const REPORT_UPDATE: &str = "report.update";
}

/// Dispatches audit entries on detached tasks.
///
/// Workflows drop the returned handle; tests may await it to observe the
/// append settling.
#[derive(Clone)]
pub struct AuditRecorder {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditRecorder {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    /// Record one entry. Returns immediately; the append happens on a
    /// detached task and any failure is swallowed after a WARN log.
    pub fn record(
        &self,
        actor_id: Uuid,
        action: &str,
        resource_type: ResourceKind,
        resource_id: Uuid,
        details: Option<JsonValue>,
    ) -> JoinHandle<()> {
        let repo = self.repo.clone();
        let entry = AuditEntry {
            actor_id,
            action: action.to_string(),
            resource_type,
            resource_id,
            details,
        };

        tokio::spawn(async move {
            if let Err(e) = repo.append(entry.clone()).await {
                warn!(
                    subsystem = "workflows",
                    action = %entry.action,
                    resource_type = %entry.resource_type,
                    resource_id = %entry.resource_id,
                    error = %e,
                    "audit entry dropped"
                );
            }
        })
    }
}
