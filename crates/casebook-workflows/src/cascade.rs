//! Cascade folder deletion.
//!
//! Deleting a folder removes its storage blobs, then its file rows, then
//! the folder row, strictly in that order. Blob removal failure is
//! non-fatal: orphaned blobs are preferred over a folder the user cannot
//! delete. Row deletions are fatal on failure and run child-first, so a
//! failure never leaves file rows pointing at a missing folder.

use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use casebook_core::{FileRepository, FolderRepository, ObjectStore, ResourceKind, Result};

use crate::audit::{actions, AuditRecorder};

/// Delete a folder and everything in it.
///
/// Step order and error semantics:
/// 1. list child file rows (abort on error, nothing mutated yet);
/// 2. remove their storage blobs (WARN and continue on failure);
/// 3. bulk-delete the file rows (abort on error, folder row untouched);
/// 4. delete the folder row (on error the folder remains, now empty;
///    callers treat that as a recoverable inconsistency, not a
///    retry-from-scratch);
/// 5. record a `folder.delete` audit entry.
///
/// Cache invalidation and clearing a selected-folder state belong to the
/// caller.
pub async fn delete_folder(
    folders: &dyn FolderRepository,
    files: &dyn FileRepository,
    storage: &dyn ObjectStore,
    audit: &AuditRecorder,
    actor_id: Uuid,
    folder_id: Uuid,
) -> Result<Uuid> {
    let start = Instant::now();

    let children = files.list_by_folder(folder_id).await?;

    let blob_paths: Vec<String> = children
        .iter()
        .filter_map(|f| f.storage_path.clone())
        .filter(|p| !p.is_empty())
        .collect();

    if !blob_paths.is_empty() {
        if let Err(e) = storage.remove_batch(&blob_paths).await {
            warn!(
                subsystem = "workflows",
                op = "delete_folder",
                folder_id = %folder_id,
                result_count = blob_paths.len(),
                error = %e,
                "blob removal failed; continuing with row deletion"
            );
        }
    }

    let rows_removed = files.delete_by_folder(folder_id).await?;

    folders.delete(folder_id).await?;

    audit.record(
        actor_id,
        actions::FOLDER_DELETE,
        ResourceKind::Folder,
        folder_id,
        Some(serde_json::json!({
            "file_rows_removed": rows_removed,
            "blobs_targeted": blob_paths.len(),
        })),
    );

    info!(
        subsystem = "workflows",
        op = "delete_folder",
        folder_id = %folder_id,
        result_count = rows_removed,
        duration_ms = start.elapsed().as_millis() as u64,
        "folder deleted"
    );

    Ok(folder_id)
}
