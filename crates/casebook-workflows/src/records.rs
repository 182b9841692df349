//! Record creation and single-item deletion workflows.
//!
//! Each workflow validates before any store call, performs exactly one
//! primary mutation, and records an audit entry after that mutation
//! succeeds. Audit failures never surface (see [`crate::audit`]).

use tracing::{info, warn};
use uuid::Uuid;

use casebook_core::{
    CreateFolderRequest, CreateNoteRequest, CreateReportRequest, Error, FileRepository,
    FolderRepository, NoteRepository, ObjectStore, ReportRepository, ResourceKind, Result,
    UpdateNoteRequest, UpdateReportRequest,
};

use crate::audit::{actions, AuditRecorder};

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

/// Create a folder for a profile.
pub async fn create_folder(
    folders: &dyn FolderRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    req: CreateFolderRequest,
) -> Result<Uuid> {
    require_title(&req.title)?;

    let profile_id = req.profile_id;
    let id = folders.create(req).await?;

    audit.record(
        actor_id,
        actions::FOLDER_CREATE,
        ResourceKind::Folder,
        id,
        Some(serde_json::json!({ "profile_id": profile_id })),
    );
    Ok(id)
}

/// Rename a folder.
pub async fn rename_folder(
    folders: &dyn FolderRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    folder_id: Uuid,
    title: &str,
) -> Result<()> {
    require_title(title)?;

    folders.rename(folder_id, title).await?;

    audit.record(
        actor_id,
        actions::FOLDER_RENAME,
        ResourceKind::Folder,
        folder_id,
        Some(serde_json::json!({ "title": title })),
    );
    Ok(())
}

/// Create a note.
pub async fn create_note(
    notes: &dyn NoteRepository,
    audit: &AuditRecorder,
    req: CreateNoteRequest,
) -> Result<Uuid> {
    require_title(&req.title)?;

    let actor_id = req.author_id;
    let id = notes.insert(req).await?;

    audit.record(actor_id, actions::NOTE_CREATE, ResourceKind::Note, id, None);

    info!(
        subsystem = "workflows",
        op = "create_note",
        note_id = %id,
        "note created"
    );
    Ok(id)
}

/// Update a note's title, content, or confidentiality.
pub async fn update_note(
    notes: &dyn NoteRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    note_id: Uuid,
    req: UpdateNoteRequest,
) -> Result<()> {
    if let Some(title) = &req.title {
        require_title(title)?;
    }

    notes.update(note_id, req).await?;

    audit.record(
        actor_id,
        actions::NOTE_UPDATE,
        ResourceKind::Note,
        note_id,
        None,
    );
    Ok(())
}

/// Delete a note.
pub async fn delete_note(
    notes: &dyn NoteRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    note_id: Uuid,
) -> Result<()> {
    notes.delete(note_id).await?;

    audit.record(
        actor_id,
        actions::NOTE_DELETE,
        ResourceKind::Note,
        note_id,
        None,
    );
    Ok(())
}

/// Create a report.
pub async fn create_report(
    reports: &dyn ReportRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    req: CreateReportRequest,
) -> Result<Uuid> {
    require_title(&req.title)?;
    if req.period_end < req.period_start {
        return Err(Error::InvalidInput(
            "reporting period ends before it starts".to_string(),
        ));
    }

    let report_type = req.report_type;
    let id = reports.insert(req).await?;

    audit.record(
        actor_id,
        actions::REPORT_CREATE,
        ResourceKind::Report,
        id,
        Some(serde_json::json!({ "report_type": report_type.as_str() })),
    );
    Ok(id)
}

/// Update a report's title, sections, metadata, or confidentiality.
pub async fn update_report(
    reports: &dyn ReportRepository,
    audit: &AuditRecorder,
    actor_id: Uuid,
    report_id: Uuid,
    req: UpdateReportRequest,
) -> Result<()> {
    if let Some(title) = &req.title {
        require_title(title)?;
    }

    reports.update(report_id, req).await?;

    audit.record(
        actor_id,
        actions::REPORT_UPDATE,
        ResourceKind::Report,
        report_id,
        None,
    );
    Ok(())
}

/// Fetch a file's bytes, whichever way the row stores them.
///
/// Returns `(data, content_type, name)`; rows with an object-store key are
/// read from storage, inline rows come straight from the row.
pub async fn download_file(
    files: &dyn FileRepository,
    storage: &dyn ObjectStore,
    file_id: Uuid,
) -> Result<(Vec<u8>, String, String)> {
    let record = files.get(file_id).await?;

    let data = match (&record.storage_path, &record.inline_content) {
        (Some(path), _) => storage.read(path).await?,
        (None, Some(inline)) => inline.clone().into_bytes(),
        (None, None) => {
            return Err(Error::Internal(format!(
                "file {} has neither storage path nor inline content",
                record.id
            )))
        }
    };

    Ok((data, record.content_type, record.name))
}

/// Delete a single file: blob first (best-effort), then the row.
///
/// Same blob policy as the folder cascade: a stuck blob never traps the
/// row.
pub async fn delete_file(
    files: &dyn FileRepository,
    storage: &dyn ObjectStore,
    audit: &AuditRecorder,
    actor_id: Uuid,
    file_id: Uuid,
) -> Result<()> {
    let record = files.get(file_id).await?;

    if let Some(path) = &record.storage_path {
        if let Err(e) = storage.remove(path).await {
            warn!(
                subsystem = "workflows",
                op = "delete_file",
                file_id = %file_id,
                storage_path = %path,
                error = %e,
                "blob removal failed; continuing with row deletion"
            );
        }
    }

    files.delete(file_id).await?;

    audit.record(
        actor_id,
        actions::FILE_DELETE,
        ResourceKind::File,
        file_id,
        Some(serde_json::json!({ "folder_id": record.folder_id })),
    );
    Ok(())
}
