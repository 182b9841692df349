//! File upload with inline fallback.
//!
//! Bytes go to the object store under a timestamp-prefixed key. When the
//! store rejects the write, small or text-typed payloads fall back to
//! inline storage in the file row; everything else fails visibly with the
//! original storage error.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use casebook_core::defaults::INLINE_FALLBACK_MAX_BYTES;
use casebook_core::{
    Confidentiality, CreateFileRecord, FileRecord, FileRepository, ObjectStore, ResourceKind,
    Result,
};
use casebook_db::compute_content_hash;

use crate::audit::{actions, AuditRecorder};

/// An upload handed over from a UI submit.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub folder_id: Uuid,
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub confidentiality: Confidentiality,
    pub actor_id: Uuid,
}

/// Replace anything outside `[A-Za-z0-9._-]` in a file name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Object-store key: `{folder_id}/{unix_millis}_{sanitized_name}`.
///
/// The millisecond prefix is the only collision avoidance; two uploads of
/// the same name in the same millisecond collide. Known edge, tolerated.
pub fn storage_key(folder_id: Uuid, unix_millis: i64, name: &str) -> String {
    format!("{}/{}_{}", folder_id, unix_millis, sanitize_file_name(name))
}

/// Whether a failed storage write may fall back to inline row storage:
/// declared type mentions "text", or the payload is small.
pub fn fallback_eligible(content_type: &str, size: usize) -> bool {
    content_type.contains("text") || size < INLINE_FALLBACK_MAX_BYTES
}

/// Store a file's bytes and insert its row.
///
/// On storage success the row references the blob (`storage_path`). On
/// storage failure, fallback-eligible payloads are decoded as UTF-8 and
/// stored inline (`inline_content`); if the payload is not eligible, or
/// the decode fails, the original storage error is returned and no row is
/// inserted.
pub async fn upload_file(
    files: &dyn FileRepository,
    storage: &dyn ObjectStore,
    audit: &AuditRecorder,
    req: UploadRequest,
) -> Result<FileRecord> {
    let key = storage_key(req.folder_id, Utc::now().timestamp_millis(), &req.name);
    let size_bytes = req.data.len() as i64;
    let content_hash = compute_content_hash(&req.data);

    debug!(
        subsystem = "workflows",
        op = "upload_file",
        folder_id = %req.folder_id,
        storage_path = %key,
        size_bytes,
        "upload: storing blob"
    );

    let record = match storage.write(&key, &req.data).await {
        Ok(()) => {
            files
                .insert(CreateFileRecord {
                    name: req.name,
                    folder_id: req.folder_id,
                    content_type: req.content_type,
                    size_bytes,
                    storage_path: Some(key),
                    inline_content: None,
                    content_hash: Some(content_hash),
                    confidentiality: req.confidentiality,
                })
                .await?
        }
        Err(storage_err) => {
            if !fallback_eligible(&req.content_type, req.data.len()) {
                return Err(storage_err);
            }
            let text = match String::from_utf8(req.data) {
                Ok(text) => text,
                // Not valid UTF-8; the inline fallback does not apply.
                Err(_) => return Err(storage_err),
            };

            warn!(
                subsystem = "workflows",
                op = "upload_file",
                folder_id = %req.folder_id,
                size_bytes,
                error = %storage_err,
                "storage write failed; storing content inline"
            );

            files
                .insert(CreateFileRecord {
                    name: req.name,
                    folder_id: req.folder_id,
                    content_type: req.content_type,
                    size_bytes,
                    storage_path: None,
                    inline_content: Some(text),
                    content_hash: Some(content_hash),
                    confidentiality: req.confidentiality,
                })
                .await?
        }
    };

    audit.record(
        req.actor_id,
        actions::FILE_UPLOAD,
        ResourceKind::File,
        record.id,
        Some(serde_json::json!({
            "folder_id": record.folder_id,
            "size_bytes": record.size_bytes,
            "inline": record.is_inline(),
        })),
    );

    info!(
        subsystem = "workflows",
        op = "upload_file",
        file_id = %record.id,
        folder_id = %record.folder_id,
        inline = record.is_inline(),
        "file stored"
    );

    Ok(record)
}
