//! Core traits for casebook abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy. Workflows receive them as injected dependencies, so tests can
//! substitute in-memory fakes without any global client state.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PROFILE REPOSITORY
// =============================================================================

/// Request for creating a profile.
#[derive(Debug, Clone)]
pub struct CreateProfileRequest {
    pub display_name: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Repository for young-person profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, req: CreateProfileRequest) -> Result<Uuid>;

    async fn get(&self, id: Uuid) -> Result<Option<Profile>>;

    async fn list(&self) -> Result<Vec<Profile>>;
}

// =============================================================================
// FOLDER REPOSITORY
// =============================================================================

/// Request for creating a folder.
#[derive(Debug, Clone)]
pub struct CreateFolderRequest {
    pub title: String,
    pub profile_id: Uuid,
}

/// Repository for folder rows.
///
/// `delete` removes the folder row only. Cascading to child files and
/// storage blobs is the deletion workflow's job, in its documented order.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    async fn create(&self, req: CreateFolderRequest) -> Result<Uuid>;

    async fn get(&self, id: Uuid) -> Result<Option<Folder>>;

    async fn rename(&self, id: Uuid, title: &str) -> Result<()>;

    /// List a profile's folders with file counts.
    async fn list_for_profile(&self, profile_id: Uuid) -> Result<Vec<FolderSummary>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// FILE REPOSITORY
// =============================================================================

/// Row to insert for a stored file. Exactly one of `storage_path` /
/// `inline_content` must be set; the upload workflow guarantees this.
#[derive(Debug, Clone)]
pub struct CreateFileRecord {
    pub name: String,
    pub folder_id: Uuid,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_path: Option<String>,
    pub inline_content: Option<String>,
    pub content_hash: Option<String>,
    pub confidentiality: Confidentiality,
}

/// Repository for file rows.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert(&self, rec: CreateFileRecord) -> Result<FileRecord>;

    /// Fetch a file row. Returns `Error::FileNotFound` when absent.
    async fn get(&self, id: Uuid) -> Result<FileRecord>;

    async fn list_by_folder(&self, folder_id: Uuid) -> Result<Vec<FileRecord>>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Bulk-delete all file rows in a folder. Returns the number removed.
    async fn delete_by_folder(&self, folder_id: Uuid) -> Result<u64>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Request for creating a note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub confidentiality: Confidentiality,
}

/// Partial update for a note. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub confidentiality: Option<Confidentiality>,
}

/// Request for listing notes.
#[derive(Debug, Clone, Default)]
pub struct ListNotesRequest {
    /// Field to sort by: "created_at", "updated_at"
    pub sort_by: Option<String>,
    /// Sort order: "asc" or "desc"
    pub sort_order: Option<String>,
    /// Case-insensitive title/content substring filter.
    pub search: Option<String>,
    /// Maximum results
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

/// Response for listing notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotesResponse {
    pub notes: Vec<NoteSummary>,
    pub total: i64,
}

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid>;

    /// Fetch a full note by ID. Returns `Error::NoteNotFound` when absent.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse>;

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// TEMPLATE REPOSITORY
// =============================================================================

/// One section of a template being created.
#[derive(Debug, Clone)]
pub struct CreateTemplateSection {
    pub title: String,
    pub order_index: i32,
    pub instructions: String,
}

/// Request for creating a template with its sections.
#[derive(Debug, Clone)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub author_id: Uuid,
    pub sections: Vec<CreateTemplateSection>,
}

/// Partial update for a template's header fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Repository for templates and their sections.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Create a template and its sections in one transaction.
    async fn create(&self, req: CreateTemplateRequest) -> Result<Uuid>;

    /// Fetch a template with sections ordered by `order_index`.
    async fn get(&self, id: Uuid) -> Result<Option<TemplateFull>>;

    async fn list(&self) -> Result<Vec<Template>>;

    async fn update(&self, id: Uuid, req: UpdateTemplateRequest) -> Result<()>;

    /// Delete a template and its sections in one transaction.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// REPORT REPOSITORY
// =============================================================================

/// Request for creating a report.
#[derive(Debug, Clone)]
pub struct CreateReportRequest {
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub sections: Vec<ReportSection>,
    pub metadata: JsonValue,
    pub confidentiality: Confidentiality,
}

/// Partial update for a report.
#[derive(Debug, Clone, Default)]
pub struct UpdateReportRequest {
    pub title: Option<String>,
    pub sections: Option<Vec<ReportSection>>,
    pub metadata: Option<JsonValue>,
    pub confidentiality: Option<Confidentiality>,
}

/// Repository for report CRUD operations.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, req: CreateReportRequest) -> Result<Uuid>;

    async fn fetch(&self, id: Uuid) -> Result<Report>;

    async fn update(&self, id: Uuid, req: UpdateReportRequest) -> Result<()>;

    async fn list_by_type(
        &self,
        report_type: ReportType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReportSummary>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// AUDIT LOG REPOSITORY
// =============================================================================

/// One audit trail entry to append.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor_id: Uuid,
    pub action: String,
    pub resource_type: ResourceKind,
    pub resource_id: Uuid,
    pub details: Option<JsonValue>,
}

/// Append-only repository for the audit trail.
///
/// There are deliberately no update or delete methods.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<Uuid>;

    async fn list_for_resource(
        &self,
        resource_type: ResourceKind,
        resource_id: Uuid,
    ) -> Result<Vec<AuditLog>>;

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<AuditLog>>;
}

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Object storage backend for file blobs.
///
/// Allows abstracting over filesystem, S3, or other storage providers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write data at the specified path.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path.
    async fn remove(&self, path: &str) -> Result<()>;

    /// Bulk-delete. Fails if any path could not be removed; callers decide
    /// whether that failure is fatal.
    async fn remove_batch(&self, paths: &[String]) -> Result<()>;

    /// Check if data exists at the specified path.
    async fn exists(&self, path: &str) -> Result<bool>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// One template section forwarded to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    pub instructions: String,
}

/// One source document forwarded to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub name: String,
    pub content: String,
}

/// Payload sent to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub template_sections: Vec<SectionSpec>,
    pub source_documents: Vec<SourceDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_context: Option<String>,
}

/// Flat generated text returned by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Backend that turns a [`GenerationRequest`] into draft text.
///
/// Implementations: HTTP endpoint client, local simulation, test mock.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;
}
