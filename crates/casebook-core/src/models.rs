//! Core data models for casebook.
//!
//! These types are shared across all casebook crates and represent the
//! domain entities: young-person profiles, document folders and files,
//! notes, report templates, generated reports, and the audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// CONFIDENTIALITY
// =============================================================================

/// Confidentiality classification applied to files, notes, and reports.
///
/// Stored as TEXT in the database; unknown stored values read back as
/// `Restricted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Confidentiality {
    #[default]
    Internal,
    Sensitive,
    Restricted,
}

impl Confidentiality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Sensitive => "sensitive",
            Self::Restricted => "restricted",
        }
    }

    /// Parse a stored TEXT value; unknown values map to `Restricted`.
    pub fn from_db(s: &str) -> Self {
        match s {
            "internal" => Self::Internal,
            "sensitive" => Self::Sensitive,
            "restricted" => Self::Restricted,
            _ => Self::Restricted,
        }
    }
}

impl std::fmt::Display for Confidentiality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// A young person's case profile. Folders are scoped to exactly one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// FOLDER / FILE
// =============================================================================

/// A named container of files, owned by one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub title: String,
    pub profile_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Folder listing row with an aggregate file count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    pub id: Uuid,
    pub title: String,
    pub profile_id: Uuid,
    pub file_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored document.
///
/// Exactly one of `storage_path` (object-store key) or `inline_content`
/// (UTF-8 text stored in the row) is populated. The upload workflow enforces
/// this; the schema does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_path: Option<String>,
    pub inline_content: Option<String>,
    /// BLAKE3 hash of the original bytes, `blake3:{hex}`.
    pub content_hash: Option<String>,
    pub confidentiality: Confidentiality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// True when the row holds inline text instead of an object-store key.
    pub fn is_inline(&self) -> bool {
        self.storage_path.is_none()
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// An authored or generated synthesis document, independent of folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub confidentiality: Confidentiality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary view of a note for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub snippet: String,
    pub confidentiality: Confidentiality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// TEMPLATE
// =============================================================================

/// A report/note template. Sections define the structure the generation
/// workflow fills in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ordered section of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSection {
    pub id: Uuid,
    pub template_id: Uuid,
    pub title: String,
    pub order_index: i32,
    pub instructions: String,
}

/// A template with its sections, ordered by `order_index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFull {
    pub template: Template,
    pub sections: Vec<TemplateSection>,
}

// =============================================================================
// REPORT
// =============================================================================

/// Report category. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Activity,
    Standardized,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Standardized => "standardized",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "standardized" => Self::Standardized,
            _ => Self::Activity,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One section of a report body. Persisted inside the report's JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ReportSection {
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            kind: "text".to_string(),
        }
    }
}

/// A generated or authored report covering a reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub sections: Vec<ReportSection>,
    pub metadata: JsonValue,
    pub confidentiality: Confidentiality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary view of a report for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: Uuid,
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// AUDIT
// =============================================================================

/// Resource categories the audit trail distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Profile,
    Folder,
    File,
    Note,
    Template,
    Report,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Folder => "folder",
            Self::File => "file",
            Self::Note => "note",
            Self::Template => "template",
            Self::Report => "report",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(Self::Profile),
            "folder" => Some(Self::Folder),
            "file" => Some(Self::File),
            "note" => Some(Self::Note),
            "template" => Some(Self::Template),
            "report" => Some(Self::Report),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only audit trail row: who did what to which resource.
///
/// The application never updates or deletes these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub resource_type: ResourceKind,
    pub resource_id: Uuid,
    pub details: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}
