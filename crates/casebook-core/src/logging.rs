//! Structured logging field name constants for casebook.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied, side effect dropped |
//! | INFO  | Lifecycle events, workflow completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "db", "storage", "generation", "workflows"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "delete_folder", "upload_file", "generate"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Profile UUID being operated on.
pub const PROFILE_ID: &str = "profile_id";

/// Folder UUID being operated on.
pub const FOLDER_ID: &str = "folder_id";

/// File UUID being operated on.
pub const FILE_ID: &str = "file_id";

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Report UUID being operated on.
pub const REPORT_ID: &str = "report_id";

/// Template UUID being operated on.
pub const TEMPLATE_ID: &str = "template_id";

/// Audit action name, e.g. "folder.delete".
pub const ACTION: &str = "action";

/// Audit resource type, e.g. "folder".
pub const RESOURCE_TYPE: &str = "resource_type";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows/items affected.
pub const RESULT_COUNT: &str = "result_count";

/// Payload size in bytes.
pub const SIZE_BYTES: &str = "size_bytes";

// ─── Storage fields ────────────────────────────────────────────────────────

/// Object-store key.
pub const STORAGE_PATH: &str = "storage_path";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

// ─── Generation fields ─────────────────────────────────────────────────────

/// Backend name used for generation ("http", "simulated", "mock").
pub const BACKEND: &str = "backend";

/// Model name reported by the generation endpoint.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
