//! # casebook-db
//!
//! PostgreSQL database layer for casebook.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - The filesystem object-store backend for file blobs
//!
//! ## Example
//!
//! ```rust,ignore
//! use casebook_db::{Database, CreateFolderRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/casebook").await?;
//!
//!     let folder_id = db.folders.create(CreateFolderRequest {
//!         title: "Reports".to_string(),
//!         profile_id,
//!     }).await?;
//!
//!     println!("Created folder: {}", folder_id);
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod files;
pub mod folders;
pub mod notes;
pub mod object_storage;
pub mod pool;
pub mod profiles;
pub mod reports;
pub mod templates;

// Re-export core types
pub use casebook_core::*;

// Re-export repository implementations
pub use audit::PgAuditLogRepository;
pub use files::PgFileRepository;
pub use folders::PgFolderRepository;
pub use notes::PgNoteRepository;
pub use object_storage::{compute_content_hash, FilesystemBackend};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use profiles::PgProfileRepository;
pub use reports::PgReportRepository;
pub use templates::PgTemplateRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Profile repository.
    pub profiles: PgProfileRepository,
    /// Folder repository.
    pub folders: PgFolderRepository,
    /// File row repository (blob bytes live behind an `ObjectStore`).
    pub files: PgFileRepository,
    /// Note repository.
    pub notes: PgNoteRepository,
    /// Template repository.
    pub templates: PgTemplateRepository,
    /// Report repository.
    pub reports: PgReportRepository,
    /// Append-only audit trail repository.
    pub audit: PgAuditLogRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            profiles: PgProfileRepository::new(pool.clone()),
            folders: PgFolderRepository::new(pool.clone()),
            files: PgFileRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            templates: PgTemplateRepository::new(pool.clone()),
            reports: PgReportRepository::new(pool.clone()),
            audit: PgAuditLogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }
}
