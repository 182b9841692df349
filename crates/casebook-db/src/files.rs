//! File repository implementation.
//!
//! File rows hold either an object-store key (`storage_path`) or inline
//! UTF-8 text (`inline_content`), never neither. The upload workflow decides
//! which; this repository just persists what it is given.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use casebook_core::{
    new_v7, Confidentiality, CreateFileRecord, Error, FileRecord, FileRepository, Result,
};

/// PostgreSQL implementation of FileRepository.
pub struct PgFileRepository {
    pool: Pool<Postgres>,
}

impl PgFileRepository {
    /// Create a new PgFileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn file_from_row(row: &sqlx::postgres::PgRow) -> FileRecord {
    let confidentiality: String = row.get("confidentiality");
    FileRecord {
        id: row.get("id"),
        name: row.get("name"),
        folder_id: row.get("folder_id"),
        content_type: row.get("content_type"),
        size_bytes: row.get("size_bytes"),
        storage_path: row.get("storage_path"),
        inline_content: row.get("inline_content"),
        content_hash: row.get("content_hash"),
        confidentiality: Confidentiality::from_db(&confidentiality),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, rec: CreateFileRecord) -> Result<FileRecord> {
        let id = new_v7();
        let now = Utc::now();

        debug!(
            subsystem = "db",
            db_table = "file",
            file_id = %id,
            folder_id = %rec.folder_id,
            size_bytes = rec.size_bytes,
            inline = rec.storage_path.is_none(),
            "file: insert"
        );

        sqlx::query(
            r#"INSERT INTO file
               (id, name, folder_id, content_type, size_bytes, storage_path,
                inline_content, content_hash, confidentiality, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(id)
        .bind(&rec.name)
        .bind(rec.folder_id)
        .bind(&rec.content_type)
        .bind(rec.size_bytes)
        .bind(&rec.storage_path)
        .bind(&rec.inline_content)
        .bind(&rec.content_hash)
        .bind(rec.confidentiality.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(FileRecord {
            id,
            name: rec.name,
            folder_id: rec.folder_id,
            content_type: rec.content_type,
            size_bytes: rec.size_bytes,
            storage_path: rec.storage_path,
            inline_content: rec.inline_content,
            content_hash: rec.content_hash,
            confidentiality: rec.confidentiality,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> Result<FileRecord> {
        let row = sqlx::query(
            r#"SELECT id, name, folder_id, content_type, size_bytes, storage_path,
                      inline_content, content_hash, confidentiality, created_at, updated_at
               FROM file WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::FileNotFound(id))?;

        Ok(file_from_row(&row))
    }

    async fn list_by_folder(&self, folder_id: Uuid) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query(
            r#"SELECT id, name, folder_id, content_type, size_bytes, storage_path,
                      inline_content, content_hash, confidentiality, created_at, updated_at
               FROM file WHERE folder_id = $1
               ORDER BY created_at"#,
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(file_from_row).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM file WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::FileNotFound(id));
        }
        Ok(())
    }

    async fn delete_by_folder(&self, folder_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM file WHERE folder_id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await?;

        debug!(
            subsystem = "db",
            db_table = "file",
            folder_id = %folder_id,
            result_count = result.rows_affected(),
            "file: bulk delete for folder"
        );
        Ok(result.rows_affected())
    }
}
