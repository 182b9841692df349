//! Folder repository implementation.
//!
//! `delete` removes the folder row only. The cascade (child files first,
//! blobs before rows) is sequenced by the deletion workflow, which calls
//! into [`crate::files`] and the object store in its documented order.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use casebook_core::{
    new_v7, CreateFolderRequest, Error, Folder, FolderRepository, FolderSummary, Result,
};

/// PostgreSQL implementation of FolderRepository.
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn create(&self, req: CreateFolderRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO folder (id, title, profile_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&req.title)
        .bind(req.profile_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        let row = sqlx::query(
            "SELECT id, title, profile_id, created_at, updated_at FROM folder WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Folder {
            id: r.get("id"),
            title: r.get("title"),
            profile_id: r.get("profile_id"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn rename(&self, id: Uuid, title: &str) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query("UPDATE folder SET title = $1, updated_at = $2 WHERE id = $3")
            .bind(title)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::FolderNotFound(id));
        }
        Ok(())
    }

    async fn list_for_profile(&self, profile_id: Uuid) -> Result<Vec<FolderSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.title, f.profile_id, f.created_at, f.updated_at,
                   COALESCE((SELECT COUNT(*) FROM file WHERE folder_id = f.id), 0) as file_count
            FROM folder f
            WHERE f.profile_id = $1
            ORDER BY f.title
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| FolderSummary {
                id: r.get("id"),
                title: r.get("title"),
                profile_id: r.get("profile_id"),
                file_count: r.get("file_count"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM folder WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::FolderNotFound(id));
        }
        Ok(())
    }
}
