//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use casebook_core::defaults::SNIPPET_LEN;
use casebook_core::{
    new_v7, Confidentiality, CreateNoteRequest, Error, ListNotesRequest, ListNotesResponse, Note,
    NoteRepository, NoteSummary, Result, UpdateNoteRequest,
};

use crate::escape_like;

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build the order clause based on sort_by and sort_order.
fn validate_sort_order(sort_order: &str) -> &'static str {
    match sort_order.to_uppercase().as_str() {
        "ASC" => "ASC",
        _ => "DESC",
    }
}

fn build_order_clause(sort_by: &str, sort_order: &str) -> String {
    let validated = validate_sort_order(sort_order);
    match sort_by {
        "updated_at" => format!("n.updated_at {}", validated),
        _ => format!("n.created_at {}", validated),
    }
}

/// Map a database row to a NoteSummary.
fn map_row_to_note_summary(row: &sqlx::postgres::PgRow) -> NoteSummary {
    let content: String = row.get("content");
    let confidentiality: String = row.get("confidentiality");

    let snippet = content
        .lines()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(SNIPPET_LEN)
        .collect();

    NoteSummary {
        id: row.get("id"),
        title: row.get("title"),
        snippet,
        confidentiality: Confidentiality::from_db(&confidentiality),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO note (id, author_id, title, content, confidentiality, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(id)
        .bind(req.author_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.confidentiality.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let row = sqlx::query(
            r#"SELECT id, author_id, title, content, confidentiality, created_at, updated_at
               FROM note WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NoteNotFound(id))?;

        let confidentiality: String = row.get("confidentiality");
        Ok(Note {
            id: row.get("id"),
            author_id: row.get("author_id"),
            title: row.get("title"),
            content: row.get("content"),
            confidentiality: Confidentiality::from_db(&confidentiality),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let limit = req.limit.unwrap_or(casebook_core::defaults::PAGE_LIMIT);
        let offset = req.offset.unwrap_or(casebook_core::defaults::PAGE_OFFSET);
        let order = build_order_clause(
            req.sort_by.as_deref().unwrap_or("created_at"),
            req.sort_order.as_deref().unwrap_or("desc"),
        );

        let (rows, total) = if let Some(search) = &req.search {
            let pattern = format!("%{}%", escape_like(search));

            let rows = sqlx::query(&format!(
                r#"SELECT n.id, n.title, n.content, n.confidentiality, n.created_at, n.updated_at
                   FROM note n
                   WHERE (n.title ILIKE $1 ESCAPE '\' OR n.content ILIKE $1 ESCAPE '\')
                   ORDER BY {}
                   LIMIT $2 OFFSET $3"#,
                order
            ))
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                r#"SELECT COUNT(*) FROM note n
                   WHERE (n.title ILIKE $1 ESCAPE '\' OR n.content ILIKE $1 ESCAPE '\')"#,
            )
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

            (rows, total)
        } else {
            let rows = sqlx::query(&format!(
                r#"SELECT n.id, n.title, n.content, n.confidentiality, n.created_at, n.updated_at
                   FROM note n
                   ORDER BY {}
                   LIMIT $1 OFFSET $2"#,
                order
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM note")
                .fetch_one(&self.pool)
                .await?;

            (rows, total)
        };

        Ok(ListNotesResponse {
            notes: rows.iter().map(map_row_to_note_summary).collect(),
            total,
        })
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"UPDATE note SET
                 title = COALESCE($1, title),
                 content = COALESCE($2, content),
                 confidentiality = COALESCE($3, confidentiality),
                 updated_at = $4
               WHERE id = $5"#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.confidentiality.map(|c| c.as_str()))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }
}
