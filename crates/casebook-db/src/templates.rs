//! Template repository implementation.
//!
//! Templates and their sections are written and removed together in one
//! transaction so a template is never observable without its structure.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use casebook_core::{
    new_v7, CreateTemplateRequest, Error, Result, Template, TemplateFull, TemplateRepository,
    TemplateSection, UpdateTemplateRequest,
};

/// PostgreSQL implementation of TemplateRepository.
pub struct PgTemplateRepository {
    pool: Pool<Postgres>,
}

impl PgTemplateRepository {
    /// Create a new PgTemplateRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn template_from_row(row: &sqlx::postgres::PgRow) -> Template {
    Template {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn create(&self, req: CreateTemplateRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            r#"INSERT INTO template (id, name, description, author_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.author_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        for section in &req.sections {
            sqlx::query(
                r#"INSERT INTO template_section (id, template_id, title, order_index, instructions)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(new_v7())
            .bind(id)
            .bind(&section.title)
            .bind(section.order_index)
            .bind(&section.instructions)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<TemplateFull>> {
        let row = sqlx::query(
            r#"SELECT id, name, description, author_id, created_at, updated_at
               FROM template WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let template = template_from_row(&row);

        let section_rows = sqlx::query(
            r#"SELECT id, template_id, title, order_index, instructions
               FROM template_section
               WHERE template_id = $1
               ORDER BY order_index"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let sections = section_rows
            .into_iter()
            .map(|r| TemplateSection {
                id: r.get("id"),
                template_id: r.get("template_id"),
                title: r.get("title"),
                order_index: r.get("order_index"),
                instructions: r.get("instructions"),
            })
            .collect();

        Ok(Some(TemplateFull { template, sections }))
    }

    async fn list(&self) -> Result<Vec<Template>> {
        let rows = sqlx::query(
            r#"SELECT id, name, description, author_id, created_at, updated_at
               FROM template ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(template_from_row).collect())
    }

    async fn update(&self, id: Uuid, req: UpdateTemplateRequest) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"UPDATE template SET
                 name = COALESCE($1, name),
                 description = COALESCE($2, description),
                 updated_at = $3
               WHERE id = $4"#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Template {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM template_section WHERE template_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM template WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Template {} not found", id)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
