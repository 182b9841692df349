//! Audit log repository implementation.
//!
//! The audit trail is append-only: this repository exposes no update or
//! delete. Rows that fail to parse on read surface as errors, never as
//! silently shortened listings.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use casebook_core::{
    new_v7, AuditEntry, AuditLog, AuditLogRepository, Error, ResourceKind, Result,
};

/// PostgreSQL implementation of AuditLogRepository.
pub struct PgAuditLogRepository {
    pool: Pool<Postgres>,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn audit_from_row(row: &sqlx::postgres::PgRow) -> Result<AuditLog> {
    let resource_type: String = row.get("resource_type");
    let kind = ResourceKind::from_db(&resource_type)
        .ok_or_else(|| Error::Internal(format!("unknown audit resource type: {}", resource_type)))?;

    Ok(AuditLog {
        id: row.get("id"),
        actor_id: row.get("actor_id"),
        action: row.get("action"),
        resource_type: kind,
        resource_id: row.get("resource_id"),
        details: row.get("details"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn append(&self, entry: AuditEntry) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        debug!(
            subsystem = "db",
            db_table = "audit_log",
            action = %entry.action,
            resource_type = %entry.resource_type,
            "audit: append"
        );

        sqlx::query(
            r#"INSERT INTO audit_log
               (id, actor_id, action, resource_type, resource_id, details, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(id)
        .bind(entry.actor_id)
        .bind(&entry.action)
        .bind(entry.resource_type.as_str())
        .bind(entry.resource_id)
        .bind(&entry.details)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_for_resource(
        &self,
        resource_type: ResourceKind,
        resource_id: Uuid,
    ) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            r#"SELECT id, actor_id, action, resource_type, resource_id, details, created_at
               FROM audit_log
               WHERE resource_type = $1 AND resource_id = $2
               ORDER BY created_at DESC"#,
        )
        .bind(resource_type.as_str())
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;

        let mut logs = Vec::with_capacity(rows.len());
        for row in &rows {
            logs.push(audit_from_row(row)?);
        }
        Ok(logs)
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            r#"SELECT id, actor_id, action, resource_type, resource_id, details, created_at
               FROM audit_log
               ORDER BY created_at DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut logs = Vec::with_capacity(rows.len());
        for row in &rows {
            logs.push(audit_from_row(row)?);
        }
        Ok(logs)
    }
}
