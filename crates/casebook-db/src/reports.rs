//! Report repository implementation.
//!
//! Report sections are persisted as a JSONB array so the section list stays
//! a projection of the flat content the editor works on.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use casebook_core::{
    new_v7, Confidentiality, CreateReportRequest, Error, Report, ReportRepository, ReportSection,
    ReportSummary, ReportType, Result, UpdateReportRequest,
};

/// PostgreSQL implementation of ReportRepository.
pub struct PgReportRepository {
    pool: Pool<Postgres>,
}

impl PgReportRepository {
    /// Create a new PgReportRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn report_from_row(row: &sqlx::postgres::PgRow) -> Result<Report> {
    let report_type: String = row.get("report_type");
    let confidentiality: String = row.get("confidentiality");
    let sections_json: JsonValue = row.get("sections");
    let sections: Vec<ReportSection> = serde_json::from_value(sections_json)?;

    Ok(Report {
        id: row.get("id"),
        title: row.get("title"),
        report_type: ReportType::from_db(&report_type),
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        sections,
        metadata: row.get("metadata"),
        confidentiality: Confidentiality::from_db(&confidentiality),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, req: CreateReportRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        let sections = serde_json::to_value(&req.sections)?;

        sqlx::query(
            r#"INSERT INTO report
               (id, title, report_type, period_start, period_end, sections, metadata,
                confidentiality, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(req.report_type.as_str())
        .bind(req.period_start)
        .bind(req.period_end)
        .bind(sections)
        .bind(&req.metadata)
        .bind(req.confidentiality.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Report> {
        let row = sqlx::query(
            r#"SELECT id, title, report_type, period_start, period_end, sections, metadata,
                      confidentiality, created_at, updated_at
               FROM report WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))?;

        report_from_row(&row)
    }

    async fn update(&self, id: Uuid, req: UpdateReportRequest) -> Result<()> {
        let now = Utc::now();
        let sections = req.sections.as_ref().map(serde_json::to_value).transpose()?;

        let result = sqlx::query(
            r#"UPDATE report SET
                 title = COALESCE($1, title),
                 sections = COALESCE($2, sections),
                 metadata = COALESCE($3, metadata),
                 confidentiality = COALESCE($4, confidentiality),
                 updated_at = $5
               WHERE id = $6"#,
        )
        .bind(&req.title)
        .bind(sections)
        .bind(&req.metadata)
        .bind(req.confidentiality.map(|c| c.as_str()))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Report {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_type(
        &self,
        report_type: ReportType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReportSummary>> {
        let rows = sqlx::query(
            r#"SELECT id, title, report_type, period_start, period_end, created_at
               FROM report
               WHERE report_type = $1
               ORDER BY period_start DESC, created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(report_type.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let report_type: String = r.get("report_type");
                ReportSummary {
                    id: r.get("id"),
                    title: r.get("title"),
                    report_type: ReportType::from_db(&report_type),
                    period_start: r.get("period_start"),
                    period_end: r.get("period_end"),
                    created_at: r.get("created_at"),
                }
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM report WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Report {} not found", id)));
        }
        Ok(())
    }
}
