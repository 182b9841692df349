//! Profile repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use casebook_core::{new_v7, CreateProfileRequest, Error, Profile, ProfileRepository, Result};

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        display_name: row.get("display_name"),
        date_of_birth: row.get("date_of_birth"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, req: CreateProfileRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO profile (id, display_name, date_of_birth, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&req.display_name)
        .bind(req.date_of_birth)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, display_name, date_of_birth, created_at, updated_at
             FROM profile WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| profile_from_row(&r)))
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query(
            "SELECT id, display_name, date_of_birth, created_at, updated_at
             FROM profile ORDER BY display_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(profile_from_row).collect())
    }
}
