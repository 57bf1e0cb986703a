use sqlx::PgPool;

use crate::core::database::map_constraint_error;
use crate::core::error::{AppError, Result};
use crate::features::demographics::dtos::{
    CreateDemographicDto, DemographicResponseDto, UpdateDemographicDto,
};
use crate::features::demographics::models::Demographic;
use crate::shared::types::PaginationQuery;

const DEMOGRAPHIC_COLUMNS: &str =
    "id, name, description, characteristics, age_range, created_at, updated_at";

pub struct DemographicService {
    pool: PgPool,
}

impl DemographicService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: &str) -> Result<Option<Demographic>> {
        let query = format!(
            "SELECT {} FROM demographics WHERE id = $1",
            DEMOGRAPHIC_COLUMNS
        );
        Ok(sqlx::query_as::<_, Demographic>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<DemographicResponseDto> {
        self.find(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Demographic '{}' not found", id)))
    }

    pub async fn list(
        &self,
        params: &PaginationQuery,
    ) -> Result<(Vec<DemographicResponseDto>, i64)> {
        let search = params.search_pattern();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM demographics
            WHERE ($1::text IS NULL OR name ILIKE $1 OR id ILIKE $1)
            "#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM demographics
            WHERE ($1::text IS NULL OR name ILIKE $1 OR id ILIKE $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
            DEMOGRAPHIC_COLUMNS
        );
        let rows = sqlx::query_as::<_, Demographic>(&query)
            .bind(&search)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create(&self, dto: CreateDemographicDto) -> Result<DemographicResponseDto> {
        let query = format!(
            r#"
            INSERT INTO demographics (id, name, description, characteristics, age_range)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            DEMOGRAPHIC_COLUMNS
        );
        let demographic = sqlx::query_as::<_, Demographic>(&query)
            .bind(&dto.id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.characteristics)
            .bind(&dto.age_range)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    &format!("Demographic with id '{}' already exists", dto.id),
                )
            })?;

        tracing::info!("Demographic created: {}", demographic.id);
        Ok(demographic.into())
    }

    pub async fn update(
        &self,
        id: &str,
        dto: UpdateDemographicDto,
    ) -> Result<DemographicResponseDto> {
        let query = format!(
            r#"
            UPDATE demographics
            SET name = $1, description = $2, characteristics = $3, age_range = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            DEMOGRAPHIC_COLUMNS
        );
        let demographic = sqlx::query_as::<_, Demographic>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.characteristics)
            .bind(&dto.age_range)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Demographic '{}' not found", id)))?;

        Ok(demographic.into())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM demographics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Demographic '{}' not found", id)));
        }

        tracing::info!("Demographic deleted: {}", id);
        Ok(())
    }
}
