use sqlx::PgPool;

use crate::core::database::map_constraint_error;
use crate::core::error::{AppError, Result};
use crate::features::brands::dtos::{BrandResponseDto, CreateBrandDto, UpdateBrandDto};
use crate::features::brands::models::Brand;
use crate::shared::types::PaginationQuery;

const BRAND_COLUMNS: &str =
    "id, name, description, tone, brand_values, industry, created_at, updated_at";

pub struct BrandService {
    pool: PgPool,
}

impl BrandService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Raw model lookup, used when composing prompts
    pub async fn find(&self, id: &str) -> Result<Option<Brand>> {
        let query = format!("SELECT {} FROM brands WHERE id = $1", BRAND_COLUMNS);
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch brand {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<BrandResponseDto> {
        self.find(id)
            .await?
            .map(BrandResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", id)))
    }

    pub async fn list(&self, params: &PaginationQuery) -> Result<(Vec<BrandResponseDto>, i64)> {
        let search = params.search_pattern();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM brands WHERE ($1::text IS NULL OR name ILIKE $1 OR id ILIKE $1)",
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM brands
            WHERE ($1::text IS NULL OR name ILIKE $1 OR id ILIKE $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
            BRAND_COLUMNS
        );
        let brands = sqlx::query_as::<_, Brand>(&query)
            .bind(&search)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((brands.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create(&self, dto: CreateBrandDto) -> Result<BrandResponseDto> {
        let query = format!(
            r#"
            INSERT INTO brands (id, name, description, tone, brand_values, industry)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BRAND_COLUMNS
        );
        let brand = sqlx::query_as::<_, Brand>(&query)
            .bind(&dto.id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.tone)
            .bind(&dto.values)
            .bind(&dto.industry)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(e, &format!("Brand with id '{}' already exists", dto.id))
            })?;

        tracing::info!("Brand created: {}", brand.id);
        Ok(brand.into())
    }

    pub async fn update(&self, id: &str, dto: UpdateBrandDto) -> Result<BrandResponseDto> {
        let query = format!(
            r#"
            UPDATE brands
            SET name = $1, description = $2, tone = $3, brand_values = $4, industry = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            BRAND_COLUMNS
        );
        let brand = sqlx::query_as::<_, Brand>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.tone)
            .bind(&dto.values)
            .bind(&dto.industry)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", id)))?;

        Ok(brand.into())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Brand '{}' not found", id)));
        }

        tracing::info!("Brand deleted: {}", id);
        Ok(())
    }
}
