use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::database::map_constraint_error;
use crate::core::error::{AppError, Result};
use crate::features::prompts::dtos::{PromptQueryParams, PromptResponseDto, UpsertPromptDto};
use crate::features::prompts::models::PromptTemplate;
use crate::shared::prompts::{PromptType, TemplateError, TemplateStore};

const PROMPT_COLUMNS: &str =
    "id, name, type, target_id, prompt_template, is_active, created_at, updated_at";

const ACTIVE_CONFLICT: &str =
    "An active template already exists for this type and target. Deactivate or delete it first.";

// Cache structure. Misses are cached too so the file fallback does not hit the database.
struct PromptCache {
    templates: HashMap<(PromptType, String), Option<String>>,
    last_fetched: Instant,
}

type CacheKey = (PromptType, String);

pub struct PromptService {
    pool: PgPool,
    cache: RwLock<Option<PromptCache>>,
    /// Bumped on every invalidation; lookups that started earlier must not repopulate the cache
    generation: AtomicU64,
    cache_ttl: Duration,
}

impl std::fmt::Debug for PromptService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptService")
            .field("pool", &"<PgPool>")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl PromptService {
    pub fn new(pool: PgPool, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
            cache_ttl,
        }
    }

    /// Active template text for `(prompt_type, target_id)`, served from cache when fresh
    pub async fn get_active_template(
        &self,
        prompt_type: PromptType,
        target_id: &str,
    ) -> Result<Option<String>> {
        let key = (prompt_type, target_id.to_string());

        if let Some(template) = self.cached(&key).await {
            return Ok(template);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let template: Option<String> = sqlx::query_scalar(
            r#"
            SELECT prompt_template
            FROM system_prompts
            WHERE type = $1 AND COALESCE(target_id, 'global') = $2 AND is_active = TRUE
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(prompt_type.as_str())
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        self.remember(key, template.clone(), generation).await;
        Ok(template)
    }

    async fn cached(&self, key: &CacheKey) -> Option<Option<String>> {
        let cache_read = self.cache.read().await;
        cache_read
            .as_ref()
            .filter(|c| c.last_fetched.elapsed() < self.cache_ttl)
            .and_then(|c| c.templates.get(key).cloned())
    }

    /// Store a lookup result read under `generation`, unless the cache was invalidated since
    async fn remember(&self, key: CacheKey, template: Option<String>, generation: u64) {
        let mut cache_write = self.cache.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("Prompt cache invalidated during lookup of {:?}, not caching", key);
            return;
        }

        let expired = cache_write
            .as_ref()
            .is_none_or(|c| c.last_fetched.elapsed() >= self.cache_ttl);
        if expired {
            *cache_write = Some(PromptCache {
                templates: HashMap::new(),
                last_fetched: Instant::now(),
            });
        }
        if let Some(cache) = cache_write.as_mut() {
            cache.templates.insert(key, template);
        }
    }

    pub async fn create(&self, dto: UpsertPromptDto) -> Result<PromptResponseDto> {
        let target_id = dto.normalized_target().map_err(AppError::Validation)?;

        let query = format!(
            r#"
            INSERT INTO system_prompts (name, type, target_id, prompt_template, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PROMPT_COLUMNS
        );
        let prompt = sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(&dto.name)
            .bind(dto.prompt_type.as_str())
            .bind(&target_id)
            .bind(&dto.prompt_template)
            .bind(dto.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, ACTIVE_CONFLICT))?;

        self.invalidate_cache().await;
        tracing::info!(
            "Prompt template created: {} ({}/{})",
            prompt.id,
            prompt.prompt_type,
            target_id
        );

        Ok(PromptResponseDto::from(prompt))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PromptResponseDto> {
        let query = format!("SELECT {} FROM system_prompts WHERE id = $1", PROMPT_COLUMNS);
        let prompt = sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Prompt with id {} not found", id)))?;

        Ok(PromptResponseDto::from(prompt))
    }

    /// List templates with pagination and filters
    pub async fn list(&self, params: &PromptQueryParams) -> Result<(Vec<PromptResponseDto>, i64)> {
        let search_pattern = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let prompt_type = params.prompt_type.map(|t| t.as_str());

        let filter = r#"
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR target_id ILIKE $1 OR prompt_template ILIKE $1)
              AND ($2::text IS NULL OR type = $2)
              AND ($3::text IS NULL OR COALESCE(target_id, 'global') = $3)
              AND ($4::bool IS NULL OR is_active = $4)
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM system_prompts {}", filter))
                .bind(&search_pattern)
                .bind(prompt_type)
                .bind(&params.target_id)
                .bind(params.is_active)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        let query = format!(
            r#"
            SELECT {}
            FROM system_prompts
            {}
            ORDER BY CASE type WHEN 'system' THEN 0 WHEN 'persona' THEN 1 ELSE 2 END,
                     target_id NULLS FIRST,
                     updated_at DESC
            LIMIT $5 OFFSET $6
            "#,
            PROMPT_COLUMNS, filter
        );

        let prompts = sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(&search_pattern)
            .bind(prompt_type)
            .bind(&params.target_id)
            .bind(params.is_active)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((
            prompts.into_iter().map(PromptResponseDto::from).collect(),
            total,
        ))
    }

    /// Replace every field of a template
    pub async fn update(&self, id: Uuid, dto: UpsertPromptDto) -> Result<PromptResponseDto> {
        let target_id = dto.normalized_target().map_err(AppError::Validation)?;

        let query = format!(
            r#"
            UPDATE system_prompts
            SET name = $1,
                type = $2,
                target_id = $3,
                prompt_template = $4,
                is_active = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            PROMPT_COLUMNS
        );
        let prompt = sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(&dto.name)
            .bind(dto.prompt_type.as_str())
            .bind(&target_id)
            .bind(&dto.prompt_template)
            .bind(dto.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, ACTIVE_CONFLICT))?
            .ok_or_else(|| AppError::NotFound(format!("Prompt with id {} not found", id)))?;

        self.invalidate_cache().await;

        Ok(PromptResponseDto::from(prompt))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM system_prompts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Prompt with id {} not found",
                id
            )));
        }

        self.invalidate_cache().await;

        Ok(())
    }

    /// Clear the cache
    pub async fn invalidate_cache(&self) {
        let mut cache_write = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *cache_write = None;
    }
}

#[async_trait]
impl TemplateStore for PromptService {
    async fn find_active(
        &self,
        prompt_type: PromptType,
        target_id: &str,
    ) -> std::result::Result<Option<String>, TemplateError> {
        self.get_active_template(prompt_type, target_id)
            .await
            .map_err(|e| TemplateError::Lookup(e.to_string()))
    }
}
