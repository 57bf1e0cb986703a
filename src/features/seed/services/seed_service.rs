use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::prompts::PromptService;
use crate::features::seed::dtos::{SeedEntryDto, SeedReportDto, SeedStatus};
use crate::features::seed::services::defaults::{self, BRANDS, DEMOGRAPHICS, LEGAL_RULES};
use crate::shared::prompts::normalize_target_id;

fn entry(
    table: &'static str,
    key: impl Into<String>,
    outcome: std::result::Result<u64, sqlx::Error>,
) -> SeedEntryDto {
    let key = key.into();
    let table = table.to_string();
    match outcome {
        Ok(0) => SeedEntryDto {
            table,
            key,
            status: SeedStatus::Skipped,
            error: None,
        },
        Ok(_) => SeedEntryDto {
            table,
            key,
            status: SeedStatus::Inserted,
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to seed {} '{}': {:?}", table, key, e);
            SeedEntryDto {
                table,
                key,
                status: SeedStatus::Failed,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Inserts the default catalog. Existing rows are never overwritten, so it is safe to rerun.
pub struct SeedService {
    pool: PgPool,
    prompts: Arc<PromptService>,
}

impl SeedService {
    pub fn new(pool: PgPool, prompts: Arc<PromptService>) -> Self {
        Self { pool, prompts }
    }

    pub async fn seed(&self) -> Result<SeedReportDto> {
        let mut report = SeedReportDto::default();

        self.seed_brands(&mut report).await;
        self.seed_demographics(&mut report).await;
        self.seed_legal_rules(&mut report).await;
        self.seed_prompts(&mut report).await?;

        if report.inserted > 0 {
            self.prompts.invalidate_cache().await;
        }

        tracing::info!(
            "Seed finished: {} inserted, {} skipped, {} failed",
            report.inserted,
            report.skipped,
            report.failed
        );
        Ok(report)
    }

    async fn seed_brands(&self, report: &mut SeedReportDto) {
        for brand in BRANDS {
            let outcome = sqlx::query(
                r#"
                INSERT INTO brands (id, name, description, tone, brand_values, industry)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(brand.id)
            .bind(brand.name)
            .bind(brand.description)
            .bind(brand.tone)
            .bind(brand.values)
            .bind(brand.industry)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());

            report.record(entry("brands", brand.id, outcome));
        }
    }

    async fn seed_demographics(&self, report: &mut SeedReportDto) {
        for persona in DEMOGRAPHICS {
            let outcome = sqlx::query(
                r#"
                INSERT INTO demographics (id, name, description, characteristics, age_range)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(persona.id)
            .bind(persona.name)
            .bind(persona.description)
            .bind(persona.characteristics)
            .bind(persona.age_range)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());

            report.record(entry("demographics", persona.id, outcome));
        }
    }

    async fn seed_legal_rules(&self, report: &mut SeedReportDto) {
        for rule in LEGAL_RULES {
            let outcome = sqlx::query(
                r#"
                INSERT INTO legal_compliance_rules (name, category, description, severity)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(rule.name)
            .bind(rule.category)
            .bind(rule.description)
            .bind(rule.severity.as_str())
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());

            report.record(entry("legal_compliance_rules", rule.name, outcome));
        }
    }

    async fn seed_prompts(&self, report: &mut SeedReportDto) -> Result<()> {
        let templates = defaults::prompt_templates().map_err(|e| {
            AppError::Internal(format!("Bundled prompt templates are invalid: {}", e))
        })?;

        for template in templates {
            let Some(target) =
                normalize_target_id(template.prompt_type, template.target_id.as_deref())
            else {
                tracing::warn!("Skipping bundled {} template without target", template.prompt_type);
                continue;
            };
            let key = format!("{}/{}", template.prompt_type, target);

            let outcome = sqlx::query(
                r#"
                INSERT INTO system_prompts (name, type, target_id, prompt_template, is_active)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (type, COALESCE(target_id, 'global')) WHERE is_active DO NOTHING
                "#,
            )
            .bind(format!("Default {} prompt ({})", template.prompt_type, target))
            .bind(template.prompt_type.as_str())
            .bind(&target)
            .bind(&template.prompt_template)
            .bind(template.is_active)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());

            report.record(entry("system_prompts", key, outcome));
        }

        Ok(())
    }
}
