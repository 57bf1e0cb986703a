use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::map_constraint_error;
use crate::core::error::{AppError, Result};
use crate::features::legal_rules::dtos::{
    LegalRuleQueryParams, LegalRuleResponseDto, UpsertLegalRuleDto,
};
use crate::features::legal_rules::models::LegalRule;

const RULE_COLUMNS: &str =
    "id, name, category, description, severity, is_active, created_at, updated_at";

/// Digest of the rule set a legal analysis was run against.
///
/// Sensitive to every field the model sees, so any rule edit changes it.
pub fn rules_fingerprint(rules: &[LegalRule]) -> String {
    let mut sorted: Vec<&LegalRule> = rules.iter().collect();
    sorted.sort_by_key(|r| r.id);

    let mut hasher = Sha256::new();
    for rule in sorted {
        hasher.update(rule.id.as_bytes());
        for field in [&rule.name, &rule.category, &rule.description, &rule.severity] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
    }
    hex::encode(hasher.finalize())[..16].to_string()
}

pub struct LegalRuleService {
    pool: PgPool,
}

impl LegalRuleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active rules, most severe first
    pub async fn active_rules(&self) -> Result<Vec<LegalRule>> {
        let query = format!(
            r#"
            SELECT {}
            FROM legal_compliance_rules
            WHERE is_active = TRUE
            ORDER BY CASE severity
                         WHEN 'critical' THEN 0
                         WHEN 'high' THEN 1
                         WHEN 'medium' THEN 2
                         ELSE 3
                     END,
                     name
            "#,
            RULE_COLUMNS
        );
        sqlx::query_as::<_, LegalRule>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load active legal rules: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<LegalRuleResponseDto> {
        let query = format!(
            "SELECT {} FROM legal_compliance_rules WHERE id = $1",
            RULE_COLUMNS
        );
        sqlx::query_as::<_, LegalRule>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Legal rule with id {} not found", id)))
    }

    pub async fn list(
        &self,
        params: &LegalRuleQueryParams,
    ) -> Result<(Vec<LegalRuleResponseDto>, i64)> {
        let pagination = params.pagination();
        let search = pagination.search_pattern();
        let filter = r#"
            WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::bool IS NULL OR is_active = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM legal_compliance_rules {}",
            filter
        ))
        .bind(&search)
        .bind(&params.category)
        .bind(params.is_active)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM legal_compliance_rules
            {}
            ORDER BY category, name
            LIMIT $4 OFFSET $5
            "#,
            RULE_COLUMNS, filter
        );
        let rules = sqlx::query_as::<_, LegalRule>(&query)
            .bind(&search)
            .bind(&params.category)
            .bind(params.is_active)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rules.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create(&self, dto: UpsertLegalRuleDto) -> Result<LegalRuleResponseDto> {
        let query = format!(
            r#"
            INSERT INTO legal_compliance_rules (name, category, description, severity, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            RULE_COLUMNS
        );
        let rule = sqlx::query_as::<_, LegalRule>(&query)
            .bind(&dto.name)
            .bind(&dto.category)
            .bind(&dto.description)
            .bind(dto.severity.as_str())
            .bind(dto.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    &format!("A legal rule named '{}' already exists", dto.name),
                )
            })?;

        tracing::info!("Legal rule created: {} ({})", rule.name, rule.id);
        Ok(rule.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpsertLegalRuleDto) -> Result<LegalRuleResponseDto> {
        let query = format!(
            r#"
            UPDATE legal_compliance_rules
            SET name = $1, category = $2, description = $3, severity = $4, is_active = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            RULE_COLUMNS
        );
        sqlx::query_as::<_, LegalRule>(&query)
            .bind(&dto.name)
            .bind(&dto.category)
            .bind(&dto.description)
            .bind(dto.severity.as_str())
            .bind(dto.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    &format!("A legal rule named '{}' already exists", dto.name),
                )
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Legal rule with id {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM legal_compliance_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Legal rule with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rule(name: &str, description: &str) -> LegalRule {
        LegalRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "advertising".to_string(),
            description: description.to_string(),
            severity: "high".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let a = rule("A", "first");
        let b = rule("B", "second");
        assert_eq!(
            rules_fingerprint(&[a.clone(), b.clone()]),
            rules_fingerprint(&[b, a])
        );
    }

    #[test]
    fn test_fingerprint_changes_when_rule_edited() {
        let original = rule("No superlatives", "Avoid 'best in the world'");
        let mut edited = original.clone();
        edited.description = "Avoid unverifiable superlatives".to_string();

        assert_ne!(
            rules_fingerprint(std::slice::from_ref(&original)),
            rules_fingerprint(&[edited])
        );
    }

    #[test]
    fn test_fingerprint_of_empty_rule_set_is_stable() {
        assert_eq!(rules_fingerprint(&[]), rules_fingerprint(&[]));
        assert_eq!(rules_fingerprint(&[]).len(), 16);
    }
}
