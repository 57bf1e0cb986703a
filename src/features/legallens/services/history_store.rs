use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::legallens::models::LegalAnalysisRecord;
use crate::shared::types::PaginationQuery;

const HISTORY_COLUMNS: &str =
    "id, content_hash, rules_fingerprint, content, content_type, overall_score, result, created_at";

#[derive(Debug, Clone)]
pub struct NewLegalAnalysis {
    pub content_hash: String,
    pub rules_fingerprint: String,
    pub content: String,
    pub content_type: Option<String>,
    pub overall_score: f64,
    pub result: serde_json::Value,
}

/// Persistent cache of legal analyses keyed by `(content_hash, rules_fingerprint)`
#[async_trait]
pub trait LegalHistoryStore: Send + Sync {
    async fn find(
        &self,
        content_hash: &str,
        rules_fingerprint: &str,
    ) -> Result<Option<LegalAnalysisRecord>>;

    /// Keeps the existing row when the key is already present
    async fn insert(&self, entry: NewLegalAnalysis) -> Result<LegalAnalysisRecord>;

    async fn list(&self, params: &PaginationQuery) -> Result<(Vec<LegalAnalysisRecord>, i64)>;
}

pub struct PgLegalHistoryStore {
    pool: PgPool,
}

impl PgLegalHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LegalHistoryStore for PgLegalHistoryStore {
    async fn find(
        &self,
        content_hash: &str,
        rules_fingerprint: &str,
    ) -> Result<Option<LegalAnalysisRecord>> {
        let query = format!(
            r#"
            SELECT {}
            FROM legal_analysis_history
            WHERE content_hash = $1 AND rules_fingerprint = $2
            "#,
            HISTORY_COLUMNS
        );
        let record = sqlx::query_as::<_, LegalAnalysisRecord>(&query)
            .bind(content_hash)
            .bind(rules_fingerprint)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn insert(&self, entry: NewLegalAnalysis) -> Result<LegalAnalysisRecord> {
        let query = format!(
            r#"
            INSERT INTO legal_analysis_history
                (content_hash, rules_fingerprint, content, content_type, overall_score, result)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (content_hash, rules_fingerprint) DO NOTHING
            RETURNING {}
            "#,
            HISTORY_COLUMNS
        );
        let inserted = sqlx::query_as::<_, LegalAnalysisRecord>(&query)
            .bind(&entry.content_hash)
            .bind(&entry.rules_fingerprint)
            .bind(&entry.content)
            .bind(&entry.content_type)
            .bind(entry.overall_score)
            .bind(&entry.result)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store legal analysis: {:?}", e);
                AppError::Database(e)
            })?;

        match inserted {
            Some(record) => Ok(record),
            // A concurrent request stored the same key first
            None => self
                .find(&entry.content_hash, &entry.rules_fingerprint)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("Legal analysis vanished after conflict".to_string())
                }),
        }
    }

    async fn list(&self, params: &PaginationQuery) -> Result<(Vec<LegalAnalysisRecord>, i64)> {
        let search = params.search_pattern();
        let filter = "WHERE ($1::text IS NULL OR content ILIKE $1 OR content_type ILIKE $1)";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM legal_analysis_history {}",
            filter
        ))
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM legal_analysis_history
            {}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            HISTORY_COLUMNS, filter
        );
        let records = sqlx::query_as::<_, LegalAnalysisRecord>(&query)
            .bind(&search)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total))
    }
}
