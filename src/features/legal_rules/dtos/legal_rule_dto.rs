use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::legal_rules::models::{LegalRule, RuleSeverity};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LegalRuleQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Search in name and description
    pub search: Option<String>,

    /// Filter by category
    pub category: Option<String>,

    /// Filter by active status (none = all)
    pub is_active: Option<bool>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl LegalRuleQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}

/// Body for both create and full replacement
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertLegalRuleDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[serde(default)]
    pub severity: RuleSeverity,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LegalRuleResponseDto {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub severity: RuleSeverity,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LegalRule> for LegalRuleResponseDto {
    fn from(r: LegalRule) -> Self {
        Self {
            severity: r.severity(),
            id: r.id,
            name: r.name,
            category: r.category,
            description: r.description,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
