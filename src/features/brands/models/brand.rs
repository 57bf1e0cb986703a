use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tone: String,
    #[sqlx(rename = "brand_values")]
    pub values: String,
    pub industry: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
