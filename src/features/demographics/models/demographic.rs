use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persona used for role-play
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Demographic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub characteristics: String,
    pub age_range: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
