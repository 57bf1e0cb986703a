use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeedStatus {
    Inserted,
    /// A row with the same key already exists
    Skipped,
    Failed,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedEntryDto {
    pub table: String,
    pub key: String,
    pub status: SeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SeedReportDto {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub entries: Vec<SeedEntryDto>,
}

impl SeedReportDto {
    pub fn record(&mut self, entry: SeedEntryDto) {
        match entry.status {
            SeedStatus::Inserted => self.inserted += 1,
            SeedStatus::Skipped => self.skipped += 1,
            SeedStatus::Failed => self.failed += 1,
        }
        self.entries.push(entry);
    }
}
