// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Entity classification carried by catalog entries and harvested records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Hoa,
    PropertyManagement,
    Both,
    Unknown,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Hoa => "hoa",
            EntityKind::PropertyManagement => "propertyManagement",
            EntityKind::Both => "both",
            EntityKind::Unknown => "unknown",
        }
    }
}

/// A record as a strategy pulled it off a page. Not yet validated or
/// normalized; only `name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub snippet: Option<String>,
}

/// A normalized, export-ready record. String fields are empty rather than
/// absent so every export column is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub entity_type: EntityKind,
    pub scraped_at: DateTime<Utc>,
    pub source_type: String,
    pub source_region: String,
}

impl EntityRecord {
    /// Composite identity key used for deduplication.
    pub fn identity_key(&self) -> String {
        format!("{}|{}", self.name.to_lowercase(), self.address.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<EntityRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub total_sources: usize,
    pub processed_sources: usize,
    pub total_results: usize,
    pub total_errors: usize,
    pub hoa_count: usize,
    pub property_management_count: usize,
    pub both_count: usize,
    pub unknown_count: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_website: usize,
    pub processed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn compute(
        run_id: String,
        records: &[EntityRecord],
        total_sources: usize,
        processed_sources: usize,
        total_errors: usize,
    ) -> Self {
        let count_kind = |kind: EntityKind| records.iter().filter(|r| r.entity_type == kind).count();
        Self {
            run_id,
            total_sources,
            processed_sources,
            total_results: records.len(),
            total_errors,
            hoa_count: count_kind(EntityKind::Hoa),
            property_management_count: count_kind(EntityKind::PropertyManagement),
            both_count: count_kind(EntityKind::Both),
            unknown_count: count_kind(EntityKind::Unknown),
            with_email: records.iter().filter(|r| !r.email.is_empty()).count(),
            with_phone: records.iter().filter(|r| !r.phone.is_empty()).count(),
            with_website: records.iter().filter(|r| !r.website.is_empty()).count(),
            processed_at: Utc::now(),
        }
    }
}

/// A source-level extraction failure. Item- and term-level problems are
/// recovered inside strategies and never surface here; this only reports
/// the source entry point being out of reach.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}
