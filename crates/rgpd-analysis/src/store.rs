//! Storage of finished analyses and dashboard aggregation

use crate::error::{AnalysisError, Result};
use crate::record::{AnalysisResult, RecordId};
use async_trait::async_trait;
use rgpd_guard::EntityType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Number of analyses listed on the dashboard
pub const RECENT_ANALYSES: usize = 5;

/// Totals for one entity type across all stored analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeSummary {
    /// Entity type
    pub entity_type: EntityType,
    /// Occurrences across all analyses
    pub total_count: usize,
    /// Mean per-document percentage, over documents containing the type
    pub avg_percentage: f64,
}

/// Dashboard view of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Stored analyses, failed ones included
    pub total_analyses: usize,
    /// Sensitive spans found across all analyses
    pub sensitive_data_count: usize,
    /// Per-type totals, by total count descending then label
    pub entity_stats: Vec<EntityTypeSummary>,
    /// Most recently finished analyses
    pub recent_analyses: Vec<AnalysisResult>,
}

/// Storage for finished analyses
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Store a completed or failed record
    async fn persist(&self, record: AnalysisResult) -> Result<RecordId>;

    /// Fetch one record
    async fn get(&self, id: RecordId) -> Result<Option<AnalysisResult>>;

    /// All records, most recent analysis first
    async fn list(&self) -> Result<Vec<AnalysisResult>>;

    /// Dashboard totals
    async fn aggregate_stats(&self) -> Result<DashboardStats> {
        Ok(dashboard(&self.list().await?))
    }
}

/// Compute dashboard totals over records sorted most recent first
pub fn dashboard(records: &[AnalysisResult]) -> DashboardStats {
    // entity type -> (total count, percentage sum, documents)
    let mut totals: BTreeMap<EntityType, (usize, f64, usize)> = BTreeMap::new();
    for report in records.iter().filter_map(|r| r.report()) {
        for stat in &report.statistics {
            let entry = totals.entry(stat.entity_type).or_default();
            entry.0 += stat.count;
            entry.1 += stat.percentage;
            entry.2 += 1;
        }
    }

    let mut entity_stats: Vec<EntityTypeSummary> = totals
        .into_iter()
        .map(|(entity_type, (total_count, sum, documents))| EntityTypeSummary {
            entity_type,
            total_count,
            avg_percentage: sum / documents as f64,
        })
        .collect();
    entity_stats.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.entity_type.as_str().cmp(b.entity_type.as_str()))
    });

    DashboardStats {
        total_analyses: records.len(),
        sensitive_data_count: entity_stats.iter().map(|s| s.total_count).sum(),
        entity_stats,
        recent_analyses: records.iter().take(RECENT_ANALYSES).cloned().collect(),
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, AnalysisResult>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn persist(&self, record: AnalysisResult) -> Result<RecordId> {
        if !record.is_final() {
            return Err(AnalysisError::Store(format!(
                "record {} is still {}",
                record.id,
                record.status()
            )));
        }
        let id = record.id;
        self.records.write().await.insert(id, record);
        Ok(id)
    }

    async fn get(&self, id: RecordId) -> Result<Option<AnalysisResult>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<AnalysisResult>> {
        let mut records: Vec<AnalysisResult> =
            self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| {
            b.analysis_date
                .cmp(&a.analysis_date)
                .then_with(|| b.upload_date.cmp(&a.upload_date))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DocumentInfo;
    use rgpd_extract::FileType;
    use rgpd_guard::{AnonymizationPolicy, Language};

    fn pending() -> AnalysisResult {
        AnalysisResult::new(
            DocumentInfo {
                file_name: "a.txt".into(),
                file_size: 1,
                file_type: FileType::PlainText,
            },
            AnonymizationPolicy::Redact,
            Language::French,
            vec![],
        )
    }

    #[tokio::test]
    async fn test_rejects_unfinished_records() {
        let store = MemoryStore::new();
        let err = store.persist(pending()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Store(_)));

        let mut processing = pending();
        processing.start().unwrap();
        assert!(store.persist(processing).await.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let stats = MemoryStore::new().aggregate_stats().await.unwrap();
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.sensitive_data_count, 0);
        assert!(stats.entity_stats.is_empty());
        assert!(stats.recent_analyses.is_empty());
    }
}
