//! Per-document entity statistics

use crate::types::{EntitySpan, EntityType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count of one entity type within a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStatistic {
    /// Entity type
    pub entity_type: EntityType,
    /// Number of spans of this type
    pub count: usize,
    /// Share of all spans, in percent
    pub percentage: f64,
}

/// Count spans per entity type
///
/// Only types that occur are listed, ordered by count descending then by
/// label. Percentages sum to 100 (up to rounding) unless `spans` is empty.
pub fn aggregate(spans: &[EntitySpan]) -> Vec<EntityStatistic> {
    let mut counts: BTreeMap<EntityType, usize> = BTreeMap::new();
    for span in spans {
        *counts.entry(span.entity_type).or_default() += 1;
    }

    let total = spans.len() as f64;
    let mut stats: Vec<EntityStatistic> = counts
        .into_iter()
        .map(|(entity_type, count)| EntityStatistic {
            entity_type,
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.entity_type.as_str().cmp(b.entity_type.as_str()))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(types: &[EntityType]) -> Vec<EntitySpan> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| EntitySpan::new(*t, i * 10, i * 10 + 5, 1.0, "test"))
            .collect()
    }

    #[test]
    fn test_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_counts_and_order() {
        let stats = aggregate(&spans(&[
            EntityType::Person,
            EntityType::Email,
            EntityType::Person,
            EntityType::PhoneNumber,
        ]));
        let order: Vec<(EntityType, usize)> =
            stats.iter().map(|s| (s.entity_type, s.count)).collect();
        assert_eq!(
            order,
            vec![
                (EntityType::Person, 2),
                (EntityType::Email, 1),
                (EntityType::PhoneNumber, 1),
            ]
        );
        assert_eq!(stats[0].percentage, 50.0);
    }

    #[test]
    fn test_thirds_sum_to_hundred() {
        let stats = aggregate(&spans(&[
            EntityType::Person,
            EntityType::Email,
            EntityType::PhoneNumber,
        ]));
        for stat in &stats {
            assert!((stat.percentage - 33.33).abs() < 0.01);
        }
        let sum: f64 = stats.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 0.01);
    }
}
