use std::collections::HashMap;

use crate::entry::{AuditEntry, Outcome};

const TOP_N: usize = 5;

/// Aggregate statistics over a window of audit entries. Contains only
/// counts and already-known-safe labels (rejection kinds, table names
/// already present in the catalog) — never raw SQL, literal values, or
/// per-entry principal identity (spec §4.9).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AuditSummary {
    pub accepted_count: u64,
    pub rejected_count: u64,
    pub top_rejection_reasons: Vec<(String, u64)>,
    pub top_queried_tables: Vec<(String, u64)>,
}

fn top_n(counts: HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_N);
    ranked
}

/// Builds a summary from a batch of entries. Deterministic: identical
/// input entries always produce an identical summary, regardless of the
/// order they were recorded in.
pub fn summarize(entries: &[AuditEntry]) -> AuditSummary {
    let mut accepted_count = 0u64;
    let mut rejected_count = 0u64;
    let mut reason_counts: HashMap<String, u64> = HashMap::new();
    let mut table_counts: HashMap<String, u64> = HashMap::new();

    for entry in entries {
        match &entry.outcome {
            Outcome::Accepted => accepted_count += 1,
            Outcome::Rejected { reason_kind } => {
                rejected_count += 1;
                *reason_counts.entry(reason_kind.to_string()).or_insert(0) += 1;
            }
        }
        for table in &entry.tables {
            *table_counts.entry(table.clone()).or_insert(0) += 1;
        }
    }

    AuditSummary {
        accepted_count,
        rejected_count,
        top_rejection_reasons: top_n(reason_counts),
        top_queried_tables: top_n(table_counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlgate_common::QueryId;

    fn accepted(tables: &[&str]) -> AuditEntry {
        AuditEntry::accepted(QueryId::new(), "u1", tables.iter().map(|t| t.to_string()).collect(), Utc::now())
    }

    fn rejected(reason: &'static str) -> AuditEntry {
        AuditEntry::rejected(QueryId::new(), "u1", vec![], reason, Utc::now())
    }

    #[test]
    fn counts_accepted_and_rejected_separately() {
        let entries = vec![accepted(&["a.b"]), rejected("table_not_found"), accepted(&["a.b"])];
        let summary = summarize(&entries);
        assert_eq!(summary.accepted_count, 2);
        assert_eq!(summary.rejected_count, 1);
    }

    #[test]
    fn ranks_top_rejection_reasons_with_lexicographic_tiebreak() {
        let entries = vec![rejected("table_not_found"), rejected("unauthorized"), rejected("table_not_found")];
        let summary = summarize(&entries);
        assert_eq!(summary.top_rejection_reasons[0], ("table_not_found".to_string(), 2));
        assert_eq!(summary.top_rejection_reasons[1], ("unauthorized".to_string(), 1));
    }

    #[test]
    fn truncates_to_top_five() {
        let entries: Vec<AuditEntry> = (0..8).map(|i| rejected(Box::leak(format!("reason_{i}").into_boxed_str()))).collect();
        let summary = summarize(&entries);
        assert_eq!(summary.top_rejection_reasons.len(), 5);
    }

    #[test]
    fn summary_never_contains_raw_sql_or_principal_identity() {
        let entries = vec![accepted(&["analytics.orders"])];
        let summary = summarize(&entries);
        let serialized = serde_json::to_string(&summary).unwrap();
        assert!(!serialized.contains("u1"));
        assert!(!serialized.contains("SELECT"));
    }
}
