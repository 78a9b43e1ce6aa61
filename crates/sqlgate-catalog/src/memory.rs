use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sqlgate_common::{GatewayError, Result};

use crate::model::VirtualTable;
use crate::repository::{TableDraft, TableRepository};

/// A dev-mode repository backed entirely by an in-process map. Satisfies
/// the same observable contract as a durable repository: per-key writer
/// serialization is provided by `DashMap`'s internal sharded locking, and
/// `get`/`list` return owned clones so callers never observe later
/// mutations through a previously returned value (spec §4.2).
#[derive(Default)]
pub struct InMemoryTableRepository {
    tables: DashMap<String, VirtualTable>,
}

impl InMemoryTableRepository {
    pub fn new() -> Self {
        InMemoryTableRepository { tables: DashMap::new() }
    }

    /// Seeds a table directly, bypassing draft validation timestamps but
    /// not invariant checks. Used by tests and fixture bootstrap.
    pub fn seed(&self, table: VirtualTable) -> Result<()> {
        table.validate()?;
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }
}

#[async_trait]
impl TableRepository for InMemoryTableRepository {
    async fn create(&self, draft: TableDraft) -> Result<VirtualTable> {
        if self.tables.contains_key(&draft.name) {
            return Err(GatewayError::AlreadyExists { name: draft.name });
        }
        let now = Utc::now();
        let table = VirtualTable::new(
            draft.name.clone(),
            draft.description,
            draft.sources,
            draft.capabilities,
            draft.constraints,
            now,
        )?;
        // Re-check for a racing create between the contains_key probe and
        // the insert below; DashMap's entry API makes this atomic.
        match self.tables.entry(draft.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(GatewayError::AlreadyExists { name: draft.name })
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(table.clone());
                Ok(table)
            }
        }
    }

    async fn get(&self, name: &str) -> Result<VirtualTable> {
        self.tables
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GatewayError::TableNotFound { name: name.to_string() })
    }

    async fn update(&self, draft: TableDraft) -> Result<VirtualTable> {
        let mut entry = self
            .tables
            .get_mut(&draft.name)
            .ok_or_else(|| GatewayError::NotFound { name: draft.name.clone() })?;
        let now = Utc::now();
        let updated = entry.apply_update(
            draft.description,
            draft.sources,
            draft.capabilities,
            draft.constraints,
            now,
        )?;
        *entry.value_mut() = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound { name: name.to_string() })
    }

    async fn list(&self) -> Result<Vec<VirtualTable>> {
        Ok(self.tables.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.tables.contains_key(name))
    }

    async fn check_connectivity(&self) -> Result<()> {
        // The in-memory store is always reachable; a durable backend would
        // probe its connection pool here.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_capability::{Capability, ConstraintSet};
    use sqlgate_capability::TableFormat;
    use crate::model::PhysicalSource;

    fn draft(name: &str) -> TableDraft {
        TableDraft {
            name: name.to_string(),
            description: None,
            sources: vec![PhysicalSource::new(TableFormat::Parquet, "s3://bucket/x")],
            capabilities: Capability::Read.into(),
            constraints: ConstraintSet::empty(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryTableRepository::new();
        let created = repo.create(draft("analytics.orders")).await.unwrap();
        let fetched = repo.get("analytics.orders").await.unwrap();
        assert_eq!(created.name, fetched.name);
        assert!(fetched.created_at.timestamp_nanos_opt().unwrap() > 0);
    }

    #[tokio::test]
    async fn duplicate_create_always_fails() {
        let repo = InMemoryTableRepository::new();
        repo.create(draft("analytics.orders")).await.unwrap();
        for _ in 0..3 {
            let err = repo.create(draft("analytics.orders")).await.unwrap_err();
            assert!(matches!(err, GatewayError::AlreadyExists { .. }));
        }
    }

    #[tokio::test]
    async fn update_missing_row_fails_not_found() {
        let repo = InMemoryTableRepository::new();
        let err = repo.update(draft("analytics.orders")).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_preserves_created_at() {
        let repo = InMemoryTableRepository::new();
        let created = repo.create(draft("analytics.orders")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = repo.update(draft("analytics.orders")).await.unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn get_returns_owned_snapshot_not_observing_later_mutation() {
        let repo = InMemoryTableRepository::new();
        repo.create(draft("analytics.orders")).await.unwrap();
        let snapshot = repo.get("analytics.orders").await.unwrap();
        repo.update(draft("analytics.orders")).await.unwrap();
        // snapshot is untouched by the later update
        assert_eq!(snapshot.updated_at, snapshot.created_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = InMemoryTableRepository::new();
        repo.create(draft("analytics.orders")).await.unwrap();
        repo.delete("analytics.orders").await.unwrap();
        let err = repo.get("analytics.orders").await.unwrap_err();
        assert!(matches!(err, GatewayError::TableNotFound { .. }));
    }

    #[tokio::test]
    async fn list_is_internally_consistent_snapshot() {
        let repo = InMemoryTableRepository::new();
        repo.create(draft("analytics.orders")).await.unwrap();
        repo.create(draft("analytics.customers")).await.unwrap();
        let tables = repo.list().await.unwrap();
        assert_eq!(tables.len(), 2);
    }
}
