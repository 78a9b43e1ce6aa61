use async_trait::async_trait;
use sqlgate_common::Result;

use crate::model::{PhysicalSource, VirtualTable};
use sqlgate_capability::{CapabilitySet, ConstraintSet};

/// A draft of a [`VirtualTable`] submitted to `create`/`update`, before
/// timestamps are assigned. Mirrors the table-definition exchange format
/// of spec §6.
#[derive(Debug, Clone)]
pub struct TableDraft {
    pub name: String,
    pub description: Option<String>,
    pub sources: Vec<PhysicalSource>,
    pub capabilities: CapabilitySet,
    pub constraints: ConstraintSet,
}

/// The sole authority for virtual-table metadata (spec §4.2).
///
/// Contracts every implementation must uphold:
/// - `create` fails with `AlreadyExists` on a duplicate name, `Invalid` on
///   any invariant violation; on success persists `created_at = updated_at
///   = now`.
/// - `update` fails with `NotFound` if the row is absent, preserves
///   `created_at`, advances `updated_at`, re-validates invariants.
/// - `get` returns an owned copy; callers never observe later mutations
///   through a previously returned value.
/// - `list` returns an internally consistent snapshot; order is
///   unspecified.
/// - `check_connectivity` probes the backing store and fails with
///   `RepositoryUnavailable` (surfaced as `Unavailable` in spec wording).
/// - readers observe a consistent point-in-time view (no torn reads);
///   writes are serialized per key; cross-key writes may interleave.
#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn create(&self, draft: TableDraft) -> Result<VirtualTable>;
    async fn get(&self, name: &str) -> Result<VirtualTable>;
    async fn update(&self, draft: TableDraft) -> Result<VirtualTable>;
    async fn delete(&self, name: &str) -> Result<()>;
    async fn list(&self) -> Result<Vec<VirtualTable>>;
    async fn exists(&self, name: &str) -> Result<bool>;
    async fn check_connectivity(&self) -> Result<()>;
}
