use async_trait::async_trait;
use dashmap::DashMap;
use sqlgate_capability::Capability;

use crate::principal::Principal;

/// Maps `(role, table, capability) → allow` (spec §4.11). A principal is
/// authorized for `(table, capability)` iff any of its roles carries the
/// grant. Default-deny: a missing grant means "not authorized", and a
/// grant for one capability never implies another — holding `Read` on a
/// table says nothing about `TimeTravel` on the same table.
#[async_trait]
pub trait GrantStore: Send + Sync {
    async fn is_authorized(&self, principal: &Principal, table: &str, capability: Capability) -> bool;
}

/// An in-memory grant store keyed by `(role, table, capability)`.
/// Suitable for tests and single-node deployments; a SQL-backed store
/// would implement the same trait against a durable grants table.
#[derive(Default)]
pub struct InMemoryGrantStore {
    grants: DashMap<(String, String, Capability), ()>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        InMemoryGrantStore { grants: DashMap::new() }
    }

    pub fn grant(&self, role: impl Into<String>, table: impl Into<String>, capability: Capability) {
        self.grants.insert((role.into(), table.into(), capability), ());
    }

    pub fn revoke(&self, role: &str, table: &str, capability: Capability) {
        self.grants.remove(&(role.to_string(), table.to_string(), capability));
    }

    pub fn grant_all(&self, role: impl Into<String>, table: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) {
        let role = role.into();
        let table = table.into();
        for capability in capabilities {
            self.grants.insert((role.clone(), table.clone(), capability), ());
        }
    }
}

#[async_trait]
impl GrantStore for InMemoryGrantStore {
    async fn is_authorized(&self, principal: &Principal, table: &str, capability: Capability) -> bool {
        principal
            .roles
            .iter()
            .any(|role| self.grants.contains_key(&(role.clone(), table.to_string(), capability)))
    }
}

/// A grant store that authorizes every request; useful only for local
/// development and tests that are not exercising authorization itself.
#[derive(Default)]
pub struct AllowAllGrantStore;

#[async_trait]
impl GrantStore for AllowAllGrantStore {
    async fn is_authorized(&self, _principal: &Principal, _table: &str, _capability: Capability) -> bool {
        true
    }
}
