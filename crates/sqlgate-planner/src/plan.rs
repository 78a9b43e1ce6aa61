use std::collections::HashMap;

use sqlgate_auth::{GrantStore, Principal};
use sqlgate_capability::{Capability, CapabilitySet};
use sqlgate_catalog::{TableRepository, VirtualTable};
use sqlgate_common::{GatewayError, Result};
use sqlgate_router::EngineRegistry;
use sqlgate_sql::{Classification, Operation};

/// The output of [`plan`]: everything an adapter needs to execute a
/// classified query, resolved against one snapshot of the catalog and
/// authorization state (spec §4.7).
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub classification: Classification,
    pub resolved_tables: Vec<VirtualTable>,
    pub required_capabilities: CapabilitySet,
    pub engine: String,
    pub temporal_pins: HashMap<String, String>,
}

fn required_capabilities(classification: &Classification) -> CapabilitySet {
    let mut required = CapabilitySet::from(Capability::Read);
    if classification.has_temporal {
        required |= Capability::TimeTravel;
    }
    required
}

fn capability_list(set: CapabilitySet) -> Vec<String> {
    set.iter().map(|c| c.as_str().to_string()).collect()
}

/// Resolves, authorizes, and routes a classified query into an
/// [`ExecutionPlan`]. Pure with respect to the repository: identical
/// `(classification, repository snapshot, authorization snapshot)` always
/// yields an identical plan or an identical error (spec §4.7).
pub async fn plan(
    classification: Classification,
    principal: &Principal,
    repository: &dyn TableRepository,
    grants: &dyn GrantStore,
    engines: &EngineRegistry,
) -> Result<ExecutionPlan> {
    // Step 1: resolve every referenced table.
    let mut resolved = Vec::with_capacity(classification.tables.len());
    for name in &classification.tables {
        sqlgate_catalog::validate_qualified_name(name)?;
        resolved.push(repository.get(name).await?);
    }

    // Step 2: required capability set, derived solely from classifier output.
    let required = required_capabilities(&classification);

    // Step 3: authorize per (principal, table, capability).
    for table in &resolved {
        for capability in required.iter() {
            if !grants.is_authorized(principal, &table.name, capability).await {
                return Err(GatewayError::AuthorizationDenied {
                    table: table.name.clone(),
                    capability: capability.as_str().to_string(),
                });
            }
        }
    }

    // Step 4: every resolved table must itself support the required set.
    for table in &resolved {
        let missing = sqlgate_capability::missing(table.capabilities, required);
        if !missing.is_empty() {
            return Err(GatewayError::UnsupportedByTable {
                table: table.name.clone(),
                missing: capability_list(missing),
            });
        }
    }

    // Step 5: READ_ONLY backstop.
    if classification.operation != Operation::Select {
        for table in &resolved {
            if table.is_read_only() {
                return Err(GatewayError::Constrained { kind: "READ_ONLY".to_string() });
            }
        }
    }

    // Step 6: SNAPSHOT_CONSISTENT enforcement.
    let snapshot_consistent: Vec<&VirtualTable> =
        resolved.iter().filter(|t| t.is_snapshot_consistent()).collect();
    if !snapshot_consistent.is_empty() {
        if !classification.has_temporal {
            return Err(GatewayError::SnapshotInconsistent {
                tables: snapshot_consistent.iter().map(|t| t.name.clone()).collect(),
                timestamps: Vec::new(),
            });
        }
        let pins: Vec<Option<&String>> = snapshot_consistent
            .iter()
            .map(|t| classification.per_table_temporal.get(&t.name))
            .collect();
        let first = pins.first().copied().flatten();
        let all_equal = pins.iter().all(|p| *p == first);
        if !all_equal {
            return Err(GatewayError::SnapshotInconsistent {
                tables: snapshot_consistent.iter().map(|t| t.name.clone()).collect(),
                timestamps: pins.into_iter().map(|p| p.cloned().unwrap_or_default()).collect(),
            });
        }
    }

    // Step 7: dominant format + explicit pin reconciliation, then routing.
    let dominant_format = resolved
        .first()
        .map(|t| t.dominant_format())
        .unwrap_or(sqlgate_capability::TableFormat::Unknown);

    let mut pinned_engines: Vec<&str> =
        resolved.iter().filter_map(|t| t.explicit_engine()).collect();
    pinned_engines.sort_unstable();
    pinned_engines.dedup();
    let explicit_pin = match pinned_engines.as_slice() {
        [] => None,
        [single] => Some(*single),
        multiple => {
            return Err(GatewayError::CrossEngine {
                engines: multiple.iter().map(|e| e.to_string()).collect(),
            });
        }
    };

    let engine = sqlgate_router::select(engines, required, dominant_format, explicit_pin)?;

    // Step 8: produce the plan.
    let temporal_pins = classification
        .per_table_temporal
        .iter()
        .filter(|(name, _)| resolved.iter().any(|t| &t.name == *name))
        .map(|(name, ts)| (name.clone(), ts.clone()))
        .collect();

    Ok(ExecutionPlan { classification, resolved_tables: resolved, required_capabilities: required, engine, temporal_pins })
}
