use chrono::{DateTime, Utc};
use sqlgate_common::QueryId;

/// Whether a query was accepted into planning/execution or rejected at
/// some gate, and if rejected, the stable [`sqlgate_common::GatewayError::kind`]
/// that rejected it. Never carries the error's free-text reason — that
/// text can embed identifiers or literal values the summary must not
/// retain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected { reason_kind: &'static str },
}

/// One audited request. Deliberately narrow: it never stores raw SQL
/// text, literal values, or caller-identifying fields beyond the
/// principal id, so a summary built from many entries cannot leak any of
/// those either (spec §4.9).
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub query_id: QueryId,
    pub principal_id: String,
    pub tables: Vec<String>,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn accepted(query_id: QueryId, principal_id: impl Into<String>, tables: Vec<String>, recorded_at: DateTime<Utc>) -> Self {
        AuditEntry { query_id, principal_id: principal_id.into(), tables, outcome: Outcome::Accepted, recorded_at }
    }

    pub fn rejected(
        query_id: QueryId,
        principal_id: impl Into<String>,
        tables: Vec<String>,
        reason_kind: &'static str,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        AuditEntry { query_id, principal_id: principal_id.into(), tables, outcome: Outcome::Rejected { reason_kind }, recorded_at }
    }
}
