use std::fmt;

/// The closed set of rejections and failures the gateway can produce.
///
/// Every variant maps to exactly one stable `kind()` string and one HTTP
/// status code; message text is deterministic for identical inputs so
/// callers can rely on it (spec §7).
#[derive(Debug, Clone, thiserror::Error, serde::Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum GatewayError {
    // -- Parsing --
    #[error("the query was empty")]
    EmptyQuery,

    #[error("only a single statement is accepted per request")]
    MultipleStatements,

    #[error("unsupported SQL construct: {detail}")]
    Unsupported { detail: String },

    #[error("write statements are not allowed: {op}")]
    WriteNotAllowed { op: String },

    // -- Resolution --
    #[error("table not found: {name}")]
    TableNotFound { name: String },

    #[error("invalid table name: {name}")]
    InvalidTableName { name: String },

    // -- Authentication / Authorization --
    #[error("missing or invalid credentials")]
    Unauthenticated,

    #[error("principal is not authorized for {capability} on {table}")]
    AuthorizationDenied { table: String, capability: String },

    // -- Capability / Constraint --
    #[error("table {table} does not support required capabilities: {missing:?}")]
    UnsupportedByTable {
        table: String,
        missing: Vec<String>,
    },

    #[error("constraint violated: {kind}")]
    Constrained { kind: String },

    #[error("snapshot-consistent tables require identical temporal pins: {tables:?} pinned to {timestamps:?}")]
    SnapshotInconsistent {
        tables: Vec<String>,
        timestamps: Vec<String>,
    },

    // -- Routing --
    #[error("no engine supports required capabilities: {required:?}")]
    NoEngineForCapabilities { required: Vec<String> },

    #[error("no engine supports format {format} with required capabilities: {required:?}")]
    NoEngineForFormat { format: String, required: Vec<String> },

    #[error("explicitly pinned engine {engine} is not registered or unavailable")]
    ExplicitEngineUnavailable { engine: String },

    #[error("plan references tables resolving to more than one engine: {engines:?}")]
    CrossEngine { engines: Vec<String> },

    // -- Rewriting --
    #[error("{feature} is not supported for {format} on {engine}")]
    NotSupported {
        format: String,
        engine: String,
        feature: String,
    },

    // -- Adapter --
    #[error("adapter unavailable: {name}")]
    AdapterUnavailable { name: String },

    #[error("engine {name} reported an error: {detail}")]
    EngineError { name: String, detail: String },

    #[error("request was cancelled")]
    Cancelled,

    #[error("request exceeded its deadline")]
    Timeout,

    // -- Repository --
    #[error("a row named {name} already exists")]
    AlreadyExists { name: String },

    #[error("no row named {name} exists")]
    NotFound { name: String },

    #[error("invalid input: {reason}")]
    Invalid { reason: String },

    #[error("unknown capability {input:?}, expected one of {valid_set:?}")]
    InvalidCapability {
        input: String,
        valid_set: Vec<String>,
    },

    // -- Infrastructure --
    #[error("repository is unavailable")]
    RepositoryUnavailable,

    #[error("audit logger is unavailable")]
    AuditUnavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable machine-readable identifier, used as the JSON `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::EmptyQuery => "empty_query",
            GatewayError::MultipleStatements => "multiple_statements",
            GatewayError::Unsupported { .. } => "unsupported",
            GatewayError::WriteNotAllowed { .. } => "write_not_allowed",
            GatewayError::TableNotFound { .. } => "table_not_found",
            GatewayError::InvalidTableName { .. } => "invalid_table_name",
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::AuthorizationDenied { .. } => "authorization_denied",
            GatewayError::UnsupportedByTable { .. } => "unsupported_by_table",
            GatewayError::Constrained { .. } => "constrained",
            GatewayError::SnapshotInconsistent { .. } => "snapshot_inconsistent",
            GatewayError::NoEngineForCapabilities { .. } => "no_engine_for_capabilities",
            GatewayError::NoEngineForFormat { .. } => "no_engine_for_format",
            GatewayError::ExplicitEngineUnavailable { .. } => "explicit_engine_unavailable",
            GatewayError::CrossEngine { .. } => "cross_engine",
            GatewayError::NotSupported { .. } => "not_supported",
            GatewayError::AdapterUnavailable { .. } => "adapter_unavailable",
            GatewayError::EngineError { .. } => "engine_error",
            GatewayError::Cancelled => "cancelled",
            GatewayError::Timeout => "timeout",
            GatewayError::AlreadyExists { .. } => "already_exists",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::Invalid { .. } => "invalid",
            GatewayError::InvalidCapability { .. } => "invalid_capability",
            GatewayError::RepositoryUnavailable => "repository_unavailable",
            GatewayError::AuditUnavailable => "audit_unavailable",
            GatewayError::Internal(_) => "internal",
        }
    }

    /// HTTP status code this error surfaces as, per spec §6/§7.
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::Unauthenticated => 401,
            GatewayError::TableNotFound { .. } | GatewayError::NotFound { .. } => 404,
            GatewayError::AlreadyExists { .. } => 409,
            GatewayError::RepositoryUnavailable | GatewayError::AuditUnavailable => 503,
            GatewayError::AdapterUnavailable { .. } => 503,
            GatewayError::EngineError { .. } => 500,
            GatewayError::Internal(_) => 500,
            GatewayError::Timeout => 504,
            _ => 400,
        }
    }

    /// An actionable suggestion for the caller, where one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            GatewayError::TableNotFound { .. } => Some("run catalog sync and retry"),
            GatewayError::InvalidTableName { .. } => {
                Some("qualify the table as schema.table")
            }
            GatewayError::Unauthenticated => Some("provide a valid bearer token"),
            GatewayError::AuthorizationDenied { .. } => {
                Some("request a role grant for this table and capability")
            }
            GatewayError::WriteNotAllowed { .. } => {
                Some("this generation only serves read-only SELECT statements")
            }
            GatewayError::SnapshotInconsistent { .. } => {
                Some("pin every snapshot-consistent table to the same FOR SYSTEM_TIME AS OF value")
            }
            GatewayError::NoEngineForCapabilities { .. }
            | GatewayError::NoEngineForFormat { .. } => {
                Some("register an engine that supports the required capabilities")
            }
            GatewayError::CrossEngine { .. } => {
                Some("pin all referenced tables to the same engine; cross-engine federation is unsupported")
            }
            GatewayError::RepositoryUnavailable => Some("check repository connectivity"),
            _ => None,
        }
    }
}

/// A structured body for rejected/errored HTTP responses (spec §6).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub reason: String,
    pub suggestion: Option<&'static str>,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        ErrorBody {
            error: err.kind(),
            reason: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.reason)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stable_for_identical_inputs() {
        let a = GatewayError::TableNotFound { name: "analytics.orders".into() };
        let b = GatewayError::TableNotFound { name: "analytics.orders".into() };
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn status_mapping_matches_spec() {
        assert_eq!(GatewayError::Unauthenticated.http_status(), 401);
        assert_eq!(GatewayError::TableNotFound { name: "x".into() }.http_status(), 404);
        assert_eq!(GatewayError::AlreadyExists { name: "x".into() }.http_status(), 409);
        assert_eq!(GatewayError::RepositoryUnavailable.http_status(), 503);
        assert_eq!(GatewayError::Internal("boom".into()).http_status(), 500);
        assert_eq!(GatewayError::EmptyQuery.http_status(), 400);
    }

    #[test]
    fn table_not_found_carries_a_suggestion() {
        let err = GatewayError::TableNotFound { name: "x".into() };
        assert!(err.suggestion().is_some());
    }
}
