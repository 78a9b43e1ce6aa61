use serde::{Deserialize, Serialize};

/// A single returned row, represented as an ordered list of column values
/// rendered to their JSON-ish textual form. The gateway never interprets
/// row contents; it only ever forwards what the adapter returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row(pub Vec<serde_json::Value>);

/// The result of a successful `Execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub rows_scanned: u64,
}

impl ExecResult {
    pub fn empty(columns: Vec<String>) -> Self {
        ExecResult { columns, rows: Vec::new(), rows_scanned: 0 }
    }
}
