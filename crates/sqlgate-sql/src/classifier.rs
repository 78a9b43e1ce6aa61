use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlgate_common::GatewayError;

/// The statement kind the classifier recognized (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "SELECT",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Other => "OTHER",
        }
    }
}

/// The deterministic output of [`classify`]: the statement's operation,
/// its referenced base tables in order of first appearance, and any
/// canonical temporal pin (spec §4.3).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub operation: Operation,
    pub tables: Vec<String>,
    pub has_temporal: bool,
    pub temporal_timestamp: Option<String>,
    pub per_table_temporal: HashMap<String, String>,
}

static TABLE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:FROM|JOIN)\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?)")
        .unwrap()
});

static TEMPORAL_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFOR\s+SYSTEM_TIME\s+AS\s+OF\s+'([^']*)'").unwrap());

static TEMPORAL_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFOR\s+VERSION\s+AS\s+OF\s+(\d+)").unwrap());

static NEXT_STOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:FROM|JOIN|WHERE|GROUP\s+BY|ORDER\s+BY|UNION|LIMIT)\b|;").unwrap()
});

static FIRST_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*([A-Za-z_]+)").unwrap());

static WITH_CTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*WITH\b").unwrap());

/// Replaces the contents of single-quoted string literals with `x`,
/// preserving length and the surrounding quotes. Used only to make
/// statement-splitting and keyword-detection immune to stray `;`/keyword
/// text inside literals; temporal-clause extraction runs on the original
/// text since it must recover the literal timestamp verbatim.
fn mask_string_literals(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut in_string = false;
    for c in sql.chars() {
        if c == '\'' {
            in_string = !in_string;
            out.push(c);
        } else if in_string {
            out.push('x');
        } else {
            out.push(c);
        }
    }
    out
}

fn classify_operation(masked: &str) -> Operation {
    match FIRST_KEYWORD.captures(masked) {
        Some(caps) => match caps[1].to_ascii_uppercase().as_str() {
            "SELECT" => Operation::Select,
            "INSERT" => Operation::Insert,
            "UPDATE" => Operation::Update,
            "DELETE" => Operation::Delete,
            _ => Operation::Other,
        },
        None => Operation::Other,
    }
}

/// Finds every base table reference and its optional canonical temporal
/// pin, in order of first appearance. See module docs for the scanning
/// strategy.
fn extract_tables_and_pins(sql: &str) -> (Vec<String>, HashMap<String, String>) {
    let mut tables = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut pins = HashMap::new();

    for caps in TABLE_REF.captures_iter(sql) {
        let whole = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str().to_string();

        if seen.insert(name.clone()) {
            tables.push(name.clone());
        }

        // Look only at the clause immediately trailing this reference, up
        // to the next clause-introducing keyword, for its temporal pin.
        let segment_start = whole.end();
        let stop = NEXT_STOP
            .find_at(sql, segment_start)
            .map(|m| m.start())
            .unwrap_or(sql.len());
        let segment = &sql[segment_start..stop];

        if let Some(caps) = TEMPORAL_TIMESTAMP.captures(segment) {
            pins.insert(name.clone(), caps[1].to_string());
        } else if let Some(caps) = TEMPORAL_VERSION.captures(segment) {
            pins.insert(name, caps[1].to_string());
        }
    }

    (tables, pins)
}

/// Classifies a single SQL statement (spec §4.3).
///
/// Deterministic: identical input always produces byte-identical output,
/// including the order of `tables`. Multi-statement input, non-`SELECT`
/// statements, empty input, and unsupported constructs (CTEs; anything
/// the scanner cannot confidently classify) are rejected rather than
/// mis-parsed.
pub fn classify(sql: &str) -> Result<Classification, GatewayError> {
    if sql.trim().is_empty() {
        return Err(GatewayError::EmptyQuery);
    }

    let masked = mask_string_literals(sql);
    let trimmed_masked = masked.trim_end().trim_end_matches(';');

    let statement_count = trimmed_masked
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .count();
    if statement_count > 1 {
        return Err(GatewayError::MultipleStatements);
    }

    if WITH_CTE.is_match(&masked) {
        return Err(GatewayError::Unsupported { detail: "CTE (WITH clause)".to_string() });
    }

    let operation = classify_operation(&masked);
    match operation {
        Operation::Insert => return Err(GatewayError::WriteNotAllowed { op: "INSERT".to_string() }),
        Operation::Update => return Err(GatewayError::WriteNotAllowed { op: "UPDATE".to_string() }),
        Operation::Delete => return Err(GatewayError::WriteNotAllowed { op: "DELETE".to_string() }),
        Operation::Other => {
            return Err(GatewayError::Unsupported {
                detail: "only SELECT statements are classified".to_string(),
            })
        }
        Operation::Select => {}
    }

    let (tables, per_table_temporal) = extract_tables_and_pins(sql);

    // The canonical timestamp surfaced at top level is the first per-table
    // pin found, in table order; callers needing per-table pins use the
    // map directly (required for SNAPSHOT_CONSISTENT cross-checking).
    let temporal_timestamp = tables
        .iter()
        .find_map(|t| per_table_temporal.get(t))
        .cloned();
    let has_temporal = temporal_timestamp.is_some();

    Ok(Classification {
        operation,
        tables,
        has_temporal,
        temporal_timestamp,
        per_table_temporal,
    })
}
