//! Rewrites the canonical `FOR SYSTEM_TIME AS OF` / `FOR VERSION AS OF`
//! clause into the dialect of the chosen engine (spec §4.6, component
//! C6). The classifier (component C3) recognizes exactly one temporal
//! grammar so the rest of the pipeline stays format-independent until
//! this last translation step (spec §9).

use once_cell::sync::Lazy;
use regex::Regex;
use sqlgate_capability::TableFormat;
use sqlgate_common::GatewayError;

/// The chosen engine's canonical name, as registered in
/// [`sqlgate_router`]'s engine registry. Kept as a plain string here
/// (rather than an enum shared with the router) so this crate stays
/// decoupled from routing concerns; the name is an opaque key into the
/// dialect matrix below.
pub type EngineName = str;

static TIMESTAMP_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FOR\s+SYSTEM_TIME\s+AS\s+OF\s+'([^']*)'").unwrap());

static VERSION_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FOR\s+VERSION\s+AS\s+OF\s+(\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Timestamp,
    Version,
}

/// One dialect rendering for a single (format, engine, clause-kind)
/// combination in the matrix of spec §4.6. Returns `None` when the
/// combination is a hard `NotSupported`.
fn dialect(format: TableFormat, engine: &str, clause: Clause) -> Option<fn(&str) -> String> {
    use Clause::*;
    use TableFormat::*;

    let engine_lower = engine.to_ascii_lowercase();
    match (format, engine_lower.as_str(), clause) {
        (Iceberg, "mpp", Timestamp) => {
            Some(|ts| format!("FOR TIMESTAMP AS OF TIMESTAMP '{ts}'"))
        }
        (Iceberg, "mpp", Version) => Some(|v| format!("FOR SYSTEM_VERSION AS OF {v}")),
        (Iceberg, "spark", Timestamp) => Some(|ts| format!("TIMESTAMP AS OF '{ts}'")),
        (Iceberg, "spark", Version) => Some(|v| format!("VERSION AS OF {v}")),
        (Iceberg, "embedded", Timestamp) => Some(|ts| format!("AT TIMESTAMP '{ts}'")),
        (Iceberg, "embedded", Version) => None,

        (Delta, "spark", Timestamp) => Some(|ts| format!("TIMESTAMP AS OF '{ts}'")),
        (Delta, "spark", Version) => Some(|v| format!("VERSION AS OF {v}")),
        (Delta, "embedded", Timestamp) => Some(|ts| format!("AT TIMESTAMP '{ts}'")),
        (Delta, "embedded", Version) => None,

        (Hudi, "spark", Timestamp) => Some(|ts| format!("TIMESTAMP AS OF '{ts}'")),
        (Hudi, "spark", Version) => Some(|v| format!("VERSION AS OF {v}")),

        (_, "snowflake", Timestamp) => Some(|ts| format!("AT(TIMESTAMP => '{ts}'::TIMESTAMP)")),
        (_, "snowflake", Version) => None,

        (_, "bigquery", Timestamp) => {
            Some(|ts| format!("FOR SYSTEM_TIME AS OF TIMESTAMP '{ts}'"))
        }
        (_, "bigquery", Version) => None,

        (_, "redshift", _) => None,

        _ => None,
    }
}

/// Rewrites every canonical temporal clause in `sql` into the dialect of
/// `(format, engine)`. Fails with `NotSupported` for an unsupported
/// combination rather than passing the canonical clause through silently
/// (spec §4.6).
pub fn rewrite(sql: &str, format: TableFormat, engine: &str) -> Result<String, GatewayError> {
    let mut output = sql.to_string();

    if TIMESTAMP_CLAUSE.is_match(&output) {
        let render = dialect(format, engine, Clause::Timestamp).ok_or_else(|| {
            GatewayError::NotSupported {
                format: format.as_str().to_string(),
                engine: engine.to_string(),
                feature: "time-travel (FOR SYSTEM_TIME AS OF)".to_string(),
            }
        })?;
        output = TIMESTAMP_CLAUSE
            .replace_all(&output, |caps: &regex::Captures| render(&caps[1]))
            .into_owned();
    }

    if VERSION_CLAUSE.is_match(&output) {
        let render = dialect(format, engine, Clause::Version).ok_or_else(|| {
            GatewayError::NotSupported {
                format: format.as_str().to_string(),
                engine: engine.to_string(),
                feature: "version query (FOR VERSION AS OF)".to_string(),
            }
        })?;
        output = VERSION_CLAUSE
            .replace_all(&output, |caps: &regex::Captures| render(&caps[1]))
            .into_owned();
    }

    Ok(output)
}
