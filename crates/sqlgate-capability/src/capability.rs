use enumflags2::{bitflags, BitFlags};
use sqlgate_common::GatewayError;

/// A closed enum of operations a virtual table may support (spec §3).
/// Parsing is case-insensitive with surrounding whitespace stripped;
/// unknown values fail with the full valid set listed.
#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Read,
    TimeTravel,
    Aggregate,
    Filter,
    Window,
    Cte,
    SnapshotQuery,
    VersionQuery,
    SchemaEvolution,
    PartitionPruning,
    IncrementalQuery,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Read,
        Capability::TimeTravel,
        Capability::Aggregate,
        Capability::Filter,
        Capability::Window,
        Capability::Cte,
        Capability::SnapshotQuery,
        Capability::VersionQuery,
        Capability::SchemaEvolution,
        Capability::PartitionPruning,
        Capability::IncrementalQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Read => "READ",
            Capability::TimeTravel => "TIME_TRAVEL",
            Capability::Aggregate => "AGGREGATE",
            Capability::Filter => "FILTER",
            Capability::Window => "WINDOW",
            Capability::Cte => "CTE",
            Capability::SnapshotQuery => "SNAPSHOT_QUERY",
            Capability::VersionQuery => "VERSION_QUERY",
            Capability::SchemaEvolution => "SCHEMA_EVOLUTION",
            Capability::PartitionPruning => "PARTITION_PRUNING",
            Capability::IncrementalQuery => "INCREMENTAL_QUERY",
        }
    }

    /// Parses a single capability token, case-insensitive, trimmed.
    pub fn parse(input: &str) -> Result<Capability, GatewayError> {
        let trimmed = input.trim();
        for candidate in Capability::ALL {
            if candidate.as_str().eq_ignore_ascii_case(trimmed) {
                return Ok(candidate);
            }
        }
        Err(GatewayError::InvalidCapability {
            input: input.to_string(),
            valid_set: Capability::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        })
    }
}

/// A set of [`Capability`] values with the usual set algebra.
pub type CapabilitySet = BitFlags<Capability>;

/// Parses a whole set of capability tokens.
pub fn parse_capability_set<I, S>(inputs: I) -> Result<CapabilitySet, GatewayError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = CapabilitySet::empty();
    for input in inputs {
        set |= Capability::parse(input.as_ref())?;
    }
    Ok(set)
}

/// The common `{READ, ...required}` capability sets are compared with
/// subset tests; this is a thin named wrapper used throughout the planner
/// for readability at call sites.
pub fn has_all(have: CapabilitySet, required: CapabilitySet) -> bool {
    have.contains(required)
}

/// The capabilities present in `required` but absent from `have`.
pub fn missing(have: CapabilitySet, required: CapabilitySet) -> CapabilitySet {
    required & !have
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_trims_whitespace() {
        assert_eq!(Capability::parse(" read ").unwrap(), Capability::Read);
        assert_eq!(Capability::parse("Time_Travel").unwrap(), Capability::TimeTravel);
    }

    #[test]
    fn parse_rejects_unknown_value_with_valid_set() {
        let err = Capability::parse("bogus").unwrap_err();
        match err {
            GatewayError::InvalidCapability { input, valid_set } => {
                assert_eq!(input, "bogus");
                assert_eq!(valid_set.len(), Capability::ALL.len());
            }
            _ => panic!("expected InvalidCapability"),
        }
    }

    #[test]
    fn intersection_returns_common_capabilities() {
        let a: CapabilitySet = Capability::Read | Capability::TimeTravel | Capability::Aggregate;
        let b: CapabilitySet = Capability::Read | Capability::Aggregate | Capability::Window;
        let common = a & b;
        assert!(common.contains(Capability::Read));
        assert!(common.contains(Capability::Aggregate));
        assert!(!common.contains(Capability::TimeTravel));
        assert!(!common.contains(Capability::Window));
    }

    #[test]
    fn missing_reports_only_unmet_requirements() {
        let have: CapabilitySet = Capability::Read.into();
        let required: CapabilitySet = Capability::Read | Capability::TimeTravel;
        let gap = missing(have, required);
        assert_eq!(gap, CapabilitySet::from(Capability::TimeTravel));
    }
}
