use enumflags2::{bitflags, BitFlags};
use sqlgate_common::GatewayError;

/// A closed enum of restrictions that override capabilities (spec §3).
/// Constraints always win when they conflict with a capability.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    ReadOnly,
    SnapshotConsistent,
}

impl Constraint {
    pub const ALL: [Constraint; 2] = [Constraint::ReadOnly, Constraint::SnapshotConsistent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::ReadOnly => "READ_ONLY",
            Constraint::SnapshotConsistent => "SNAPSHOT_CONSISTENT",
        }
    }

    pub fn parse(input: &str) -> Result<Constraint, GatewayError> {
        let trimmed = input.trim();
        for candidate in Constraint::ALL {
            if candidate.as_str().eq_ignore_ascii_case(trimmed) {
                return Ok(candidate);
            }
        }
        Err(GatewayError::InvalidCapability {
            input: input.to_string(),
            valid_set: Constraint::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        })
    }
}

pub type ConstraintSet = BitFlags<Constraint>;

pub fn parse_constraint_set<I, S>(inputs: I) -> Result<ConstraintSet, GatewayError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = ConstraintSet::empty();
    for input in inputs {
        set |= Constraint::parse(input.as_ref())?;
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_values() {
        assert_eq!(Constraint::parse("read_only").unwrap(), Constraint::ReadOnly);
        assert_eq!(
            Constraint::parse("SNAPSHOT_CONSISTENT").unwrap(),
            Constraint::SnapshotConsistent
        );
    }

    #[test]
    fn parse_set_rejects_first_bad_token() {
        let err = parse_constraint_set(["read_only", "bogus"]).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCapability { .. }));
    }
}
