use chrono::{DateTime, Utc};
use sqlgate_capability::{Capability, CapabilitySet, Constraint, ConstraintSet, TableFormat};
use sqlgate_common::GatewayError;

/// A single physical backing of a [`VirtualTable`]: a format, a location
/// URI, and an optional explicit engine pin (spec §3). A table may carry
/// more than one source (different formats/locations of the same logical
/// data); the planner uses the first source's format as the dominant
/// format unless an explicit pin overrides it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalSource {
    pub format: TableFormat,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

impl PhysicalSource {
    pub fn new(format: TableFormat, location: impl Into<String>) -> Self {
        PhysicalSource { format, location: location.into(), engine: None }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if self.location.trim().is_empty() {
            return Err(GatewayError::Invalid {
                reason: "source location must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// The central entity of the gateway's metadata model (spec §3).
///
/// Invariants enforced at construction and on every mutation:
/// - `sources` is non-empty and each source validates.
/// - `capabilities` contains [`Capability::Read`].
/// - [`Capability::TimeTravel`] implies the first source's format is a
///   lakehouse format.
/// - `name` is `schema.table`: exactly two non-empty dotted segments drawn
///   from the identifier charset.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VirtualTable {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sources: Vec<PhysicalSource>,
    pub capabilities: CapabilitySet,
    pub constraints: ConstraintSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Validates the `schema.table` qualified-name grammar (spec §3, §4.3).
/// Exactly two non-empty dotted segments, identifier charset, no further
/// dots.
pub fn validate_qualified_name(name: &str) -> Result<(), GatewayError> {
    let segments: Vec<&str> = name.split('.').collect();
    let valid = segments.len() == 2
        && segments.iter().all(|s| !s.is_empty() && s.chars().all(is_identifier_char));
    if valid {
        Ok(())
    } else {
        Err(GatewayError::InvalidTableName { name: name.to_string() })
    }
}

impl VirtualTable {
    /// Constructs a new table with `created_at == updated_at == now`,
    /// validating every invariant in spec §3. Used by
    /// [`crate::repository::TableRepository::create`].
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        sources: Vec<PhysicalSource>,
        capabilities: CapabilitySet,
        constraints: ConstraintSet,
        now: DateTime<Utc>,
    ) -> Result<Self, GatewayError> {
        let table = VirtualTable {
            name: name.into(),
            description,
            sources,
            capabilities,
            constraints,
            created_at: now,
            updated_at: now,
        };
        table.validate()?;
        Ok(table)
    }

    /// Re-checks every invariant; called by the repository on Create and
    /// Update so no write can leave a table in a violating state.
    pub fn validate(&self) -> Result<(), GatewayError> {
        validate_qualified_name(&self.name)?;

        if self.sources.is_empty() {
            return Err(GatewayError::Invalid {
                reason: format!("table {} must declare at least one source", self.name),
            });
        }
        for source in &self.sources {
            source.validate()?;
        }

        if !self.capabilities.contains(Capability::Read) {
            return Err(GatewayError::Invalid {
                reason: format!("table {} must declare the READ capability", self.name),
            });
        }

        if self.capabilities.contains(Capability::TimeTravel) {
            let dominant_format = self.sources[0].format;
            if !dominant_format.is_lakehouse() {
                return Err(GatewayError::Invalid {
                    reason: format!(
                        "table {} declares TIME_TRAVEL but its dominant format {} is not a lakehouse format",
                        self.name,
                        dominant_format.as_str()
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn is_snapshot_consistent(&self) -> bool {
        self.constraints.contains(Constraint::SnapshotConsistent)
    }

    pub fn is_read_only(&self) -> bool {
        self.constraints.contains(Constraint::ReadOnly)
    }

    /// The format used to drive engine routing: the first source's format,
    /// unless an explicit engine pin is present on any source (spec §4.7
    /// step 7).
    pub fn dominant_format(&self) -> TableFormat {
        self.sources[0].format
    }

    pub fn explicit_engine(&self) -> Option<&str> {
        self.sources.iter().find_map(|s| s.engine.as_deref())
    }

    /// Applies an update, preserving `created_at` and advancing
    /// `updated_at` monotonically (spec §3, §4.2).
    pub fn apply_update(
        &self,
        description: Option<String>,
        sources: Vec<PhysicalSource>,
        capabilities: CapabilitySet,
        constraints: ConstraintSet,
        now: DateTime<Utc>,
    ) -> Result<Self, GatewayError> {
        let updated = VirtualTable {
            name: self.name.clone(),
            description,
            sources,
            capabilities,
            constraints,
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        };
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn orders() -> VirtualTable {
        VirtualTable::new(
            "analytics.orders",
            None,
            vec![PhysicalSource::new(TableFormat::Delta, "s3://bucket/orders")],
            Capability::Read | Capability::TimeTravel,
            ConstraintSet::empty(),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn valid_table_round_trips() {
        let table = orders();
        assert_eq!(table.created_at, table.updated_at);
        assert!(table.capabilities.contains(Capability::Read));
    }

    #[test]
    fn rejects_missing_read_capability() {
        let err = VirtualTable::new(
            "analytics.orders",
            None,
            vec![PhysicalSource::new(TableFormat::Parquet, "s3://x")],
            Capability::TimeTravel.into(),
            ConstraintSet::empty(),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid { .. }));
    }

    #[test]
    fn rejects_empty_sources() {
        let err = VirtualTable::new(
            "analytics.orders",
            None,
            vec![],
            Capability::Read.into(),
            ConstraintSet::empty(),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid { .. }));
    }

    #[test]
    fn rejects_time_travel_on_non_lakehouse_format() {
        let err = VirtualTable::new(
            "analytics.orders",
            None,
            vec![PhysicalSource::new(TableFormat::Csv, "file:///x.csv")],
            Capability::Read | Capability::TimeTravel,
            ConstraintSet::empty(),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid { .. }));
    }

    #[test]
    fn rejects_unqualified_or_over_qualified_name() {
        assert!(validate_qualified_name("orders").is_err());
        assert!(validate_qualified_name("a.b.c").is_err());
        assert!(validate_qualified_name("analytics.orders").is_ok());
        assert!(validate_qualified_name("analytics.").is_err());
    }

    #[test]
    fn update_preserves_created_at_and_advances_updated_at() {
        let table = orders();
        let later = table.created_at + chrono::Duration::seconds(5);
        let updated = table
            .apply_update(
                Some("renamed".to_string()),
                table.sources.clone(),
                table.capabilities,
                table.constraints,
                later,
            )
            .unwrap();
        assert_eq!(updated.created_at, table.created_at);
        assert_eq!(updated.updated_at, later);
    }
}
