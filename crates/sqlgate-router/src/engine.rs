use std::sync::atomic::{AtomicBool, Ordering};

use sqlgate_capability::{CapabilitySet, TableFormat};

/// A backing query engine known to the registry: its name, the
/// capabilities it implements, the formats it can read, its availability,
/// and a selection priority (lower numeric value = higher preference)
/// (spec §4.4).
pub struct Engine {
    pub name: String,
    pub capabilities: CapabilitySet,
    pub supported_formats: Vec<TableFormat>,
    pub priority: u32,
    available: AtomicBool,
}

impl Engine {
    pub fn new(
        name: impl Into<String>,
        capabilities: CapabilitySet,
        supported_formats: Vec<TableFormat>,
        priority: u32,
    ) -> Self {
        Engine {
            name: name.into(),
            capabilities,
            supported_formats,
            priority,
            available: AtomicBool::new(true),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn supports_format(&self, format: TableFormat) -> bool {
        self.supported_formats.contains(&format)
    }

    /// A snapshot view used in responses and error messages; `Engine`
    /// itself is not `Clone` because `AtomicBool` isn't, and the registry
    /// hands out shared references rather than copies.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            name: self.name.clone(),
            capabilities: self.capabilities,
            supported_formats: self.supported_formats.clone(),
            priority: self.priority,
            available: self.is_available(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineSnapshot {
    pub name: String,
    pub capabilities: CapabilitySet,
    pub supported_formats: Vec<TableFormat>,
    pub priority: u32,
    pub available: bool,
}

/// The default engine lineup described in spec §4.4's format-support
/// matrix: an embedded analytical engine, a distributed MPP engine,
/// Spark, and three cloud warehouses.
pub fn default_engines() -> Vec<Engine> {
    use TableFormat::*;
    vec![
        Engine::new(
            "embedded",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate
                | sqlgate_capability::Capability::Window,
            vec![Csv, Parquet, Orc, Delta, Iceberg],
            10,
        ),
        Engine::new(
            "mpp",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate
                | sqlgate_capability::Capability::Window
                | sqlgate_capability::Capability::TimeTravel
                | sqlgate_capability::Capability::PartitionPruning
                | sqlgate_capability::Capability::VersionQuery,
            vec![Iceberg, Delta, Hudi, Parquet, Orc],
            20,
        ),
        Engine::new(
            "spark",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate
                | sqlgate_capability::Capability::Window
                | sqlgate_capability::Capability::Cte
                | sqlgate_capability::Capability::TimeTravel
                | sqlgate_capability::Capability::VersionQuery
                | sqlgate_capability::Capability::SchemaEvolution
                | sqlgate_capability::Capability::PartitionPruning
                | sqlgate_capability::Capability::IncrementalQuery,
            vec![Iceberg, Delta, Hudi, Parquet, Orc, Csv],
            30,
        ),
        Engine::new(
            "snowflake",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate
                | sqlgate_capability::Capability::TimeTravel,
            vec![Iceberg, Parquet],
            40,
        ),
        Engine::new(
            "bigquery",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate
                | sqlgate_capability::Capability::TimeTravel,
            vec![Iceberg, Parquet],
            41,
        ),
        Engine::new(
            "redshift",
            sqlgate_capability::Capability::Read
                | sqlgate_capability::Capability::Filter
                | sqlgate_capability::Capability::Aggregate,
            vec![Iceberg, Parquet],
            42,
        ),
    ]
}

/// Format → preferred-engine table (spec §4.4 step 3).
pub fn preferred_engine_for_format(format: TableFormat) -> &'static str {
    match format {
        TableFormat::Iceberg => "mpp",
        TableFormat::Delta => "spark",
        TableFormat::Hudi => "spark",
        TableFormat::Parquet => "embedded",
        TableFormat::Orc => "mpp",
        TableFormat::Csv => "embedded",
        TableFormat::Unknown => "embedded",
    }
}
