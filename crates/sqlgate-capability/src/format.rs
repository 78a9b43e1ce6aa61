use sqlgate_common::GatewayError;

/// A closed enum of physical table formats (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableFormat {
    Iceberg,
    Delta,
    Hudi,
    Parquet,
    Orc,
    Csv,
    Unknown,
}

impl TableFormat {
    pub const ALL: [TableFormat; 7] = [
        TableFormat::Iceberg,
        TableFormat::Delta,
        TableFormat::Hudi,
        TableFormat::Parquet,
        TableFormat::Orc,
        TableFormat::Csv,
        TableFormat::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Iceberg => "ICEBERG",
            TableFormat::Delta => "DELTA",
            TableFormat::Hudi => "HUDI",
            TableFormat::Parquet => "PARQUET",
            TableFormat::Orc => "ORC",
            TableFormat::Csv => "CSV",
            TableFormat::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(input: &str) -> Result<TableFormat, GatewayError> {
        let trimmed = input.trim();
        for candidate in TableFormat::ALL {
            if candidate.as_str().eq_ignore_ascii_case(trimmed) {
                return Ok(candidate);
            }
        }
        Err(GatewayError::InvalidCapability {
            input: input.to_string(),
            valid_set: TableFormat::ALL.iter().map(|f| f.as_str().to_string()).collect(),
        })
    }

    /// Lakehouse formats = {ICEBERG, DELTA, HUDI} (spec §3).
    pub fn is_lakehouse(&self) -> bool {
        matches!(self, TableFormat::Iceberg | TableFormat::Delta | TableFormat::Hudi)
    }
}
