//! Aggregators: per-group scalar computations over raw rows

use druidq_core::{require_non_blank, Result};
use serde::Serialize;

/// Supported aggregators
///
/// Every variant produces a result column called `name`. All but `Count`
/// read from the input column `fieldName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Aggregator {
    /// Number of rows
    Count { name: String },
    /// Sum as 64-bit integer
    LongSum {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    /// Sum as 64-bit float
    DoubleSum {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    LongMin {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    LongMax {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    DoubleMin {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    DoubleMax {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    /// Approximate distinct count over a pre-built HyperLogLog column
    HyperUnique {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
}

fn named_field(name: impl Into<String>, field_name: impl Into<String>) -> Result<(String, String)> {
    let name = name.into();
    let field_name = field_name.into();
    require_non_blank("name", &name)?;
    require_non_blank("fieldName", &field_name)?;
    Ok((name, field_name))
}

impl Aggregator {
    pub fn count(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_non_blank("name", &name)?;
        Ok(Aggregator::Count { name })
    }

    pub fn long_sum(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::LongSum { name, field_name })
    }

    pub fn double_sum(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::DoubleSum { name, field_name })
    }

    pub fn long_min(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::LongMin { name, field_name })
    }

    pub fn long_max(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::LongMax { name, field_name })
    }

    pub fn double_min(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::DoubleMin { name, field_name })
    }

    pub fn double_max(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::DoubleMax { name, field_name })
    }

    pub fn hyper_unique(name: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let (name, field_name) = named_field(name, field_name)?;
        Ok(Aggregator::HyperUnique { name, field_name })
    }

    /// Output column name
    pub fn name(&self) -> &str {
        match self {
            Aggregator::Count { name }
            | Aggregator::LongSum { name, .. }
            | Aggregator::DoubleSum { name, .. }
            | Aggregator::LongMin { name, .. }
            | Aggregator::LongMax { name, .. }
            | Aggregator::DoubleMin { name, .. }
            | Aggregator::DoubleMax { name, .. }
            | Aggregator::HyperUnique { name, .. } => name,
        }
    }

    /// Input column, if the aggregator reads one
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Aggregator::Count { .. } => None,
            Aggregator::LongSum { field_name, .. }
            | Aggregator::DoubleSum { field_name, .. }
            | Aggregator::LongMin { field_name, .. }
            | Aggregator::LongMax { field_name, .. }
            | Aggregator::DoubleMin { field_name, .. }
            | Aggregator::DoubleMax { field_name, .. }
            | Aggregator::HyperUnique { field_name, .. } => Some(field_name),
        }
    }

    /// Wire discriminant
    pub fn type_name(&self) -> &'static str {
        match self {
            Aggregator::Count { .. } => "count",
            Aggregator::LongSum { .. } => "longSum",
            Aggregator::DoubleSum { .. } => "doubleSum",
            Aggregator::LongMin { .. } => "longMin",
            Aggregator::LongMax { .. } => "longMax",
            Aggregator::DoubleMin { .. } => "doubleMin",
            Aggregator::DoubleMax { .. } => "doubleMax",
            Aggregator::HyperUnique { .. } => "hyperUnique",
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("name", self.name())?;
        if let Some(field_name) = self.field_name() {
            require_non_blank("fieldName", field_name)?;
        }
        Ok(())
    }
}
