//! Group-by dimensions

use druidq_core::{require_non_blank, Result};
use serde::Serialize;

/// Value type a dimension is cast to in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputType {
    String,
    Long,
    Float,
}

/// Dimension spec with an optional output rename and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "default")]
pub struct DefaultDimension {
    dimension: String,
    #[serde(rename = "outputName", skip_serializing_if = "Option::is_none")]
    output_name: Option<String>,
    #[serde(rename = "outputType", skip_serializing_if = "Option::is_none")]
    output_type: Option<OutputType>,
}

impl DefaultDimension {
    pub fn new(dimension: impl Into<String>) -> Result<Self> {
        let dimension = dimension.into();
        require_non_blank("dimension", &dimension)?;
        Ok(Self {
            dimension,
            output_name: None,
            output_type: None,
        })
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Result<Self> {
        let output_name = output_name.into();
        require_non_blank("outputName", &output_name)?;
        self.output_name = Some(output_name);
        Ok(self)
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    pub fn output_type(&self) -> Option<OutputType> {
        self.output_type
    }
}

/// A column to group by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Dimension {
    /// Bare column name
    Simple(String),
    Default(DefaultDimension),
}

impl Dimension {
    /// Create a simple dimension; the name must not be blank
    pub fn simple(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_non_blank("dimension", &name)?;
        Ok(Dimension::Simple(name))
    }

    /// Name of the source column
    pub fn name(&self) -> &str {
        match self {
            Dimension::Simple(name) => name,
            Dimension::Default(d) => &d.dimension,
        }
    }

    /// Name the column carries in results
    pub fn output_name(&self) -> &str {
        match self {
            Dimension::Simple(name) => name,
            Dimension::Default(d) => d.output_name.as_deref().unwrap_or(&d.dimension),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Dimension::Simple(name) => require_non_blank("dimension", name),
            Dimension::Default(d) => {
                require_non_blank("dimension", &d.dimension)?;
                if let Some(output_name) = &d.output_name {
                    require_non_blank("outputName", output_name)?;
                }
                Ok(())
            }
        }
    }
}

impl From<DefaultDimension> for Dimension {
    fn from(d: DefaultDimension) -> Self {
        Dimension::Default(d)
    }
}
