//! Result limiting and ordering

use druidq_core::{require_non_blank, Result, ValidationError};
use serde::Serialize;

/// Sort direction for an ordered column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Comparator used when sorting a dimension column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionOrder {
    Lexicographic,
    Alphanumeric,
    Numeric,
    Strlen,
}

/// Explicit column ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnOrdering {
    dimension: String,
    direction: SortDirection,
    #[serde(rename = "dimensionOrder", skip_serializing_if = "Option::is_none")]
    dimension_order: Option<DimensionOrder>,
}

impl ColumnOrdering {
    pub fn new(dimension: impl Into<String>, direction: SortDirection) -> Result<Self> {
        let dimension = dimension.into();
        require_non_blank("dimension", &dimension)?;
        Ok(Self {
            dimension,
            direction,
            dimension_order: None,
        })
    }

    pub fn with_dimension_order(mut self, order: DimensionOrder) -> Self {
        self.dimension_order = Some(order);
        self
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn dimension_order(&self) -> Option<DimensionOrder> {
        self.dimension_order
    }
}

/// One sort column of a limit spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderByColumnSpec {
    /// Bare column name, sorted ascending
    Column(String),
    Ordering(ColumnOrdering),
}

impl OrderByColumnSpec {
    /// Ascending order on `column`, encoded as a bare string
    pub fn column(column: impl Into<String>) -> Result<Self> {
        let column = column.into();
        require_non_blank("columns", &column)?;
        Ok(OrderByColumnSpec::Column(column))
    }

    pub fn ascending(column: impl Into<String>) -> Result<Self> {
        ColumnOrdering::new(column, SortDirection::Ascending).map(OrderByColumnSpec::Ordering)
    }

    pub fn descending(column: impl Into<String>) -> Result<Self> {
        ColumnOrdering::new(column, SortDirection::Descending).map(OrderByColumnSpec::Ordering)
    }

    pub fn column_name(&self) -> &str {
        match self {
            OrderByColumnSpec::Column(name) => name,
            OrderByColumnSpec::Ordering(o) => &o.dimension,
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            OrderByColumnSpec::Column(_) => SortDirection::Ascending,
            OrderByColumnSpec::Ordering(o) => o.direction,
        }
    }
}

impl From<ColumnOrdering> for OrderByColumnSpec {
    fn from(o: ColumnOrdering) -> Self {
        OrderByColumnSpec::Ordering(o)
    }
}

/// Largest limit the engine accepts (a signed 32-bit int)
pub const MAX_LIMIT: u64 = i32::MAX as u64;

/// Row cap plus sort columns, applied after grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "default")]
pub struct LimitSpec {
    limit: u64,
    columns: Vec<OrderByColumnSpec>,
}

impl LimitSpec {
    /// Create a limit spec; `limit` must be in `1..=MAX_LIMIT`, `columns` may be empty
    pub fn new(limit: u64, columns: Vec<OrderByColumnSpec>) -> Result<Self> {
        let spec = Self { limit, columns };
        spec.validate()?;
        Ok(spec)
    }

    /// Limit without explicit ordering
    pub fn limit_only(limit: u64) -> Result<Self> {
        Self::new(limit, Vec::new())
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn columns(&self) -> &[OrderByColumnSpec] {
        &self.columns
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(ValidationError::InvalidValue {
                field: "limit",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.limit > MAX_LIMIT {
            return Err(ValidationError::InvalidValue {
                field: "limit",
                reason: format!("{} exceeds {}", self.limit, MAX_LIMIT),
            });
        }
        for column in &self.columns {
            require_non_blank("columns", column.column_name())?;
        }
        Ok(())
    }
}
