//! Post-aggregators: values derived from aggregator outputs and constants

use druidq_core::{check_depth, require_non_blank, Result, ValidationError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Binary function applied left to right across arithmetic operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArithmeticFunction {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Multiply,
    /// Division that yields 0 when dividing by 0
    #[serde(rename = "/")]
    Divide,
    /// Plain floating point division
    #[serde(rename = "quotient")]
    Quotient,
}

impl ArithmeticFunction {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticFunction::Plus => "+",
            ArithmeticFunction::Minus => "-",
            ArithmeticFunction::Multiply => "*",
            ArithmeticFunction::Divide => "/",
            ArithmeticFunction::Quotient => "quotient",
        }
    }
}

impl fmt::Display for ArithmeticFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ArithmeticFunction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+" => Ok(ArithmeticFunction::Plus),
            "-" => Ok(ArithmeticFunction::Minus),
            "*" => Ok(ArithmeticFunction::Multiply),
            "/" => Ok(ArithmeticFunction::Divide),
            "quotient" => Ok(ArithmeticFunction::Quotient),
            _ => Err(ValidationError::UnknownArithmeticFunction(s.to_string())),
        }
    }
}

/// Result ordering for arithmetic outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArithmeticOrdering {
    /// NaN and infinities sort last
    NumericFirst,
}

/// Supported post-aggregators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PostAggregator {
    /// Reads an aggregator output; usually an arithmetic operand
    FieldAccess {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    /// Literal number
    Constant { name: String, value: f64 },
    /// `fields[0] fn fields[1] fn ...`
    Arithmetic {
        name: String,
        #[serde(rename = "fn")]
        function: ArithmeticFunction,
        fields: Vec<PostAggregator>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ordering: Option<ArithmeticOrdering>,
    },
    /// Cardinality estimate of a `hyperUnique` aggregator output
    HyperUniqueCardinality {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
}

const MIN_ARITHMETIC_OPERANDS: usize = 2;

impl PostAggregator {
    /// Unnamed reference to an aggregator output
    pub fn field_access(field_name: impl Into<String>) -> Result<Self> {
        let field_name = field_name.into();
        require_non_blank("fieldName", &field_name)?;
        Ok(PostAggregator::FieldAccess {
            name: None,
            field_name,
        })
    }

    /// Named reference to an aggregator output
    pub fn named_field_access(
        name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let field_name = field_name.into();
        require_non_blank("name", &name)?;
        require_non_blank("fieldName", &field_name)?;
        Ok(PostAggregator::FieldAccess {
            name: Some(name),
            field_name,
        })
    }

    /// Literal value; must be finite
    pub fn constant(name: impl Into<String>, value: f64) -> Result<Self> {
        let name = name.into();
        require_non_blank("name", &name)?;
        check_finite(value)?;
        Ok(PostAggregator::Constant { name, value })
    }

    /// Arithmetic over two or more operands
    pub fn arithmetic(
        name: impl Into<String>,
        function: ArithmeticFunction,
        fields: Vec<PostAggregator>,
    ) -> Result<Self> {
        ArithmeticBuilder::new()
            .name(name)
            .function(function)
            .fields(fields)
            .build()
    }

    /// Start an arithmetic post-aggregator
    pub fn arithmetic_builder() -> ArithmeticBuilder {
        ArithmeticBuilder::new()
    }

    pub fn hyper_unique_cardinality(field_name: impl Into<String>) -> Result<Self> {
        let field_name = field_name.into();
        require_non_blank("fieldName", &field_name)?;
        Ok(PostAggregator::HyperUniqueCardinality {
            name: None,
            field_name,
        })
    }

    /// Output column name, if the variant has one
    pub fn name(&self) -> Option<&str> {
        match self {
            PostAggregator::FieldAccess { name, .. }
            | PostAggregator::HyperUniqueCardinality { name, .. } => name.as_deref(),
            PostAggregator::Constant { name, .. } | PostAggregator::Arithmetic { name, .. } => {
                Some(name.as_str())
            }
        }
    }

    /// Check the whole expression tree, at most
    /// [`druidq_core::MAX_TREE_DEPTH`] levels deep
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![(self, 1usize)];
        while let Some((post, depth)) = stack.pop() {
            check_depth("postAggregations", depth)?;
            match post {
                PostAggregator::FieldAccess { name, field_name }
                | PostAggregator::HyperUniqueCardinality { name, field_name } => {
                    if let Some(name) = name {
                        require_non_blank("name", name)?;
                    }
                    require_non_blank("fieldName", field_name)?;
                }
                PostAggregator::Constant { name, value } => {
                    require_non_blank("name", name)?;
                    check_finite(*value)?;
                }
                PostAggregator::Arithmetic { name, fields, .. } => {
                    require_non_blank("name", name)?;
                    check_operands(fields)?;
                    stack.extend(fields.iter().map(|f| (f, depth + 1)));
                }
            }
        }
        Ok(())
    }
}

fn check_finite(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "value",
            reason: format!("{} is not a finite number", value),
        });
    }
    Ok(())
}

fn check_operands(fields: &[PostAggregator]) -> Result<()> {
    if fields.len() < MIN_ARITHMETIC_OPERANDS {
        return Err(ValidationError::NotEnoughOperands {
            field: "arithmetic",
            required: MIN_ARITHMETIC_OPERANDS,
            actual: fields.len(),
        });
    }
    Ok(())
}

/// Builder for arithmetic post-aggregators
#[derive(Debug, Default)]
pub struct ArithmeticBuilder {
    name: Option<String>,
    function: Option<ArithmeticFunction>,
    fields: Vec<PostAggregator>,
    ordering: Option<ArithmeticOrdering>,
}

impl ArithmeticBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn function(mut self, function: ArithmeticFunction) -> Self {
        self.function = Some(function);
        self
    }

    /// Append one operand
    pub fn field(mut self, field: PostAggregator) -> Self {
        self.fields.push(field);
        self
    }

    /// Replace the operand list
    pub fn fields(mut self, fields: Vec<PostAggregator>) -> Self {
        self.fields = fields;
        self
    }

    pub fn ordering(mut self, ordering: ArithmeticOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn build(self) -> Result<PostAggregator> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        require_non_blank("name", &name)?;
        let function = self.function.ok_or(ValidationError::MissingField("fn"))?;
        check_operands(&self.fields)?;

        Ok(PostAggregator::Arithmetic {
            name,
            function,
            fields: self.fields,
            ordering: self.ordering,
        })
    }
}
