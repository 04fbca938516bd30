//! Filter tree
//!
//! Leaves compare a single dimension; `and`/`or`/`not` compose other filters
//! to any depth. Children are encoded in the order they were supplied.

use druidq_core::{check_depth, require_non_blank, Result, ValidationError};
use serde::Serialize;

/// A row predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    /// Exact match: dimension = value
    Selector { dimension: String, value: String },
    /// All children match
    And { fields: Vec<Filter> },
    /// Any child matches
    Or { fields: Vec<Filter> },
    /// Child does not match
    Not { field: Box<Filter> },
    /// Any of values: dimension IN (v1, v2, ...)
    In { dimension: String, values: Vec<String> },
    /// Pattern match on the dimension value
    Regex { dimension: String, pattern: String },
}

impl Filter {
    /// `dimension = value`
    pub fn selector(dimension: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let dimension = dimension.into();
        require_non_blank("dimension", &dimension)?;
        Ok(Filter::Selector {
            dimension,
            value: value.into(),
        })
    }

    /// Conjunction of one or more filters
    pub fn and(fields: Vec<Filter>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ValidationError::EmptyField("and.fields"));
        }
        Ok(Filter::And { fields })
    }

    /// Disjunction of one or more filters
    pub fn or(fields: Vec<Filter>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ValidationError::EmptyField("or.fields"));
        }
        Ok(Filter::Or { fields })
    }

    /// Negation of a filter
    pub fn not(field: Filter) -> Self {
        Filter::Not {
            field: Box::new(field),
        }
    }

    /// `dimension IN (values...)`
    pub fn in_values<I, S>(dimension: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dimension = dimension.into();
        require_non_blank("dimension", &dimension)?;
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ValidationError::EmptyField("in.values"));
        }
        Ok(Filter::In { dimension, values })
    }

    /// Regular-expression match, evaluated by the engine
    pub fn regex(dimension: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let dimension = dimension.into();
        let pattern = pattern.into();
        require_non_blank("dimension", &dimension)?;
        require_non_blank("pattern", &pattern)?;
        Ok(Filter::Regex { dimension, pattern })
    }

    /// Combine with another filter under `and`, flattening nested conjunctions
    pub fn and_also(self, other: Filter) -> Filter {
        match self {
            Filter::And { mut fields } => {
                fields.push(other);
                Filter::And { fields }
            }
            first => Filter::And {
                fields: vec![first, other],
            },
        }
    }

    /// Nesting depth; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((filter, depth)) = stack.pop() {
            max = max.max(depth);
            match filter {
                Filter::And { fields } | Filter::Or { fields } => {
                    stack.extend(fields.iter().map(|f| (f, depth + 1)));
                }
                Filter::Not { field } => stack.push((field.as_ref(), depth + 1)),
                _ => {}
            }
        }
        max
    }

    /// Check the whole tree
    ///
    /// Walks with an explicit stack and rejects trees deeper than
    /// [`druidq_core::MAX_TREE_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![(self, 1usize)];
        while let Some((filter, depth)) = stack.pop() {
            check_depth("filter", depth)?;
            match filter {
                Filter::Selector { dimension, .. } => require_non_blank("dimension", dimension)?,
                Filter::And { fields } => {
                    if fields.is_empty() {
                        return Err(ValidationError::EmptyField("and.fields"));
                    }
                    stack.extend(fields.iter().map(|f| (f, depth + 1)));
                }
                Filter::Or { fields } => {
                    if fields.is_empty() {
                        return Err(ValidationError::EmptyField("or.fields"));
                    }
                    stack.extend(fields.iter().map(|f| (f, depth + 1)));
                }
                Filter::Not { field } => stack.push((field.as_ref(), depth + 1)),
                Filter::In { dimension, values } => {
                    require_non_blank("dimension", dimension)?;
                    if values.is_empty() {
                        return Err(ValidationError::EmptyField("in.values"));
                    }
                }
                Filter::Regex { dimension, pattern } => {
                    require_non_blank("dimension", dimension)?;
                    require_non_blank("pattern", pattern)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use druidq_core::MAX_TREE_DEPTH;
    use serde_json::json;

    #[test]
    fn test_selector_filter() {
        let filter = Filter::selector("Spread", "Peace").unwrap();
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"type": "selector", "dimension": "Spread", "value": "Peace"})
        );

        assert!(Filter::selector("", "x").is_err());
    }

    #[test]
    fn test_nested_filter() {
        let make = Filter::or(vec![
            Filter::selector("make", "Apple").unwrap(),
            Filter::selector("make", "Samsung").unwrap(),
        ])
        .unwrap();
        let filter = Filter::and(vec![Filter::selector("carrier", "AT&T").unwrap(), make]).unwrap();

        assert_eq!(filter.depth(), 3);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "type": "and",
                "fields": [
                    {"type": "selector", "dimension": "carrier", "value": "AT&T"},
                    {"type": "or", "fields": [
                        {"type": "selector", "dimension": "make", "value": "Apple"},
                        {"type": "selector", "dimension": "make", "value": "Samsung"}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn test_discriminant_comes_first() {
        let filter = Filter::or(vec![Filter::selector("a", "1").unwrap()]).unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.starts_with(r#"{"type":"or","fields":["#));
    }

    #[test]
    fn test_empty_composite_rejected() {
        assert_eq!(Filter::and(vec![]).unwrap_err(), ValidationError::EmptyField("and.fields"));
        assert_eq!(Filter::or(vec![]).unwrap_err(), ValidationError::EmptyField("or.fields"));

        // Hand-built value is caught by validate
        let filter = Filter::not(Filter::Or { fields: vec![] });
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_not_in_and_regex_filters() {
        let filter = Filter::not(Filter::in_values("os", ["ios", "android"]).unwrap());
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"type": "not", "field": {"type": "in", "dimension": "os", "values": ["ios", "android"]}})
        );

        let filter = Filter::regex("device", "^iPhone.*").unwrap();
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"type": "regex", "dimension": "device", "pattern": "^iPhone.*"})
        );

        assert!(Filter::in_values("os", Vec::<String>::new()).is_err());
        assert!(Filter::regex("device", "").is_err());
    }

    #[test]
    fn test_and_also_flattens() {
        let filter = Filter::selector("a", "1")
            .unwrap()
            .and_also(Filter::selector("b", "2").unwrap())
            .and_also(Filter::selector("c", "3").unwrap());

        match &filter {
            Filter::And { fields } => assert_eq!(fields.len(), 3),
            other => panic!("expected and filter, got {:?}", other),
        }
    }

    #[test]
    fn test_structural_equality() {
        let a = Filter::selector("make", "Apple").unwrap();
        let b = Filter::selector("make", "Apple").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Filter::selector("make", "Samsung").unwrap());
    }

    fn nested_not(depth: usize) -> Filter {
        let mut filter = Filter::selector("leaf", "x").unwrap();
        for _ in 1..depth {
            filter = Filter::not(filter);
        }
        filter
    }

    #[test]
    fn test_tree_at_depth_limit_validates_and_encodes() {
        let filter = nested_not(MAX_TREE_DEPTH);
        assert_eq!(filter.depth(), MAX_TREE_DEPTH);
        assert!(filter.validate().is_ok());

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json.matches(r#""type":"not""#).count(), MAX_TREE_DEPTH - 1);
        assert!(json.contains(r#"{"type":"selector","dimension":"leaf","value":"x"}"#));
    }

    #[test]
    fn test_tree_over_depth_limit_rejected() {
        let filter = nested_not(MAX_TREE_DEPTH + 1);
        assert!(matches!(
            filter.validate(),
            Err(ValidationError::InvalidValue { field: "filter", .. })
        ));

        let mut filter = Filter::selector("leaf", "x").unwrap();
        for _ in 0..MAX_TREE_DEPTH {
            filter = Filter::And {
                fields: vec![Filter::selector("side", "y").unwrap(), filter],
            };
        }
        assert_eq!(filter.depth(), MAX_TREE_DEPTH + 1);
        assert!(filter.validate().is_err());
    }
}
