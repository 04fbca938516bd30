//! Query context: engine tuning flags attached to a query
//!
//! Flags keep their insertion order on the wire. An empty context is never
//! encoded; the query builder drops it.

use crate::error::{Result, ValidationError};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A primitive context value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<bool> for ContextValue {
    fn from(v: bool) -> Self {
        ContextValue::Boolean(v)
    }
}

impl From<i64> for ContextValue {
    fn from(v: i64) -> Self {
        ContextValue::Integer(v)
    }
}

impl From<i32> for ContextValue {
    fn from(v: i32) -> Self {
        ContextValue::Integer(v as i64)
    }
}

impl From<u32> for ContextValue {
    fn from(v: u32) -> Self {
        ContextValue::Integer(v as i64)
    }
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        ContextValue::Float(v)
    }
}

impl From<String> for ContextValue {
    fn from(v: String) -> Self {
        ContextValue::String(v)
    }
}

impl From<&str> for ContextValue {
    fn from(v: &str) -> Self {
        ContextValue::String(v.to_string())
    }
}

/// Ordered set of context flags
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    entries: Vec<(String, ContextValue)>,
}

impl Context {
    /// Create a new context builder
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up a flag by name
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate flags in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Re-check invariants of a context
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.entries {
            if key.trim().is_empty() {
                return Err(ValidationError::EmptyField("context"));
            }
            if let ContextValue::Float(f) = value {
                if !f.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: "context",
                        reason: format!("flag '{}' is not a finite number", key),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Builder for [`Context`]
#[derive(Debug, Default)]
pub struct ContextBuilder {
    entries: Vec<(String, ContextValue)>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary flag
    ///
    /// Setting a flag twice keeps its original position with the new value.
    pub fn flag(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Query timeout in milliseconds
    pub fn timeout(self, millis: i64) -> Self {
        self.flag("timeout", millis)
    }

    pub fn priority(self, priority: i32) -> Self {
        self.flag("priority", priority)
    }

    pub fn query_id(self, id: impl Into<String>) -> Self {
        self.flag("queryId", id.into())
    }

    pub fn use_cache(self, enabled: bool) -> Self {
        self.flag("useCache", enabled)
    }

    pub fn populate_cache(self, enabled: bool) -> Self {
        self.flag("populateCache", enabled)
    }

    pub fn by_segment(self, enabled: bool) -> Self {
        self.flag("bySegment", enabled)
    }

    pub fn finalize(self, enabled: bool) -> Self {
        self.flag("finalize", enabled)
    }

    /// ISO-8601 period used to split long-interval queries, e.g. `P1D`
    pub fn chunk_period(self, period: impl Into<String>) -> Self {
        self.flag("chunkPeriod", period.into())
    }

    pub fn max_scatter_gather_bytes(self, bytes: i64) -> Self {
        self.flag("maxScatterGatherBytes", bytes)
    }

    pub fn max_results(self, rows: i64) -> Self {
        self.flag("maxResults", rows)
    }

    pub fn max_intermediate_rows(self, rows: i64) -> Self {
        self.flag("maxIntermediateRows", rows)
    }

    pub fn group_by_is_single_threaded(self, enabled: bool) -> Self {
        self.flag("groupByIsSingleThreaded", enabled)
    }

    /// `v1` or `v2`
    pub fn group_by_strategy(self, strategy: impl Into<String>) -> Self {
        self.flag("groupByStrategy", strategy.into())
    }

    /// Build the context
    pub fn build(self) -> Result<Context> {
        let context = Context {
            entries: self.entries,
        };
        context.validate()?;
        Ok(context)
    }
}
