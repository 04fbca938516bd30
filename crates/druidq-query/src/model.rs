//! Group-by query model
//!
//! `GroupByQuery` is the root document. It is only obtainable through
//! [`GroupByQueryBuilder::build`], which rejects missing required fields, and
//! it has no setters, so a built query is always encodable.

use crate::aggregation::Aggregator;
use crate::dimension::Dimension;
use crate::encoder;
use crate::error::EncodeError;
use crate::filter::Filter;
use crate::limit::LimitSpec;
use crate::post_aggregation::PostAggregator;
use druidq_core::{require_non_blank, Context, Granularity, Interval, Result, ValidationError};
use serde::Serialize;
use tracing::debug;

/// Group-by query document
///
/// Keys are emitted in protocol order; optional parts are left out entirely
/// when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "groupBy")]
pub struct GroupByQuery {
    #[serde(rename = "dataSource")]
    data_source: String,
    granularity: Granularity,
    dimensions: Vec<Dimension>,
    #[serde(rename = "limitSpec", skip_serializing_if = "Option::is_none")]
    limit_spec: Option<LimitSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aggregations: Vec<Aggregator>,
    #[serde(rename = "postAggregations", skip_serializing_if = "Vec::is_empty")]
    post_aggregations: Vec<PostAggregator>,
    intervals: Vec<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Context>,
}

impl GroupByQuery {
    /// Create a new query builder
    pub fn builder() -> GroupByQueryBuilder {
        GroupByQueryBuilder::new()
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn limit_spec(&self) -> Option<&LimitSpec> {
        self.limit_spec.as_ref()
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn aggregations(&self) -> &[Aggregator] {
        &self.aggregations
    }

    pub fn post_aggregations(&self) -> &[PostAggregator] {
        &self.post_aggregations
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Validate the query and everything nested in it
    pub fn validate(&self) -> Result<()> {
        require_non_blank("dataSource", &self.data_source)?;
        self.granularity.validate()?;

        if self.dimensions.is_empty() {
            return Err(ValidationError::MissingField("dimensions"));
        }
        for dimension in &self.dimensions {
            dimension.validate()?;
        }

        if self.intervals.is_empty() {
            return Err(ValidationError::MissingField("intervals"));
        }

        if let Some(limit_spec) = &self.limit_spec {
            limit_spec.validate()?;
        }
        if let Some(filter) = &self.filter {
            filter.validate()?;
        }
        for aggregator in &self.aggregations {
            aggregator.validate()?;
        }
        for post in &self.post_aggregations {
            post.validate()?;
        }
        if let Some(context) = &self.context {
            context.validate()?;
        }

        Ok(())
    }

    /// Encode as compact JSON
    pub fn to_json(&self) -> std::result::Result<String, EncodeError> {
        encoder::to_string(self)
    }
}

/// Query builder for fluent API
#[derive(Debug, Default)]
pub struct GroupByQueryBuilder {
    data_source: Option<String>,
    granularity: Option<Granularity>,
    dimensions: Vec<Dimension>,
    limit_spec: Option<LimitSpec>,
    filter: Option<Filter>,
    aggregations: Vec<Aggregator>,
    post_aggregations: Vec<PostAggregator>,
    intervals: Vec<Interval>,
    context: Option<Context>,
}

impl GroupByQueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    pub fn granularity(mut self, granularity: impl Into<Granularity>) -> Self {
        self.granularity = Some(granularity.into());
        self
    }

    /// Replace the dimension list
    pub fn dimensions(mut self, dimensions: Vec<Dimension>) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Append one dimension
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn limit_spec(mut self, limit_spec: LimitSpec) -> Self {
        self.limit_spec = Some(limit_spec);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Replace the aggregator list
    pub fn aggregators(mut self, aggregators: Vec<Aggregator>) -> Self {
        self.aggregations = aggregators;
        self
    }

    /// Append one aggregator
    pub fn aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregations.push(aggregator);
        self
    }

    /// Replace the post-aggregator list
    pub fn post_aggregators(mut self, post_aggregators: Vec<PostAggregator>) -> Self {
        self.post_aggregations = post_aggregators;
        self
    }

    /// Append one post-aggregator
    pub fn post_aggregator(mut self, post_aggregator: PostAggregator) -> Self {
        self.post_aggregations.push(post_aggregator);
        self
    }

    /// Replace the interval list
    pub fn intervals(mut self, intervals: Vec<Interval>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Append one interval
    pub fn interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    /// Attach tuning flags; an empty context is dropped
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Build the query
    pub fn build(self) -> Result<GroupByQuery> {
        let data_source = self
            .data_source
            .ok_or(ValidationError::MissingField("dataSource"))?;
        let granularity = self
            .granularity
            .ok_or(ValidationError::MissingField("granularity"))?;

        let query = GroupByQuery {
            data_source,
            granularity,
            dimensions: self.dimensions,
            limit_spec: self.limit_spec,
            filter: self.filter,
            aggregations: self.aggregations,
            post_aggregations: self.post_aggregations,
            intervals: self.intervals,
            context: self.context.filter(|c| !c.is_empty()),
        };

        query.validate()?;

        debug!(
            "Built groupBy query on {} with {} dimensions, {} aggregations, {} intervals",
            query.data_source,
            query.dimensions.len(),
            query.aggregations.len(),
            query.intervals.len()
        );

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use druidq_core::PredefinedGranularity;

    fn interval() -> Interval {
        Interval::new(
            Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2012, 1, 3, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn required() -> GroupByQueryBuilder {
        GroupByQuery::builder()
            .data_source("sample_datasource")
            .granularity(PredefinedGranularity::All)
            .dimension(Dimension::simple("dim1").unwrap())
            .interval(interval())
    }

    #[test]
    fn test_query_builder() {
        let query = required()
            .aggregator(Aggregator::count("rows").unwrap())
            .build()
            .unwrap();

        assert_eq!(query.data_source(), "sample_datasource");
        assert_eq!(query.granularity(), &Granularity::Simple(PredefinedGranularity::All));
        assert_eq!(query.dimensions().len(), 1);
        assert_eq!(query.aggregations()[0].name(), "rows");
        assert!(query.filter().is_none());
        assert!(query.context().is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        let result = GroupByQuery::builder()
            .granularity(PredefinedGranularity::All)
            .dimension(Dimension::simple("dim1").unwrap())
            .interval(interval())
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::MissingField("dataSource"));

        let result = GroupByQuery::builder()
            .data_source("ds")
            .dimension(Dimension::simple("dim1").unwrap())
            .interval(interval())
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::MissingField("granularity"));

        let result = GroupByQuery::builder()
            .data_source("ds")
            .granularity(PredefinedGranularity::All)
            .interval(interval())
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::MissingField("dimensions"));

        let result = GroupByQuery::builder()
            .data_source("ds")
            .granularity(PredefinedGranularity::All)
            .dimension(Dimension::simple("dim1").unwrap())
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::MissingField("intervals"));
    }

    #[test]
    fn test_blank_data_source() {
        let result = required().data_source("").build();
        assert_eq!(result.unwrap_err(), ValidationError::EmptyField("dataSource"));
    }

    #[test]
    fn test_empty_context_dropped() {
        let query = required()
            .context(Context::builder().build().unwrap())
            .build()
            .unwrap();
        assert!(query.context().is_none());
    }

    #[test]
    fn test_nested_values_validated() {
        let result = required()
            .filter(Filter::And { fields: vec![] })
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::EmptyField("and.fields"));

        let result = required()
            .aggregator(Aggregator::Count {
                name: String::new(),
            })
            .build();
        assert_eq!(result.unwrap_err(), ValidationError::EmptyField("name"));
    }
}
