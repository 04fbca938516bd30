//! druidq Query - Group-by query model and wire encoder
//!
//! This crate provides:
//! - Query model (`GroupByQuery`) with a validating builder
//! - Filter trees, aggregators and post-aggregators
//! - Limit specs and dimensions
//! - Deterministic JSON encoding of the engine's group-by protocol
//!
//! # Example
//!
//! ```
//! use druidq_query::{Aggregator, Dimension, GroupByQuery, Interval, PredefinedGranularity};
//!
//! let query = GroupByQuery::builder()
//!     .data_source("sample_datasource")
//!     .granularity(PredefinedGranularity::Day)
//!     .dimension(Dimension::simple("country")?)
//!     .aggregator(Aggregator::count("rows")?)
//!     .interval(Interval::from_millis(1_325_376_000_000, 1_325_548_800_000)?)
//!     .build()?;
//!
//! let json = query.to_json()?;
//! assert!(json.starts_with(r#"{"queryType":"groupBy""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregation;
pub mod config;
pub mod dimension;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod limit;
pub mod model;
pub mod post_aggregation;

pub use aggregation::Aggregator;
pub use config::EncoderConfig;
pub use dimension::{DefaultDimension, Dimension, OutputType};
pub use error::{EncodeError, QueryError, Result};
pub use filter::Filter;
pub use limit::{
    ColumnOrdering, DimensionOrder, LimitSpec, OrderByColumnSpec, SortDirection, MAX_LIMIT,
};
pub use model::{GroupByQuery, GroupByQueryBuilder};
pub use post_aggregation::{ArithmeticBuilder, ArithmeticFunction, ArithmeticOrdering, PostAggregator};

pub use druidq_core::{
    Context, ContextBuilder, ContextValue, DurationGranularity, Granularity, Interval,
    PeriodGranularity, PredefinedGranularity, ValidationError, MAX_TREE_DEPTH,
};
