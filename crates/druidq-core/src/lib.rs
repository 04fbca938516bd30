//! druidq Core - Value types shared by the druidq query model
//!
//! This crate provides the leaf types of a group-by query document:
//! - `Interval`: Half-open UTC time range, encoded as `start/end`
//! - `Granularity`: Time bucketing (bare token, duration or period)
//! - `Context`: Ordered engine tuning flags
//! - `ValidationError`: Construction-time validation failures

pub mod context;
pub mod error;
pub mod granularity;
pub mod types;

pub use context::{Context, ContextBuilder, ContextValue};
pub use error::{check_depth, require_non_blank, Result, ValidationError, MAX_TREE_DEPTH};
pub use granularity::{DurationGranularity, Granularity, PeriodGranularity, PredefinedGranularity};
pub use types::{format_instant, Interval};
