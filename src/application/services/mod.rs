//! # Application Services
//!
//! - [`FareAggregationEngine`]: concurrent, fallback-backed fare collection and ranking

pub mod fare_aggregation;

pub use fare_aggregation::{
    AggregationConfig, AggregationError, AggregationResult, FareAggregationEngine,
};
