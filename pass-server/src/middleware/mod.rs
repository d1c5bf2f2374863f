//! Pass service middleware module.
//!
//! # Metrics
//!
//! The metrics middleware counts requests per route and status. Stage timings of the pipeline
//! itself are recorded by [`metrics::MetricsObserver`].

pub mod metrics;
