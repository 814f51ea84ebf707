//! Time-bucket aggregation.
//!
//! # Responsibility
//! - Define period keys and bucketing granularity.
//! - Turn grouped store rows into aligned, chart-ready series.

pub mod period;
pub mod series;
