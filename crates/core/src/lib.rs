//! Core types and time-axis algebra for the timebar system.
//!
//! This crate provides shared types used across all other crates:
//! - Period registry and period-aligned bucketing
//! - Closed time intervals with containment, overlap and difference
//! - Time ordering over ticks and bars
//! - Market data value types (ticks, bars, tick bars)
//! - Configuration structures
//! - Common error types

pub mod bucket;
pub mod config;
pub mod error;
pub mod exclusive;
pub mod interval;
pub mod ordering;
pub mod period;
pub mod types;

pub use bucket::{bucket, bucket_after, bucket_end, bucket_interval, bucket_start, Bucket};
pub use config::Config;
pub use error::{Error, Result};
pub use exclusive::{ExclusiveFlag, ExclusiveGuard};
pub use interval::Interval;
pub use ordering::{by_time, compare_present, sort_by_time, TimeOrdered, Timestamped};
pub use period::{Period, TimeUnit, PERIODS};
pub use types::*;
