//! Data ingestion and range bookkeeping for the timebar system.
//!
//! This crate handles:
//! - Period bar building from ticks
//! - Tick-count bar building
//! - Cached range coverage (what is still missing)
//! - Gap detection in bar series

pub mod bar_builder;
pub mod coverage;
pub mod gaps;
pub mod tick_bar_builder;

pub use bar_builder::{build_bars, BarBuilder};
pub use coverage::CoverageMap;
pub use gaps::{find_gaps, missing_bucket_count};
pub use tick_bar_builder::TickBarBuilder;
