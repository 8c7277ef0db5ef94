//! Build observability: an optional caller-injected trace sink and the
//! counters the builder keeps for every build.
//!
//! Tracing must not affect build semantics.

mod report;
mod sink;

pub use report::BuildReport;
pub use sink::{BuildTraceEvent, BuildTraceSink};
