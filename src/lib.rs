//! Sectimer - Manually-instrumented section timer
//!
//! Calling code marks where a named region of work starts and ends; the
//! timer pairs each exit with the innermost open enter of the same name,
//! aggregates per-section statistics (count, total/min/max/average time,
//! last exit call-site) and exports them as CSV or JSON.
//!
//! Start with [`profiler::Profiler`] for an explicitly owned context, or
//! [`session`] for a per-thread default instance driven by macros.

pub mod cli;
pub mod clock;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod export;
pub mod guard;
pub mod json_output;
pub mod profiler;
pub mod section;
pub mod session;
pub mod stats;
pub mod tracker;
pub mod workload;

pub use error::{ProfilerError, Result};
pub use profiler::Profiler;
pub use section::{CallSite, SectionName};
