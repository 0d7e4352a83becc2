//! Explicitly owned profiling context
//!
//! A [`Profiler`] ties a [`Clock`] to a [`SectionTracker`] and a
//! [`StatsAggregator`], and knows how to export the aggregate. Nothing is
//! process-global: create one per thread (or per subsystem) and pass it
//! where it is needed. For a per-thread default instance see
//! [`crate::session`].
//!
//! # Example
//! ```
//! use sectimer::profiler::Profiler;
//!
//! let mut profiler = Profiler::new();
//! profiler.enter_section("load");
//! profiler.enter_section("parse");
//! let _ = profiler.exit_section("parse");
//! let _ = profiler.exit_section("load");
//!
//! assert_eq!(profiler.stats().get("load").unwrap().count, 1);
//! ```

use std::path::Path;

use crate::clock::{Clock, MonotonicClock};
use crate::config::ProfilerConfig;
use crate::csv_output::CsvStatsOutput;
use crate::error::{ProfilerError, Result};
use crate::export::{write_atomically, ExportFormat};
use crate::guard::SectionGuard;
use crate::json_output::JsonStatsOutput;
use crate::section::{CallSite, SectionName};
use crate::stats::{SectionStats, StatsAggregator};
use crate::tracker::SectionTracker;

/// Final state of a profiling session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Statistics for every section with at least one completed interval
    pub stats: Vec<SectionStats>,
    /// Sections that were entered but never exited, with their open depth
    pub dangling: Vec<(SectionName, usize)>,
    /// Exits that had no matching enter
    pub mismatched_exits: u64,
}

/// Section timer context
#[derive(Debug)]
pub struct Profiler<C: Clock = MonotonicClock> {
    clock: C,
    config: ProfilerConfig,
    tracker: SectionTracker,
    aggregator: StatsAggregator,
    mismatched_exits: u64,
}

impl Profiler<MonotonicClock> {
    /// Create a profiler with the default configuration and a monotonic clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new(), ProfilerConfig::default())
    }

    pub fn with_config(config: ProfilerConfig) -> Self {
        Self::with_clock(MonotonicClock::new(), config)
    }
}

impl Default for Profiler<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Profiler<C> {
    pub fn with_clock(clock: C, config: ProfilerConfig) -> Self {
        let aggregator = StatsAggregator::with_capacity(config.mode, config.buffer_capacity);
        Self {
            clock,
            config,
            tracker: SectionTracker::new(),
            aggregator,
            mismatched_exits: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.aggregator
    }

    /// Number of exits so far that matched no open enter
    pub fn mismatched_exits(&self) -> u64 {
        self.mismatched_exits
    }

    /// Start timing `name`
    pub fn enter_section(&mut self, name: impl Into<SectionName>) {
        let now = self.clock.now_seconds();
        self.tracker.enter(name, now);
    }

    /// Stop timing the innermost open `name`
    ///
    /// Returns the elapsed seconds. A mismatched exit is logged, counted and
    /// returned as an error; it never changes any statistics.
    pub fn exit_section(&mut self, name: &str) -> Result<f64> {
        self.exit_section_with(name, None)
    }

    /// Like [`exit_section`](Self::exit_section), recording where the exit happened
    pub fn exit_section_at(&mut self, name: &str, call_site: CallSite) -> Result<f64> {
        self.exit_section_with(name, Some(call_site))
    }

    fn exit_section_with(&mut self, name: &str, call_site: Option<CallSite>) -> Result<f64> {
        let now = self.clock.now_seconds();
        match self.tracker.exit(name, now, call_site) {
            Ok(interval) => {
                let elapsed = interval.elapsed_seconds;
                self.aggregator.submit(interval);
                Ok(elapsed)
            }
            Err(e) => {
                self.mismatched_exits += 1;
                tracing::warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Time `name` until the returned guard is dropped
    ///
    /// The guard dereferences to this profiler, so nested sections are
    /// opened through it.
    pub fn scope(&mut self, name: impl Into<SectionName>) -> SectionGuard<'_, C> {
        SectionGuard::new(self, name.into())
    }

    /// Time a closure as section `name`
    ///
    /// The section is closed even if `f` panics.
    pub fn time<F, R>(&mut self, name: impl Into<SectionName>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.scope(name);
        f()
    }

    /// Apply buffered intervals (deferred mode); returns how many were applied
    pub fn calculate_stats(&mut self) -> usize {
        self.aggregator.calculate_stats()
    }

    /// Flush buffered intervals and report sections that are still open
    ///
    /// Open sections are left in place; only completed intervals ever
    /// reach the statistics.
    pub fn finalize(&mut self) -> Vec<(SectionName, usize)> {
        self.calculate_stats();
        let dangling = self.tracker.open_sections();
        if !dangling.is_empty() && self.config.warn_on_dangling {
            let err = ProfilerError::DanglingOpenSections {
                sections: dangling.clone(),
            };
            tracing::warn!("{}", err);
        }
        dangling
    }

    /// End the session, consuming the profiler
    pub fn shutdown(mut self) -> SessionReport {
        let dangling = self.finalize();
        SessionReport {
            stats: self.aggregator.snapshot(),
            dangling,
            mismatched_exits: self.mismatched_exits,
        }
    }

    /// Render the current aggregate in `format`
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => Ok(CsvStatsOutput::from_stats(self.aggregator.iter()).to_csv()),
            ExportFormat::Json => JsonStatsOutput::from_stats(self.aggregator.iter()).to_json(),
        }
    }

    /// Write the current aggregate to `path`
    ///
    /// Buffered deferred-mode intervals are not applied first; call
    /// [`calculate_stats`](Self::calculate_stats) beforehand to include them.
    pub fn export(&self, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let pending = self.aggregator.pending();
        if pending > 0 {
            tracing::warn!(pending, "exporting with buffered intervals not yet aggregated");
        }

        let contents = self.render(format)?;
        write_atomically(path, &contents)?;
        tracing::debug!(
            path = %path.display(),
            sections = self.aggregator.len(),
            "profiler stats written in {} format",
            format.extension()
        );
        Ok(())
    }

    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export(ExportFormat::Csv, path)
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export(ExportFormat::Json, path)
    }

    /// Print section timing summary to stderr
    pub fn print_summary(&self) {
        self.aggregator.print_summary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::stats::AggregationMode;

    fn manual(mode: AggregationMode) -> (ManualClock, ProfilerConfig) {
        (ManualClock::new(), ProfilerConfig::default().with_mode(mode))
    }

    #[test]
    fn test_single_section_stats() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        profiler.enter_section("X");
        clock.set(1.0);
        assert_eq!(profiler.exit_section("X").unwrap(), 1.0);

        let stats = profiler.stats().get("X").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_time, 1.0);
        assert_eq!(stats.min_time, 1.0);
        assert_eq!(stats.max_time, 1.0);
        assert_eq!(stats.avg_time, 1.0);
    }

    #[test]
    fn test_mismatched_exit_is_inert() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        assert!(profiler.exit_section("Z").is_err());
        assert!(profiler.stats().get("Z").is_none());
        assert_eq!(profiler.mismatched_exits(), 1);

        profiler.enter_section("Z");
        clock.advance(2.0);
        profiler.exit_section("Z").unwrap();
        assert!(profiler.exit_section("Z").is_err());
        assert_eq!(profiler.stats().get("Z").unwrap().count, 1);
        assert_eq!(profiler.stats().get("Z").unwrap().total_time, 2.0);
    }

    #[test]
    fn test_exit_at_records_call_site() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        profiler.enter_section("X");
        profiler
            .exit_section_at("X", CallSite::new(5, "demo.rs", "demo"))
            .unwrap();
        let site = profiler.stats().get("X").unwrap().last_call_site.clone();
        assert_eq!(site, Some(CallSite::new(5, "demo.rs", "demo")));
    }

    #[test]
    fn test_deferred_mode_needs_calculate() {
        let (clock, config) = manual(AggregationMode::Deferred);
        let mut profiler = Profiler::with_clock(&clock, config);

        profiler.enter_section("X");
        clock.set(0.5);
        profiler.exit_section("X").unwrap();
        assert!(profiler.stats().is_empty());

        assert_eq!(profiler.calculate_stats(), 1);
        assert_eq!(profiler.stats().get("X").unwrap().total_time, 0.5);
    }

    #[test]
    fn test_time_closure() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        let value = profiler.time("work", || {
            clock.advance(0.25);
            7
        });
        assert_eq!(value, 7);
        assert_eq!(profiler.stats().get("work").unwrap().total_time, 0.25);
    }

    #[test]
    fn test_time_closes_section_on_panic() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            profiler.time("work", || -> u32 {
                clock.advance(0.5);
                panic!("workload failed");
            })
        }));

        assert!(result.is_err());
        assert_eq!(profiler.tracker().depth("work"), 0);
        let stats = profiler.stats().get("work").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_time, 0.5);
    }

    #[test]
    fn test_finalize_reports_dangling_and_flushes() {
        let (clock, config) = manual(AggregationMode::Deferred);
        let mut profiler = Profiler::with_clock(&clock, config);

        profiler.enter_section("done");
        profiler.enter_section("open");
        clock.set(1.0);
        profiler.exit_section("done").unwrap();

        let dangling = profiler.finalize();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].0.as_str(), "open");
        assert_eq!(profiler.stats().len(), 1);
        assert!(profiler.stats().get("open").is_none());
    }

    #[test]
    fn test_shutdown_report() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);

        profiler.enter_section("a");
        profiler.exit_section("a").unwrap();
        let _ = profiler.exit_section("b");
        profiler.enter_section("c");

        let report = profiler.shutdown();
        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.mismatched_exits, 1);
    }

    #[test]
    fn test_render_formats() {
        let (clock, config) = manual(AggregationMode::Immediate);
        let mut profiler = Profiler::with_clock(&clock, config);
        profiler.enter_section("X");
        clock.set(1.0);
        profiler.exit_section("X").unwrap();

        let csv = profiler.render(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().nth(1), Some("X,1,1,1,1,1,,,0"));

        let json = profiler.render(ExportFormat::Json).unwrap();
        assert!(json.contains("\"Total Time\": 1.0"));
    }
}
