//! Per-section statistics aggregation
//!
//! Two update modes share one reduction rule:
//! - `Immediate`: every completed interval is folded in as it arrives
//! - `Deferred`: intervals are buffered in completion order and folded in
//!   by [`StatsAggregator::calculate_stats`]
//!
//! For the same ordered sequence of intervals both modes yield identical
//! statistics. Only `last_call_site` depends on processing order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::section::{CallSite, Interval, SectionName};

/// How completed intervals reach the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Fold each interval in at exit time
    #[default]
    Immediate,
    /// Buffer intervals until `calculate_stats` is called
    Deferred,
}

/// Running statistics for one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStats {
    pub name: SectionName,
    /// Number of completed intervals
    pub count: u64,
    /// Sum of elapsed seconds over all intervals
    pub total_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    /// Always `total_time / count`, recomputed on every update
    pub avg_time: f64,
    /// Call-site of the most recently processed interval
    pub last_call_site: Option<CallSite>,
}

impl SectionStats {
    fn empty(name: SectionName) -> Self {
        Self {
            name,
            count: 0,
            total_time: 0.0,
            // First recorded time always becomes both min and max
            min_time: f64::MAX,
            max_time: f64::MIN,
            avg_time: 0.0,
            last_call_site: None,
        }
    }

    fn update(&mut self, elapsed: f64, call_site: Option<&CallSite>) {
        self.count += 1;
        self.total_time += elapsed;
        self.min_time = self.min_time.min(elapsed);
        self.max_time = self.max_time.max(elapsed);
        self.avg_time = self.total_time / self.count as f64;
        self.last_call_site = call_site.cloned();
    }
}

/// Owns the per-name statistics collection
#[derive(Debug, Default)]
pub struct StatsAggregator {
    mode: AggregationMode,
    stats: BTreeMap<SectionName, SectionStats>,
    pending: Vec<Interval>,
}

impl StatsAggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            mode,
            stats: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Create a deferred-mode aggregator with room for `capacity` intervals
    pub fn with_capacity(mode: AggregationMode, capacity: usize) -> Self {
        let pending = match mode {
            AggregationMode::Deferred => Vec::with_capacity(capacity),
            AggregationMode::Immediate => Vec::new(),
        };
        Self {
            mode,
            stats: BTreeMap::new(),
            pending,
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Route a completed interval according to the aggregation mode
    pub fn submit(&mut self, interval: Interval) {
        match self.mode {
            AggregationMode::Immediate => self.record(&interval),
            AggregationMode::Deferred => self.pending.push(interval),
        }
    }

    /// Fold one interval into its section's statistics
    pub fn record(&mut self, interval: &Interval) {
        self.stats
            .entry(interval.name.clone())
            .or_insert_with(|| SectionStats::empty(interval.name.clone()))
            .update(interval.elapsed_seconds, interval.call_site.as_ref());
    }

    /// Apply every buffered interval in completion order
    ///
    /// Returns the number of intervals applied. A no-op in immediate mode.
    pub fn calculate_stats(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        for interval in &pending {
            self.record(interval);
        }
        if !pending.is_empty() {
            tracing::debug!(applied = pending.len(), "applied buffered intervals");
        }
        pending.len()
    }

    /// Intervals buffered but not yet aggregated
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, name: &str) -> Option<&SectionStats> {
        self.stats.get(name)
    }

    /// Statistics in section-name order
    pub fn iter(&self) -> impl Iterator<Item = &SectionStats> {
        self.stats.values()
    }

    pub fn snapshot(&self) -> Vec<SectionStats> {
        self.stats.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Print section timing summary to stderr
    pub fn print_summary(&self) {
        if self.stats.is_empty() {
            eprintln!("\nNo section timing data collected.");
            return;
        }

        eprintln!("\n╔════════════════════════════════════════════════════════════════════════════════╗");
        eprintln!("║  Section Timing Summary (sorted by name)                                       ║");
        eprintln!("╚════════════════════════════════════════════════════════════════════════════════╝");
        eprintln!();
        eprintln!(
            "{:<32} {:>8} {:>12} {:>12} {:>12} {:>12}",
            "Section", "Calls", "Total", "Min", "Max", "Avg"
        );
        eprintln!("{}", "─".repeat(93));

        for stat in self.stats.values() {
            eprintln!(
                "{:<32} {:>8} {:>11.6}s {:>11.6}s {:>11.6}s {:>11.6}s",
                stat.name, stat.count, stat.total_time, stat.min_time, stat.max_time, stat.avg_time
            );
            if let Some(ref site) = stat.last_call_site {
                eprintln!("    last exit: {}", site);
            }
        }

        eprintln!("{}", "─".repeat(93));
    }
}
