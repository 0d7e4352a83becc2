//! CLI argument parsing for sectimer

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::stats::AggregationMode;
use crate::workload::Workload;

/// Aggregation mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Aggregate each interval at exit time
    Immediate,
    /// Buffer intervals and aggregate them in one pass at the end
    Deferred,
}

impl From<ModeArg> for AggregationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Immediate => AggregationMode::Immediate,
            ModeArg::Deferred => AggregationMode::Deferred,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sectimer")]
#[command(version)]
#[command(about = "Run an instrumented demo workload and export per-section timing statistics", long_about = None)]
pub struct Cli {
    /// Demo workload to run under instrumentation
    #[arg(short = 'w', long = "workload", value_enum, default_value = "all")]
    pub workload: Workload,

    /// Trig test table size / sort test element count
    #[arg(short = 'n', long = "iterations", value_name = "N")]
    pub iterations: Option<usize>,

    /// Aggregation mode (overrides the config file)
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Profiler configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write section statistics as CSV
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write section statistics as JSON
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Seed for the workload's random input
    #[arg(long = "seed", value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Do not print the statistics summary
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
