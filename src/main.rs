use anyhow::{Context, Result};
use clap::Parser;
use sectimer::cli::Cli;
use sectimer::config::ProfilerConfig;
use sectimer::profiler::Profiler;
use sectimer::workload::{self, Workload};
use tracing_subscriber::EnvFilter;

const DEFAULT_TRIG_ENTRIES: usize = 100_000;
const DEFAULT_SORT_ELEMENTS: usize = 2_000;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file if given, then apply command-line overrides
fn load_config(args: &Cli) -> Result<ProfilerConfig> {
    let mut config = match &args.config {
        Some(path) => ProfilerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProfilerConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    config.validate()?;
    Ok(config)
}

fn run_workloads(profiler: &mut Profiler, args: &Cli) -> Result<()> {
    let mut rng = workload::seeded_rng(args.seed);

    if matches!(args.workload, Workload::Trig | Workload::All) {
        let entries = args.iterations.unwrap_or(DEFAULT_TRIG_ENTRIES);
        let biggest = workload::trig_speed_test(profiler, entries, &mut rng);
        println!("Biggest cos+sin = {}", biggest);
    }

    if matches!(args.workload, Workload::Sort | Workload::All) {
        let elements = args.iterations.unwrap_or(DEFAULT_SORT_ELEMENTS);
        if !workload::sort_speed_test(profiler, elements, &mut rng) {
            anyhow::bail!("Insertion sort variants disagree on {} elements", elements);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let mut profiler = Profiler::with_config(config);

    run_workloads(&mut profiler, &args)?;

    // Aggregate anything buffered in deferred mode
    profiler.finalize();

    if !args.quiet {
        profiler.print_summary();
    }

    if let Some(path) = &args.csv {
        profiler.export_csv(path)?;
        println!("Profiler stats written to {} in CSV format.", path.display());
    }

    if let Some(path) = &args.json {
        profiler.export_json(path)?;
        println!("Profiler stats written to {} in JSON format.", path.display());
    }

    let report = profiler.shutdown();
    if report.mismatched_exits > 0 {
        eprintln!("warning: {} mismatched section exit(s)", report.mismatched_exits);
    }

    Ok(())
}
