//! fpexhaust CLI - run exhaustive binary-operation suites on the host backend
//!
//! Exit status: 0 when every selected suite passes, 1 when any suite has
//! mismatches, 2 on configuration errors or harness faults.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fpexhaust::prelude::*;

/// Exhaustive conformance tests for binary floating-point operations
#[derive(Parser, Debug)]
#[command(name = "fpexhaust")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Platform whose tolerances apply (cpu, gpu, other); defaults to FPEXHAUST_PLATFORM or cpu
    #[arg(long)]
    platform: Option<Platform>,

    /// Only run suites whose name contains this string
    #[arg(short, long, default_value = "")]
    filter: String,

    /// List the selected suites instead of running them
    #[arg(long)]
    list: bool,

    /// Seed for sampled normals
    #[arg(long)]
    seed: Option<u64>,

    /// Sampled normals per operand, for every dtype
    #[arg(long)]
    normals: Option<u64>,

    /// Total extreme-magnitude normals
    #[arg(long, default_value_t = SuitePlan::DEFAULT_EXTREME_TOTAL)]
    extreme_total: u64,

    /// Extreme-magnitude normals per operand-1 group
    #[arg(long, default_value_t = SuitePlan::DEFAULT_EXTREME_GROUP)]
    extreme_group: u64,

    /// Treat the backend as lacking F64 support
    #[arg(long)]
    no_f64: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if e.is_harness_fault() {
                error!("harness fault: {e}");
            } else {
                error!("{e}");
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "fpexhaust=debug" } else { "fpexhaust=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut config = HarnessConfig::from_env()?.with_extremes(cli.extreme_total, cli.extreme_group);
    if let Some(platform) = cli.platform {
        config = config.with_platform(platform);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(normals) = cli.normals {
        config = config.with_normals(normals);
    }
    if cli.no_f64 {
        config = config.with_f64(false);
    }

    let mut backend = CpuBackend::new().with_identity(config.platform.name(), config.platform);
    if !config.backend_supports_f64 {
        backend = backend.with_dtypes(config.dtypes.without(DType::F64));
    }

    let registry = Registry::init(&config)?;

    if cli.list {
        for suite in registry.select(&cli.filter) {
            let inputs = suite.pair().total_inputs()?;
            println!("{}  ({inputs} inputs)", suite.id());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let summary = registry.run(&backend, &cli.filter)?;
    println!(
        "{} passed, {} failed, {} disabled, {} unsupported ({} mismatching, {} skipped elements)",
        summary.passed,
        summary.failed,
        summary.disabled,
        summary.unsupported,
        summary.mismatch_count(),
        summary.skipped()
    );
    for result in &summary.results {
        if let SuiteOutcome::Completed(report) = &result.outcome {
            if !report.is_pass() {
                println!("FAILED {} ({} of {})", result.id, report.failed(), report.total);
            }
        }
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
