use clap::{Parser, ValueEnum};
use miette::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ValueEnum, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "dfbench")]
#[command(version = "0.1.0")]
#[command(about = "Eager vs lazy dataframe pipeline benchmark", long_about = None)]
struct Cli {
    /// Dataset location; auto-generated if missing
    #[arg(long, default_value = "data/large_dataset.csv")]
    data_path: PathBuf,

    /// Rows to generate if the dataset is missing
    #[arg(long, default_value_t = 1_000_000)]
    rows: usize,

    /// Partition-size hint for the lazy pipeline (e.g. "128MB")
    #[arg(long, default_value = "128MB")]
    blocksize: String,

    /// Seed for dataset generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Increase logging verbosity (Info -> Debug)
    #[arg(short, long)]
    verbose: bool,

    /// Silence all logs
    #[arg(short, long)]
    quiet: bool,

    /// Log format (text or json)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // DFBENCH_LOG overrides the CLI verbosity flags
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("DFBENCH_LOG")
        .from_env_lossy();

    let run_id = Uuid::new_v4();

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_span_list(false)
                .with_current_span(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    let _span = tracing::info_span!("root", run_id = %run_id).entered();

    let config = dfbench::runner::BenchConfig {
        data_path: cli.data_path,
        rows: cli.rows,
        blocksize: cli.blocksize,
        seed: cli.seed,
    };

    dfbench::runner::run_benchmark(&config)?;

    Ok(())
}
