use crate::errors::BenchResult;
use crate::report::Measurement;
use crate::{dataset, pipeline, report};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct BenchConfig {
    pub data_path: PathBuf,
    pub rows: usize,
    pub blocksize: String,
    pub seed: Option<u64>,
}

/// Provision the dataset, run both pipelines, and print the comparison
/// report. Strictly sequential; the report goes to stdout, logs to stderr.
pub fn run_benchmark(config: &BenchConfig) -> BenchResult<()> {
    let blocksize = pipeline::parse_blocksize(&config.blocksize)?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    dataset::ensure_dataset(&config.data_path, config.rows, &mut rng)?;

    info!("Starting ETL benchmark");
    info!("Dataset path: {:?}", config.data_path);

    info!("Running eager pipeline...");
    let (eager_result, eager_time) =
        report::timed(|| pipeline::eager_pipeline(&config.data_path))?;
    let eager_mem = report::current_rss_mb();
    debug!("Eager aggregation: {} categories", eager_result.height());

    info!("Running lazy pipeline...");
    let (lazy_result, lazy_time) =
        report::timed(|| pipeline::lazy_pipeline(&config.data_path, blocksize))?;
    let lazy_mem = report::current_rss_mb();
    debug!("Lazy aggregation: {} categories", lazy_result.height());

    let measurements = [
        Measurement {
            framework: "Polars (eager)".to_string(),
            elapsed_secs: eager_time,
            resident_mem_mb: eager_mem,
        },
        Measurement {
            framework: "Polars (lazy)".to_string(),
            elapsed_secs: lazy_time,
            resident_mem_mb: lazy_mem,
        },
    ];
    let table = report::comparison_table(&measurements)?;

    println!("\n=== Performance Comparison ===");
    println!("{}", table);

    println!("\n=== Aggregation Output (Sample) ===");
    println!("{}", lazy_result);

    info!("Benchmark completed successfully");
    Ok(())
}
