use crate::errors::{BenchError, BenchResult};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

/// Load the whole dataset into memory, keep rows with `value > 0`, and
/// return the mean of `value` per `category`, sorted by category.
pub fn eager_pipeline<P: AsRef<Path>>(path: P) -> BenchResult<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    let mask = df.column("value")?.f64()?.gt(0.0);
    let filtered = df.filter(&mask)?;

    let result = filtered
        .lazy()
        .group_by([col("category")])
        .agg([col("value").mean().alias("mean_value")])
        .sort(["category"], Default::default())
        .collect()?;
    Ok(result)
}

/// Same filter and group-by-mean as [`eager_pipeline`], but over a lazy scan
/// executed by the streaming engine. `blocksize` is a byte-size hint for the
/// partition granularity; scheduling across partitions is up to the engine.
pub fn lazy_pipeline<P: AsRef<Path>>(path: P, blocksize: u64) -> BenchResult<DataFrame> {
    let hint = partition_row_hint(path.as_ref(), blocksize)?;
    debug!("Streaming chunk hint: {} rows per partition", hint);
    std::env::set_var("POLARS_STREAMING_CHUNK_SIZE", hint.to_string());

    let result = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .filter(col("value").gt(lit(0.0)))
        .group_by([col("category")])
        .agg([col("value").mean().alias("mean_value")])
        .sort(["category"], Default::default())
        .with_streaming(true)
        .collect()?;
    Ok(result)
}

/// Parse a byte-size string such as "128MB", "1GB", "512kb" or a bare byte
/// count. Suffixes are case-insensitive; fractional sizes ("1.5GB") are
/// accepted and rounded down.
pub fn parse_blocksize(s: &str) -> BenchResult<u64> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let number: f64 = number
        .trim()
        .parse()
        .map_err(|_| BenchError::ConfigError(format!("invalid blocksize: {:?}", s)))?;
    if number <= 0.0 {
        return Err(BenchError::ConfigError(format!(
            "blocksize must be positive: {:?}",
            s
        )));
    }
    let multiplier: u64 = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "kb" => 1024,
        "mb" => 1024 * 1024,
        "gb" => 1024 * 1024 * 1024,
        other => {
            return Err(BenchError::ConfigError(format!(
                "unknown blocksize unit {:?} in {:?}",
                other, s
            )))
        }
    };
    Ok((number * multiplier as f64) as u64)
}

/// Extract the category→mean mapping from a pipeline result.
pub fn category_means(df: &DataFrame) -> BenchResult<BTreeMap<String, f64>> {
    let categories = df.column("category")?.str()?;
    let means = df.column("mean_value")?.f64()?;
    let mut out = BTreeMap::new();
    for (category, mean) in categories.into_iter().zip(means) {
        if let (Some(category), Some(mean)) = (category, mean) {
            out.insert(category.to_string(), mean);
        }
    }
    Ok(out)
}

/// Translate a byte-size hint into a per-partition row count by sampling the
/// average row width from the head of the file.
fn partition_row_hint(path: &Path, blocksize: u64) -> BenchResult<usize> {
    const SAMPLE_ROWS: usize = 1_000;

    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut bytes = 0usize;
    let mut rows = 0usize;
    for line in reader.lines().skip(1).take(SAMPLE_ROWS) {
        bytes += line?.len() + 1; // newline
        rows += 1;
    }
    if rows == 0 || bytes == 0 {
        return Ok(1);
    }
    let avg_row_bytes = bytes as f64 / rows as f64;
    Ok(((blocksize as f64 / avg_row_bytes) as usize).max(1))
}
