use crate::errors::{BenchError, BenchResult};
use anyhow::anyhow;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::path::Path;
use tracing::{info, warn};

/// Categories a synthetic row can carry.
pub const CATEGORIES: [&str; 4] = ["A", "B", "C", "D"];

/// Exclusive upper bound for generated `user_id` values (lower bound is 1).
pub const USER_ID_BOUND: i64 = 100_000;

const PROGRESS_CHUNK: usize = 10_000;

/// Ensure a readable dataset exists at `path`.
///
/// Existing files are left untouched; a missing file is generated with
/// `rows` synthetic records drawn from `rng`.
pub fn ensure_dataset<P: AsRef<Path>>(path: P, rows: usize, rng: &mut impl Rng) -> BenchResult<()> {
    if path.as_ref().exists() {
        info!("Dataset found at {:?}", path.as_ref());
        return Ok(());
    }
    warn!("Dataset not found. Auto-generating dataset...");
    generate_dataset(path, rows, rng)
}

/// Synthesize `rows` records and write them as headered CSV at `path`.
///
/// Columns: `user_id` uniform in [1, 100000), `category` uniform over
/// {A,B,C,D}, `value` ~ N(0, 100^2), `timestamp` one-second cadence from
/// 2023-01-01 00:00:00.
pub fn generate_dataset<P: AsRef<Path>>(
    path: P,
    rows: usize,
    rng: &mut impl Rng,
) -> BenchResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    info!("Generating CSV dataset with {} rows...", rows);

    let normal = Normal::new(0.0, 100.0)
        .map_err(|e| BenchError::Unknown(anyhow!("invalid value distribution: {}", e)))?;
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| BenchError::Unknown(anyhow!("invalid dataset start timestamp")))?;

    let pb = ProgressBar::new(rows as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .map_err(|e| BenchError::Unknown(e.into()))?
            .progress_chars("#>-"),
    );
    pb.set_message("Generating rows");

    let mut user_ids = Vec::with_capacity(rows);
    let mut categories = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    let mut timestamps = Vec::with_capacity(rows);

    for i in 0..rows {
        user_ids.push(rng.gen_range(1..USER_ID_BOUND));
        categories.push(CATEGORIES[rng.gen_range(0..CATEGORIES.len())]);
        values.push(normal.sample(rng));
        let ts = start + chrono::Duration::seconds(i as i64);
        timestamps.push(ts.format("%Y-%m-%d %H:%M:%S").to_string());
        if (i + 1) % PROGRESS_CHUNK == 0 {
            pb.inc(PROGRESS_CHUNK as u64);
        }
    }
    pb.finish_and_clear();

    let mut df = df!(
        "user_id" => user_ids,
        "category" => categories,
        "value" => values,
        "timestamp" => timestamps,
    )?;

    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    info!("Dataset generated at {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_generated_row_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        generate_dataset(&path, 100, &mut rng).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 101); // header + 100 data rows
        assert_eq!(lines[0], "user_id,category,value,timestamp");
    }

    #[test]
    fn test_generated_value_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        generate_dataset(&path, 500, &mut rng).unwrap();

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))
            .unwrap()
            .finish()
            .unwrap();

        let user_ids = df.column("user_id").unwrap().i64().unwrap();
        for id in user_ids.into_no_null_iter() {
            assert!((1..USER_ID_BOUND).contains(&id));
        }
        let categories = df.column("category").unwrap().str().unwrap();
        for cat in categories.into_no_null_iter() {
            assert!(CATEGORIES.contains(&cat), "unexpected category {}", cat);
        }
    }

    #[test]
    fn test_timestamps_one_second_cadence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        generate_dataset(&path, 3, &mut rng).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let stamps: Vec<&str> = content
            .lines()
            .skip(1)
            .map(|l| l.rsplit(',').next().unwrap())
            .collect();
        assert_eq!(
            stamps,
            vec![
                "2023-01-01 00:00:00",
                "2023-01-01 00:00:01",
                "2023-01-01 00:00:02",
            ]
        );
    }

    #[test]
    fn test_ensure_dataset_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.csv");
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        ensure_dataset(&path, 50, &mut rng).unwrap();
        let first = fs::read(&path).unwrap();

        ensure_dataset(&path, 5000, &mut rng).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second, "existing dataset must not be regenerated");
    }
}
