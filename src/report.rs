use crate::errors::BenchResult;
use polars::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// One benchmarked run: which framework, how long, and the process RSS
/// sampled right after the run finished.
///
/// The memory figure is an absolute snapshot, not a delta, so the second
/// run's number includes allocations retained from the first.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub framework: String,
    pub elapsed_secs: f64,
    pub resident_mem_mb: f64,
}

/// Run `f` under a monotonic wall clock; elapsed seconds rounded to two
/// decimal places.
pub fn timed<T>(f: impl FnOnce() -> BenchResult<T>) -> BenchResult<(T, f64)> {
    let start = Instant::now();
    let result = f()?;
    Ok((result, round2(start.elapsed().as_secs_f64())))
}

/// Current resident set size of this process in MB, from /proc/self/status.
#[cfg(target_os = "linux")]
pub fn current_rss_mb() -> f64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0.0;
    };
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            if let Ok(kb) = rest.trim().trim_end_matches(" kB").parse::<u64>() {
                return round2(kb as f64 / 1024.0);
            }
        }
    }
    0.0
}

#[cfg(not(target_os = "linux"))]
pub fn current_rss_mb() -> f64 {
    tracing::warn!("Resident memory sampling is only supported on Linux; reporting 0.0");
    0.0
}

/// Assemble the comparison table, one row per measurement.
pub fn comparison_table(measurements: &[Measurement]) -> BenchResult<DataFrame> {
    let frameworks: Vec<&str> = measurements.iter().map(|m| m.framework.as_str()).collect();
    let times: Vec<f64> = measurements.iter().map(|m| m.elapsed_secs).collect();
    let memory: Vec<f64> = measurements.iter().map(|m| m.resident_mem_mb).collect();
    Ok(df!(
        "Framework" => frameworks,
        "Execution Time (sec)" => times,
        "Memory Usage (MB)" => memory,
    )?)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_timed_returns_value_and_nonnegative_elapsed() {
        let (value, elapsed) = timed(|| Ok(21 * 2)).unwrap();
        assert_eq!(value, 42);
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_timed_propagates_errors() {
        let result: BenchResult<((), f64)> = timed(|| {
            Err(crate::errors::BenchError::ConfigError("boom".to_string()))
        });
        assert!(result.is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rss_is_positive_on_linux() {
        assert!(current_rss_mb() > 0.0);
    }

    #[test]
    fn test_comparison_table_shape() {
        let measurements = [
            Measurement {
                framework: "Polars (eager)".to_string(),
                elapsed_secs: 1.23,
                resident_mem_mb: 120.5,
            },
            Measurement {
                framework: "Polars (lazy)".to_string(),
                elapsed_secs: 0.98,
                resident_mem_mb: 140.0,
            },
        ];
        let table = comparison_table(&measurements).unwrap();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(
            table.get_column_names(),
            &["Framework", "Execution Time (sec)", "Memory Usage (MB)"]
        );
    }
}
