use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum BenchError {
    #[error("I/O error: {0}")]
    #[diagnostic(
        code("DFBENCH-001"),
        help("Check file paths and permissions.")
    )]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    #[diagnostic(
        code("DFBENCH-002"),
        help("An error occurred within the dataframe engine.")
    )]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code("DFBENCH-003"),
        help("Check the CLI flags, e.g. --blocksize accepts sizes like \"128MB\" or \"1GB\".")
    )]
    ConfigError(String),

    #[error(transparent)]
    #[diagnostic(code("DFBENCH-000"))]
    Unknown(#[from] anyhow::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;
