pub mod dataset;
pub mod errors;
pub mod pipeline;
pub mod report;
pub mod runner;
