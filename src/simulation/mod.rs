//! Test-data generation for benches and the CLI.

pub mod generator;
