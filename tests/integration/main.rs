//! Integration test harness.

mod cli_test;
mod fixture;
mod pipeline_test;
