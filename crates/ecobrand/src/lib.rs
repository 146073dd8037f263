pub mod catalog;
pub mod config;
pub mod error;
pub mod import;
pub mod scoring;
pub mod telemetry;
