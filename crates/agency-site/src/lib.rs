pub mod config;
pub mod error;
pub mod records;
pub mod reviews;
pub mod telemetry;
