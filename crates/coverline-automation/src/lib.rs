pub mod automation;
pub mod config;
pub mod error;
pub mod telemetry;
