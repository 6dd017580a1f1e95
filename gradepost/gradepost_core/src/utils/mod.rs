//! Utility types.
//!
//! Logging levels and configuration shared by the gradepost crates.

pub mod config;
pub mod logging;

pub use config::PostPolicyConfig;
pub use logging::LogLevel;
