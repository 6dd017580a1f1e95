//! # Gradepost Core
//!
//! `gradepost_core` provides the shared building blocks for the gradepost
//! post-policy system: strongly-typed identifiers, the error hierarchy, the
//! clock abstraction used for freshness markers, and configuration.
//!
//! ## Core Concepts
//!
//! 1. **Post Policy**: decides whether grades for an assignment are released
//!    automatically or held until an instructor posts them.
//!
//! 2. **Two-Level Override**: a course carries one default policy, and any
//!    assignment may carry an override that wins over that default.
//!
//! 3. **Freshness Markers**: every policy mutation stamps the owning course or
//!    assignment so dependent caches can detect that the effective policy moved.
//!
//! ## Crate Structure
//!
//! - **clock**: Time sources for mutation timestamps
//! - **error**: Error types for all gradepost components
//! - **id**: Strongly-typed identifier types
//! - **utils**: Logging levels and configuration
//! - **macros**: Logging convenience macros

pub mod clock;
pub mod error;
pub mod id;
pub mod macros;
pub mod utils;

// Re-export key types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result, SettingError, StoreError, ValidationError};
pub use id::{AssignmentId, CourseId, PostPolicyId};
pub use utils::{LogLevel, PostPolicyConfig};
