//! # Gradepost Policy
//!
//! `gradepost_policy` decides whether grades for an assignment are posted to
//! students automatically or held until an instructor posts them.
//!
//! Key concepts:
//!
//! 1. **Post Policy**: a record with a single `post_manually` flag, scoped
//!    either to a course (the course default) or to one assignment (an override).
//!
//! 2. **Effective Policy**: the override for an assignment if it has one,
//!    otherwise its course's default. Course defaults are created lazily.
//!
//! 3. **Touch Propagation**: every policy write stamps the owning assignment or
//!    course `updated_at`, so caches keyed on those markers see the change.
//!
//! 4. **Feature Toggle**: a process-wide setting that switches the whole
//!    subsystem on or off.

pub mod catalog;
pub mod engine;
pub mod feature;
pub mod integration;
pub mod model;
pub mod store;

// Re-export key types and traits for convenience
pub use catalog::{EntityCatalog, InMemoryCatalog};
pub use engine::{PostPolicies, TouchPropagator, TouchTarget};
pub use feature::{FeatureToggle, InMemorySettingStore, SettingStore};
pub use integration::{CachedPolicyResolver, PolicyResolver};
pub use model::{Assignment, Course, NewPostPolicy, PolicyScope, PostPolicy, PostingMode};
pub use store::{InMemoryPostPolicyStore, PostPolicyStore};
