//! Policy write path.
//!
//! [`PostPolicies`] validates and persists policy writes, and
//! [`TouchPropagator`] stamps the owning entity after each one.

pub mod policies;
pub mod touch;

pub use policies::PostPolicies;
pub use touch::{TouchPropagator, TouchTarget};
