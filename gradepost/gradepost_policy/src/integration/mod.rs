//! Effective policy resolution for consumers such as the gradebook.

pub mod resolver;

pub use resolver::{CachedPolicyResolver, PolicyResolver};
