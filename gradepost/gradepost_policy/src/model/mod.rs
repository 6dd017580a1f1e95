//! Post policy models.
//!
//! This module defines the policy record and the course and assignment
//! entities it belongs to.

pub mod entity;
pub mod post_policy;

pub use entity::{Assignment, Course};
pub use post_policy::{NewPostPolicy, PolicyScope, PostPolicy, PostingMode, ValidPostPolicy};
