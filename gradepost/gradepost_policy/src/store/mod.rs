//! Post policy storage.
//!
//! A store keeps at most one record per [`PolicyScope`]. The scope is the
//! unique key, so two writers racing to create the same course default or
//! assignment override cannot both succeed.
//!
//! Every write takes a hook that runs while the scope is held. The write is
//! kept only if the hook succeeds, and writes to one scope never interleave
//! with each other's hooks. The policy service stamps the record and touches
//! its owner there, so the record and the marker change together or not at
//! all. A database-backed store runs the hook inside its transaction.

mod in_memory;

pub use in_memory::InMemoryPostPolicyStore;

use crate::model::{PolicyScope, PostPolicy};
use gradepost_core::error::Result;
use gradepost_core::id::CourseId;

/// Trait for post policy storage.
pub trait PostPolicyStore: Send + Sync {
    /// Get the policy occupying a scope.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(PostPolicy))` - The policy.
    /// * `Ok(None)` - The scope is free.
    /// * `Err` - If the store could not be read.
    fn get(&self, scope: &PolicyScope) -> Result<Option<PostPolicy>>;

    /// Insert a policy if its scope is free.
    ///
    /// This is an atomic create-if-absent. `commit` may adjust the record but
    /// must not change its scope; if it fails nothing is inserted and its
    /// error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(PostPolicy)` - The inserted policy.
    /// * `Err(StoreError::UniqueViolation)` - If the scope is already taken.
    fn insert<F>(&self, policy: PostPolicy, commit: F) -> Result<PostPolicy>
    where
        F: FnOnce(&mut PostPolicy) -> Result<()>;

    /// Modify the policy occupying a scope.
    ///
    /// `apply` edits a copy of the stored record; the copy replaces it only if
    /// `apply` succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(PostPolicy)` - The policy as stored after the update.
    /// * `Err(StoreError::NotFound)` - If the scope is free.
    fn update<F>(&self, scope: &PolicyScope, apply: F) -> Result<PostPolicy>
    where
        F: FnOnce(&mut PostPolicy) -> Result<()>;

    /// Remove the policy occupying a scope.
    ///
    /// The record is removed only if `commit` succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(PostPolicy))` - The removed policy.
    /// * `Ok(None)` - The scope was already free.
    fn remove<F>(&self, scope: &PolicyScope, commit: F) -> Result<Option<PostPolicy>>
    where
        F: FnOnce(&PostPolicy) -> Result<()>;

    /// List every policy that belongs to a course, default and overrides.
    fn list_for_course(&self, course_id: &CourseId) -> Result<Vec<PostPolicy>>;
}
