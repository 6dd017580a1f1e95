//! Effective policy resolution.
//!
//! An assignment's override wins; otherwise the assignment follows its
//! course's default, which is created on demand. There is no third tier.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use gradepost_core::error::{Result, ValidationError};
use gradepost_core::id::AssignmentId;
use tracing::debug;

use crate::catalog::EntityCatalog;
use crate::engine::PostPolicies;
use crate::model::{Assignment, PostPolicy, PostingMode};
use crate::store::PostPolicyStore;

/// Resolves the policy in force for an assignment.
pub struct PolicyResolver<'a, S, C> {
    /// The policy service.
    policies: &'a PostPolicies<S, C>,
}

impl<'a, S, C> PolicyResolver<'a, S, C>
where
    S: PostPolicyStore,
    C: EntityCatalog,
{
    /// Create a new resolver.
    pub fn new(policies: &'a PostPolicies<S, C>) -> Self {
        Self { policies }
    }

    /// The effective policy for an assignment.
    ///
    /// # Returns
    ///
    /// * `Ok(PostPolicy)` - The override, or else the course default.
    /// * `Err(UnknownAssignment)` - If the assignment does not exist.
    pub fn effective_policy_for(&self, assignment_id: &AssignmentId) -> Result<PostPolicy> {
        let assignment = self.assignment(assignment_id)?;
        self.resolve(&assignment)
    }

    /// The posting mode in force for an assignment.
    pub fn posting_mode_for(&self, assignment_id: &AssignmentId) -> Result<PostingMode> {
        Ok(self.effective_policy_for(assignment_id)?.posting_mode())
    }

    fn assignment(&self, assignment_id: &AssignmentId) -> Result<Assignment> {
        Ok(self
            .policies
            .catalog()
            .assignment(assignment_id)?
            .ok_or(ValidationError::UnknownAssignment(*assignment_id))?)
    }

    fn resolve(&self, assignment: &Assignment) -> Result<PostPolicy> {
        if let Some(policy) = self.policies.override_for(&assignment.id)? {
            debug!(assignment_id = %assignment.id, policy_id = %policy.id, "resolved assignment override");
            return Ok(policy);
        }

        let policy = self.policies.default_for(&assignment.course_id)?;
        debug!(assignment_id = %assignment.id, policy_id = %policy.id, "resolved course default");
        Ok(policy)
    }
}

/// A resolved policy and the freshness markers it was resolved against.
#[derive(Debug, Clone)]
struct CachedPolicy {
    assignment_updated_at: DateTime<Utc>,
    course_updated_at: DateTime<Utc>,
    policy: PostPolicy,
}

/// A resolver that memoizes effective policies per assignment.
///
/// A cached entry is served only while both the assignment's and its
/// course's `updated_at` markers are unchanged, so any policy write that
/// touches either owner invalidates it.
pub struct CachedPolicyResolver<'a, S, C> {
    resolver: PolicyResolver<'a, S, C>,

    /// Cached policies by assignment.
    cache: DashMap<AssignmentId, CachedPolicy>,
}

impl<'a, S, C> CachedPolicyResolver<'a, S, C>
where
    S: PostPolicyStore,
    C: EntityCatalog,
{
    /// Create a new caching resolver.
    pub fn new(policies: &'a PostPolicies<S, C>) -> Self {
        Self {
            resolver: PolicyResolver::new(policies),
            cache: DashMap::new(),
        }
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached assignments.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The effective policy for an assignment, served from cache when fresh.
    pub fn effective_policy_for(&self, assignment_id: &AssignmentId) -> Result<PostPolicy> {
        let (assignment, course_updated_at) = self.markers(assignment_id)?;

        let hit = self
            .cache
            .get(assignment_id)
            .filter(|entry| {
                entry.assignment_updated_at == assignment.updated_at
                    && entry.course_updated_at == course_updated_at
            })
            .map(|entry| entry.policy.clone());
        if let Some(policy) = hit {
            debug!(assignment_id = %assignment_id, "post policy cache hit");
            return Ok(policy);
        }

        let policy = self.resolver.resolve(&assignment)?;

        // Resolution may itself write (a lazily created course default), and
        // other writers may have run meanwhile. Only cache against markers
        // that did not move while resolving.
        let (after, course_after) = self.markers(assignment_id)?;
        if after.updated_at == assignment.updated_at && course_after == course_updated_at {
            self.cache.insert(
                *assignment_id,
                CachedPolicy {
                    assignment_updated_at: assignment.updated_at,
                    course_updated_at,
                    policy: policy.clone(),
                },
            );
        } else {
            self.cache.remove(assignment_id);
        }

        Ok(policy)
    }

    /// The posting mode in force for an assignment.
    pub fn posting_mode_for(&self, assignment_id: &AssignmentId) -> Result<PostingMode> {
        Ok(self.effective_policy_for(assignment_id)?.posting_mode())
    }

    fn markers(&self, assignment_id: &AssignmentId) -> Result<(Assignment, DateTime<Utc>)> {
        let assignment = self.resolver.assignment(assignment_id)?;
        let course = self
            .resolver
            .policies
            .catalog()
            .course(&assignment.course_id)?
            .ok_or(ValidationError::UnknownCourse(assignment.course_id))?;
        Ok((assignment, course.updated_at))
    }
}
