//! Post policy service.
//!
//! All policy writes go through [`PostPolicies`]: drafts are normalized and
//! validated, then persisted under the scope's unique key. The record is
//! stamped and its owner touched inside the store write, so a write whose
//! touch fails is not kept, and writes to one scope stamp and touch in the
//! order they land.
//!
//! `create_or_update` upserts: a write to an occupied scope updates the stored
//! record. `create` is strict and rejects an occupied scope with
//! `ValidationError::DuplicateScope`.

use gradepost_core::clock::{Clock, SystemClock};
use gradepost_core::error::{Error, Result, StoreError, ValidationError};
use gradepost_core::id::{AssignmentId, CourseId, PostPolicyId};
use gradepost_core::utils::PostPolicyConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::touch::TouchPropagator;
use crate::catalog::EntityCatalog;
use crate::model::{NewPostPolicy, PolicyScope, PostPolicy};
use crate::store::PostPolicyStore;

/// Creates, updates and looks up post policies.
pub struct PostPolicies<S, C> {
    /// Policy persistence.
    store: Arc<S>,

    /// Courses and assignments.
    catalog: Arc<C>,

    /// Stamps owners on each write.
    touch: TouchPropagator<C>,

    /// Source of mutation timestamps.
    clock: Arc<dyn Clock>,

    config: PostPolicyConfig,
}

impl<S, C> PostPolicies<S, C>
where
    S: PostPolicyStore,
    C: EntityCatalog,
{
    /// Create a new service using the system clock.
    pub fn new(store: Arc<S>, catalog: Arc<C>, config: PostPolicyConfig) -> Self {
        Self {
            store,
            touch: TouchPropagator::new(Arc::clone(&catalog)),
            catalog,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the clock used to stamp writes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The entity catalog this service writes through.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The active configuration.
    pub fn config(&self) -> &PostPolicyConfig {
        &self.config
    }

    /// Create a policy, failing if its scope already has one.
    ///
    /// # Errors
    ///
    /// * `DuplicateScope` - The course already has a default, or the
    ///   assignment already has an override.
    /// * Any error from [`NewPostPolicy::validate`].
    pub fn create(&self, draft: NewPostPolicy) -> Result<PostPolicy> {
        let valid = draft.validate(self.catalog.as_ref())?;
        let scope = valid.scope();

        if self.store.get(&scope)?.is_some() {
            return Err(ValidationError::DuplicateScope(scope.to_string()).into());
        }

        let record = valid.into_record(self.clock.now());
        let policy = match self.store.insert(record, |p| self.stamp_new(p)) {
            Ok(policy) => policy,
            Err(Error::Store(StoreError::UniqueViolation(_))) => {
                return Err(ValidationError::DuplicateScope(scope.to_string()).into());
            }
            Err(e) => return Err(e),
        };

        info!(policy_id = %policy.id, scope = %scope, post_manually = policy.post_manually, "created post policy");
        Ok(policy)
    }

    /// Create a policy, or update the one already occupying its scope.
    ///
    /// The stored record keeps its id and `created_at`; `post_manually` and
    /// `updated_at` are overwritten. A lost race against a concurrent creator
    /// or remover is retried, up to `max_create_attempts` attempts in total.
    pub fn create_or_update(&self, draft: NewPostPolicy) -> Result<PostPolicy> {
        let valid = draft.validate(self.catalog.as_ref())?;
        let scope = valid.scope();
        let attempts = self.config.max_create_attempts;

        for attempt in 1..=attempts {
            if self.store.get(&scope)?.is_some() {
                let updated = self.store.update(&scope, |existing| {
                    existing.post_manually = valid.post_manually();
                    self.stamp(existing)
                });

                match updated {
                    Ok(policy) => {
                        debug!(policy_id = %policy.id, scope = %scope, post_manually = policy.post_manually, "updated post policy");
                        return Ok(policy);
                    }
                    Err(Error::Store(StoreError::NotFound(_))) => {
                        warn!(scope = %scope, attempt, "post policy vanished during update, retrying");
                    }
                    Err(e) => return Err(e),
                }
            } else {
                let record = valid.into_record(self.clock.now());

                match self.store.insert(record, |p| self.stamp_new(p)) {
                    Ok(policy) => {
                        info!(policy_id = %policy.id, scope = %scope, post_manually = policy.post_manually, "created post policy");
                        return Ok(policy);
                    }
                    Err(Error::Store(StoreError::UniqueViolation(_))) => {
                        warn!(scope = %scope, attempt, "lost race creating post policy, retrying");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Err(StoreError::RetriesExhausted {
            scope: scope.to_string(),
            attempts,
        }
        .into())
    }

    /// The default policy of a course, created on first access.
    ///
    /// A lazily created default uses `default_post_manually` from the
    /// configuration. Concurrent first accesses all return the same record.
    pub fn default_for(&self, course_id: &CourseId) -> Result<PostPolicy> {
        let scope = PolicyScope::Course(*course_id);
        if let Some(policy) = self.store.get(&scope)? {
            return Ok(policy);
        }

        if self.catalog.course(course_id)?.is_none() {
            return Err(ValidationError::UnknownCourse(*course_id).into());
        }

        let attempts = self.config.max_create_attempts;
        for attempt in 1..=attempts {
            let now = self.clock.now();
            let record = PostPolicy {
                id: PostPolicyId::new(),
                course_id: *course_id,
                assignment_id: None,
                post_manually: self.config.default_post_manually,
                created_at: now,
                updated_at: now,
            };

            match self.store.insert(record, |p| self.stamp_new(p)) {
                Ok(policy) => {
                    info!(policy_id = %policy.id, course_id = %course_id, "created default post policy");
                    return Ok(policy);
                }
                Err(Error::Store(StoreError::UniqueViolation(_))) => {
                    debug!(course_id = %course_id, attempt, "default post policy created concurrently");
                    if let Some(existing) = self.store.get(&scope)? {
                        return Ok(existing);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::RetriesExhausted {
            scope: scope.to_string(),
            attempts,
        }
        .into())
    }

    /// The override policy of an assignment, if it has one.
    pub fn override_for(&self, assignment_id: &AssignmentId) -> Result<Option<PostPolicy>> {
        self.store.get(&PolicyScope::Assignment(*assignment_id))
    }

    /// Every policy belonging to a course: its default and all overrides.
    pub fn policies_for(&self, course_id: &CourseId) -> Result<Vec<PostPolicy>> {
        self.store.list_for_course(course_id)
    }

    /// Remove an assignment's override.
    ///
    /// If the assignment still exists its marker is touched, since it now
    /// resolves through the course default. Removing an assignment that is
    /// already gone from the catalog only drops the policy. If the touch
    /// fails the override stays in place.
    pub fn remove_override(&self, assignment_id: &AssignmentId) -> Result<Option<PostPolicy>> {
        let scope = PolicyScope::Assignment(*assignment_id);
        let removed = self.store.remove(&scope, |policy| {
            if self.catalog.assignment(assignment_id)?.is_some() {
                self.touch.touch(policy, self.clock.now())?;
            }
            Ok(())
        })?;

        if let Some(policy) = &removed {
            info!(policy_id = %policy.id, assignment_id = %assignment_id, "removed post policy override");
        }

        Ok(removed)
    }

    /// Stamp a record being written and touch its owner.
    ///
    /// Called from inside the store write, while the scope is held.
    fn stamp(&self, policy: &mut PostPolicy) -> Result<()> {
        let now = self.clock.now();
        policy.updated_at = now;
        self.touch.touch(policy, now)?;
        Ok(())
    }

    /// [`stamp`](Self::stamp) for a record that does not exist yet.
    fn stamp_new(&self, policy: &mut PostPolicy) -> Result<()> {
        self.stamp(policy)?;
        policy.created_at = policy.updated_at;
        Ok(())
    }
}
