//! In-memory post policy store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gradepost_core::error::{Result, StoreError};
use gradepost_core::id::CourseId;
use std::sync::Arc;

use super::PostPolicyStore;
use crate::model::{PolicyScope, PostPolicy};

/// An in-memory post policy store.
#[derive(Clone)]
pub struct InMemoryPostPolicyStore {
    /// The policies, indexed by scope.
    policies: Arc<DashMap<PolicyScope, PostPolicy>>,
}

impl InMemoryPostPolicyStore {
    /// Create a new in-memory post policy store.
    pub fn new() -> Self {
        Self {
            policies: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for InMemoryPostPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostPolicyStore for InMemoryPostPolicyStore {
    fn get(&self, scope: &PolicyScope) -> Result<Option<PostPolicy>> {
        Ok(self.policies.get(scope).map(|p| p.value().clone()))
    }

    fn insert<F>(&self, mut policy: PostPolicy, commit: F) -> Result<PostPolicy>
    where
        F: FnOnce(&mut PostPolicy) -> Result<()>,
    {
        // The entry holds the shard lock, so check-and-insert is atomic.
        match self.policies.entry(policy.scope()) {
            Entry::Occupied(entry) => {
                Err(StoreError::UniqueViolation(entry.key().to_string()).into())
            }
            Entry::Vacant(entry) => {
                commit(&mut policy)?;
                entry.insert(policy.clone());
                Ok(policy)
            }
        }
    }

    fn update<F>(&self, scope: &PolicyScope, apply: F) -> Result<PostPolicy>
    where
        F: FnOnce(&mut PostPolicy) -> Result<()>,
    {
        let mut stored = self
            .policies
            .get_mut(scope)
            .ok_or_else(|| StoreError::NotFound(scope.to_string()))?;

        let mut next = stored.value().clone();
        apply(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }

    fn remove<F>(&self, scope: &PolicyScope, commit: F) -> Result<Option<PostPolicy>>
    where
        F: FnOnce(&PostPolicy) -> Result<()>,
    {
        match self.policies.entry(*scope) {
            Entry::Occupied(entry) => {
                commit(entry.get())?;
                Ok(Some(entry.remove()))
            }
            Entry::Vacant(_) => Ok(None),
        }
    }

    fn list_for_course(&self, course_id: &CourseId) -> Result<Vec<PostPolicy>> {
        let policies = self
            .policies
            .iter()
            .filter(|p| p.course_id == *course_id)
            .map(|p| p.value().clone())
            .collect();

        Ok(policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use gradepost_core::id::{AssignmentId, PostPolicyId};
    use gradepost_core::Error;

    fn course_default(course_id: CourseId) -> PostPolicy {
        let now = Utc::now();
        PostPolicy {
            id: PostPolicyId::new(),
            course_id,
            assignment_id: None,
            post_manually: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn assignment_override(course_id: CourseId) -> PostPolicy {
        PostPolicy {
            assignment_id: Some(AssignmentId::new()),
            post_manually: true,
            ..course_default(course_id)
        }
    }

    fn unavailable() -> Error {
        StoreError::Backend("unavailable".to_string()).into()
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryPostPolicyStore::new();
        let policy = course_default(CourseId::new());

        let inserted = store.insert(policy.clone(), |_| Ok(())).unwrap();
        assert_eq!(inserted, policy);

        let retrieved = store.get(&policy.scope()).unwrap().unwrap();
        assert_eq!(retrieved, policy);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_keeps_commit_changes() {
        let store = InMemoryPostPolicyStore::new();
        let policy = course_default(CourseId::new());

        let inserted = store
            .insert(policy.clone(), |p| {
                p.post_manually = true;
                Ok(())
            })
            .unwrap();

        assert!(inserted.post_manually);
        assert!(store.get(&policy.scope()).unwrap().unwrap().post_manually);
    }

    #[test]
    fn test_insert_rejects_second_record_for_scope() {
        let store = InMemoryPostPolicyStore::new();
        let course_id = CourseId::new();

        store.insert(course_default(course_id), |_| Ok(())).unwrap();
        let result = store.insert(course_default(course_id), |_| {
            panic!("commit must not run for an occupied scope")
        });

        assert!(matches!(
            result,
            Err(Error::Store(StoreError::UniqueViolation(_)))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_insert_commit_leaves_scope_free() {
        let store = InMemoryPostPolicyStore::new();
        let policy = course_default(CourseId::new());

        let result = store.insert(policy.clone(), |_| Err(unavailable()));

        assert!(matches!(
            result,
            Err(Error::Store(StoreError::Backend(_)))
        ));
        assert!(store.is_empty());
        store.insert(policy, |_| Ok(())).unwrap();
    }

    #[test]
    fn test_update_applies_changes() {
        let store = InMemoryPostPolicyStore::new();
        let policy = store
            .insert(course_default(CourseId::new()), |_| Ok(()))
            .unwrap();

        let updated = store
            .update(&policy.scope(), |p| {
                p.post_manually = true;
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.id, policy.id);
        assert!(updated.post_manually);
        assert!(store.get(&policy.scope()).unwrap().unwrap().post_manually);
    }

    #[test]
    fn test_update_missing_scope() {
        let store = InMemoryPostPolicyStore::new();
        let scope = course_default(CourseId::new()).scope();

        assert!(matches!(
            store.update(&scope, |_| Ok(())),
            Err(Error::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_failed_update_keeps_stored_record() {
        let store = InMemoryPostPolicyStore::new();
        let policy = store
            .insert(course_default(CourseId::new()), |_| Ok(()))
            .unwrap();

        let result = store.update(&policy.scope(), |p| {
            p.post_manually = true;
            p.updated_at += Duration::hours(1);
            Err(unavailable())
        });

        assert!(result.is_err());
        assert_eq!(store.get(&policy.scope()).unwrap().unwrap(), policy);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryPostPolicyStore::new();
        let policy = store
            .insert(assignment_override(CourseId::new()), |_| Ok(()))
            .unwrap();

        assert_eq!(
            store.remove(&policy.scope(), |_| Ok(())).unwrap(),
            Some(policy.clone())
        );
        assert_eq!(store.remove(&policy.scope(), |_| Ok(())).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_remove_commit_keeps_record() {
        let store = InMemoryPostPolicyStore::new();
        let policy = store
            .insert(assignment_override(CourseId::new()), |_| Ok(()))
            .unwrap();

        assert!(store.remove(&policy.scope(), |_| Err(unavailable())).is_err());
        assert_eq!(store.get(&policy.scope()).unwrap(), Some(policy));
    }

    #[test]
    fn test_list_for_course() {
        let store = InMemoryPostPolicyStore::new();
        let course_id = CourseId::new();

        store.insert(course_default(course_id), |_| Ok(())).unwrap();
        store.insert(assignment_override(course_id), |_| Ok(())).unwrap();
        store.insert(assignment_override(course_id), |_| Ok(())).unwrap();
        store.insert(course_default(CourseId::new()), |_| Ok(())).unwrap();

        let policies = store.list_for_course(&course_id).unwrap();
        assert_eq!(policies.len(), 3);
        assert_eq!(policies.iter().filter(|p| p.is_course_default()).count(), 1);
    }
}
