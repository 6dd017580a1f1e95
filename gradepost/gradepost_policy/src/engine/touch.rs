//! Freshness marker propagation.
//!
//! A write to an assignment override changes the effective policy of that one
//! assignment, so only the assignment is stamped. A write to a course default
//! can change every assignment without an override, so the course is stamped.

use chrono::{DateTime, Utc};
use gradepost_core::error::Result;
use gradepost_core::id::{AssignmentId, CourseId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::EntityCatalog;
use crate::model::{PolicyScope, PostPolicy};

/// The entity whose marker a policy write stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTarget {
    /// A course, after a write to its default policy.
    Course(CourseId),

    /// An assignment, after a write to its override.
    Assignment(AssignmentId),
}

impl fmt::Display for TouchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course(id) => write!(f, "course {}", id),
            Self::Assignment(id) => write!(f, "assignment {}", id),
        }
    }
}

/// Stamps the owner of a policy with the time of a write.
pub struct TouchPropagator<C> {
    catalog: Arc<C>,
}

impl<C> TouchPropagator<C>
where
    C: EntityCatalog,
{
    /// Create a propagator writing through `catalog`.
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    /// Stamp the owner of `policy` with `at`.
    ///
    /// Exactly one entity is touched: the assignment for an override, the
    /// course for a default. The policy itself is not modified.
    pub fn touch(&self, policy: &PostPolicy, at: DateTime<Utc>) -> Result<TouchTarget> {
        let target = match policy.scope() {
            PolicyScope::Assignment(assignment_id) => {
                self.catalog.touch_assignment(&assignment_id, at)?;
                TouchTarget::Assignment(assignment_id)
            }
            PolicyScope::Course(course_id) => {
                self.catalog.touch_course(&course_id, at)?;
                TouchTarget::Course(course_id)
            }
        };

        debug!(policy_id = %policy.id, owner = %target, at = %at, "touched policy owner");
        Ok(target)
    }
}

impl<C> Clone for TouchPropagator<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::model::NewPostPolicy;
    use chrono::Duration;

    #[test]
    fn test_override_touches_only_assignment() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let yesterday = Utc::now() - Duration::days(1);
        let course = catalog.add_course("Biology", yesterday);
        let assignment = catalog
            .add_assignment(&course.id, "Lab 1", yesterday)
            .unwrap();

        let policy = NewPostPolicy::for_assignment(assignment.id)
            .validate(catalog.as_ref())
            .unwrap()
            .into_record(yesterday);

        let now = Utc::now();
        let propagator = TouchPropagator::new(Arc::clone(&catalog));
        let target = propagator.touch(&policy, now).unwrap();

        assert_eq!(target, TouchTarget::Assignment(assignment.id));
        assert_eq!(
            catalog.assignment(&assignment.id).unwrap().unwrap().updated_at,
            now
        );
        assert_eq!(
            catalog.course(&course.id).unwrap().unwrap().updated_at,
            yesterday
        );
    }

    #[test]
    fn test_default_touches_course() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let yesterday = Utc::now() - Duration::days(1);
        let course = catalog.add_course("Biology", yesterday);
        let assignment = catalog
            .add_assignment(&course.id, "Lab 1", yesterday)
            .unwrap();

        let policy = NewPostPolicy::for_course(course.id)
            .validate(catalog.as_ref())
            .unwrap()
            .into_record(yesterday);

        let now = Utc::now();
        let target = TouchPropagator::new(Arc::clone(&catalog))
            .touch(&policy, now)
            .unwrap();

        assert_eq!(target, TouchTarget::Course(course.id));
        assert_eq!(catalog.course(&course.id).unwrap().unwrap().updated_at, now);
        assert_eq!(
            catalog.assignment(&assignment.id).unwrap().unwrap().updated_at,
            yesterday
        );
    }

    #[test]
    fn test_missing_owner_is_an_error() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let course = catalog.add_course("Biology", Utc::now());
        let assignment = catalog.add_assignment(&course.id, "Lab 1", Utc::now()).unwrap();
        let policy = NewPostPolicy::for_assignment(assignment.id)
            .validate(catalog.as_ref())
            .unwrap()
            .into_record(Utc::now());

        catalog.remove_assignment(&assignment.id);

        let result = TouchPropagator::new(catalog).touch(&policy, Utc::now());
        assert!(result.is_err());
    }
}
