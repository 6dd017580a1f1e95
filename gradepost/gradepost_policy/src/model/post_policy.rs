//! Post policy model.
//!
//! A [`PostPolicy`] is either a course's default (no assignment) or one
//! assignment's override. Writes start from a [`NewPostPolicy`] draft which is
//! normalized and validated into a [`ValidPostPolicy`] before it reaches a store.

use chrono::{DateTime, Utc};
use gradepost_core::error::{Result, ValidationError};
use gradepost_core::id::{AssignmentId, CourseId, PostPolicyId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::EntityCatalog;

/// How grades reach students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostingMode {
    /// Grades are visible as soon as they are entered.
    Automatic,

    /// Grades are held until an instructor posts them.
    Manual,
}

/// The unique key of a policy record.
///
/// A course has at most one `Course` scoped record and an assignment at most
/// one `Assignment` scoped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyScope {
    /// The default policy of a course.
    Course(CourseId),

    /// The override policy of an assignment.
    Assignment(AssignmentId),
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course(id) => write!(f, "course {}", id),
            Self::Assignment(id) => write!(f, "assignment {}", id),
        }
    }
}

/// A stored post policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPolicy {
    /// The unique ID of this policy.
    pub id: PostPolicyId,

    /// The course this policy belongs to. Always set, overrides included.
    pub course_id: CourseId,

    /// The assignment this policy overrides, or `None` for a course default.
    pub assignment_id: Option<AssignmentId>,

    /// Whether grades are held until an instructor posts them.
    pub post_manually: bool,

    /// When this policy was created.
    pub created_at: DateTime<Utc>,

    /// When this policy was last written.
    pub updated_at: DateTime<Utc>,
}

impl PostPolicy {
    /// The scope this policy occupies.
    pub fn scope(&self) -> PolicyScope {
        match self.assignment_id {
            Some(assignment_id) => PolicyScope::Assignment(assignment_id),
            None => PolicyScope::Course(self.course_id),
        }
    }

    /// Whether this is a course default rather than an assignment override.
    pub fn is_course_default(&self) -> bool {
        self.assignment_id.is_none()
    }

    /// The posting mode this policy selects.
    pub fn posting_mode(&self) -> PostingMode {
        if self.post_manually {
            PostingMode::Manual
        } else {
            PostingMode::Automatic
        }
    }
}

/// A policy write before normalization.
///
/// Either reference may be missing; [`NewPostPolicy::validate`] decides
/// whether the pair is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPostPolicy {
    /// The owning course, if the caller knows it.
    pub course_id: Option<CourseId>,

    /// The assignment to override, if any.
    pub assignment_id: Option<AssignmentId>,

    /// Whether grades are held until posted.
    pub post_manually: bool,
}

impl NewPostPolicy {
    /// A draft with both references set.
    pub fn new(course_id: CourseId, assignment_id: AssignmentId) -> Self {
        Self {
            course_id: Some(course_id),
            assignment_id: Some(assignment_id),
            post_manually: false,
        }
    }

    /// A draft for a course default.
    pub fn for_course(course_id: CourseId) -> Self {
        Self {
            course_id: Some(course_id),
            ..Self::default()
        }
    }

    /// A draft for an assignment override; the course is derived on validation.
    pub fn for_assignment(assignment_id: AssignmentId) -> Self {
        Self {
            assignment_id: Some(assignment_id),
            ..Self::default()
        }
    }

    /// Set `post_manually`.
    pub fn post_manually(mut self, post_manually: bool) -> Self {
        self.post_manually = post_manually;
        self
    }

    /// Normalize and validate this draft against the entities it references.
    ///
    /// When only an assignment is given, the course is taken from the
    /// assignment's owner. When both are given they must agree.
    ///
    /// # Errors
    ///
    /// * `MissingCourse` - Neither a course nor an assignment was given.
    /// * `UnknownAssignment` / `UnknownCourse` - A reference does not resolve.
    /// * `CourseMismatch` - The assignment belongs to another course.
    pub fn validate<C>(&self, catalog: &C) -> Result<ValidPostPolicy>
    where
        C: EntityCatalog + ?Sized,
    {
        let course_id = match self.assignment_id {
            Some(assignment_id) => {
                let assignment = catalog
                    .assignment(&assignment_id)?
                    .ok_or(ValidationError::UnknownAssignment(assignment_id))?;

                match self.course_id {
                    Some(given) if given != assignment.course_id => {
                        return Err(ValidationError::CourseMismatch {
                            assignment: assignment_id,
                            given,
                            actual: assignment.course_id,
                        }
                        .into());
                    }
                    _ => assignment.course_id,
                }
            }
            None => self.course_id.ok_or(ValidationError::MissingCourse)?,
        };

        if catalog.course(&course_id)?.is_none() {
            return Err(ValidationError::UnknownCourse(course_id).into());
        }

        Ok(ValidPostPolicy {
            course_id,
            assignment_id: self.assignment_id,
            post_manually: self.post_manually,
        })
    }
}

/// A draft that passed validation; the course is always resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidPostPolicy {
    course_id: CourseId,
    assignment_id: Option<AssignmentId>,
    post_manually: bool,
}

impl ValidPostPolicy {
    /// The resolved owning course.
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// The assignment being overridden, if any.
    pub fn assignment_id(&self) -> Option<AssignmentId> {
        self.assignment_id
    }

    /// The requested `post_manually` value.
    pub fn post_manually(&self) -> bool {
        self.post_manually
    }

    /// The scope the record will occupy.
    pub fn scope(&self) -> PolicyScope {
        match self.assignment_id {
            Some(assignment_id) => PolicyScope::Assignment(assignment_id),
            None => PolicyScope::Course(self.course_id),
        }
    }

    /// Build a fresh record stamped at `at`.
    pub fn into_record(self, at: DateTime<Utc>) -> PostPolicy {
        PostPolicy {
            id: PostPolicyId::new(),
            course_id: self.course_id,
            assignment_id: self.assignment_id,
            post_manually: self.post_manually,
            created_at: at,
            updated_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use gradepost_core::Error;

    fn setup() -> (InMemoryCatalog, CourseId, AssignmentId) {
        let catalog = InMemoryCatalog::new();
        let course = catalog.add_course("Biology", Utc::now());
        let assignment = catalog
            .add_assignment(&course.id, "!!!", Utc::now())
            .unwrap();
        (catalog, course.id, assignment.id)
    }

    #[test]
    fn test_valid_with_course_and_assignment() {
        let (catalog, course_id, assignment_id) = setup();
        let valid = NewPostPolicy::new(course_id, assignment_id)
            .validate(&catalog)
            .unwrap();
        assert_eq!(valid.course_id(), course_id);
        assert_eq!(valid.scope(), PolicyScope::Assignment(assignment_id));
    }

    #[test]
    fn test_valid_with_course_only() {
        let (catalog, course_id, _) = setup();
        let valid = NewPostPolicy::for_course(course_id)
            .validate(&catalog)
            .unwrap();
        assert_eq!(valid.assignment_id(), None);
        assert_eq!(valid.scope(), PolicyScope::Course(course_id));
    }

    #[test]
    fn test_course_derived_from_assignment() {
        let (catalog, course_id, assignment_id) = setup();
        let valid = NewPostPolicy::for_assignment(assignment_id)
            .post_manually(true)
            .validate(&catalog)
            .unwrap();
        assert_eq!(valid.course_id(), course_id);
        assert!(valid.post_manually());
    }

    #[test]
    fn test_missing_course_rejected() {
        let (catalog, _, _) = setup();
        let err = NewPostPolicy::default().validate(&catalog).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingCourse)
        ));
    }

    #[test]
    fn test_unknown_references_rejected() {
        let (catalog, course_id, _) = setup();

        let err = NewPostPolicy::for_course(CourseId::new())
            .validate(&catalog)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownCourse(_))
        ));

        let err = NewPostPolicy::new(course_id, AssignmentId::new())
            .validate(&catalog)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownAssignment(_))
        ));
    }

    #[test]
    fn test_assignment_from_another_course_rejected() {
        let (catalog, _, assignment_id) = setup();
        let other = catalog.add_course("Chemistry", Utc::now());
        let err = NewPostPolicy::new(other.id, assignment_id)
            .validate(&catalog)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::CourseMismatch { .. })
        ));
    }

    #[test]
    fn test_record_scope_and_mode() {
        let (catalog, course_id, assignment_id) = setup();
        let now = Utc::now();

        let default = NewPostPolicy::for_course(course_id)
            .validate(&catalog)
            .unwrap()
            .into_record(now);
        assert!(default.is_course_default());
        assert_eq!(default.scope(), PolicyScope::Course(course_id));
        assert_eq!(default.posting_mode(), PostingMode::Automatic);
        assert_eq!(default.created_at, default.updated_at);

        let override_policy = NewPostPolicy::for_assignment(assignment_id)
            .post_manually(true)
            .validate(&catalog)
            .unwrap()
            .into_record(now);
        assert!(!override_policy.is_course_default());
        assert_eq!(override_policy.course_id, course_id);
        assert_eq!(override_policy.posting_mode(), PostingMode::Manual);
    }
}
