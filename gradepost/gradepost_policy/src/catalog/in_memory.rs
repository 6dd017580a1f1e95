//! In-memory entity catalog.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use gradepost_core::error::{Result, ValidationError};
use gradepost_core::id::{AssignmentId, CourseId};
use std::sync::Arc;

use super::EntityCatalog;
use crate::model::{Assignment, Course};

/// An in-memory catalog of courses and assignments.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    courses: Arc<DashMap<CourseId, Course>>,
    assignments: Arc<DashMap<AssignmentId, Assignment>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a course.
    pub fn add_course(&self, name: impl Into<String>, at: DateTime<Utc>) -> Course {
        let course = Course::new(name, at);
        self.courses.insert(course.id, course.clone());
        course
    }

    /// Create and register an assignment in an existing course.
    pub fn add_assignment(
        &self,
        course_id: &CourseId,
        title: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Assignment> {
        if !self.courses.contains_key(course_id) {
            return Err(ValidationError::UnknownCourse(*course_id).into());
        }

        let assignment = Assignment::new(*course_id, title, at);
        self.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    /// Remove an assignment, returning it if it existed.
    ///
    /// Only the catalog entry goes. An override for the assignment stays in
    /// the policy store until [`PostPolicies::remove_override`] drops it, so
    /// callers deleting an assignment call both.
    ///
    /// [`PostPolicies::remove_override`]: crate::engine::PostPolicies::remove_override
    pub fn remove_assignment(&self, assignment_id: &AssignmentId) -> Option<Assignment> {
        self.assignments
            .remove(assignment_id)
            .map(|(_, assignment)| assignment)
    }
}

impl EntityCatalog for InMemoryCatalog {
    fn course(&self, course_id: &CourseId) -> Result<Option<Course>> {
        Ok(self.courses.get(course_id).map(|c| c.value().clone()))
    }

    fn assignment(&self, assignment_id: &AssignmentId) -> Result<Option<Assignment>> {
        Ok(self.assignments.get(assignment_id).map(|a| a.value().clone()))
    }

    fn touch_course(&self, course_id: &CourseId, at: DateTime<Utc>) -> Result<()> {
        let mut course = self
            .courses
            .get_mut(course_id)
            .ok_or(ValidationError::UnknownCourse(*course_id))?;
        course.updated_at = at;
        Ok(())
    }

    fn touch_assignment(&self, assignment_id: &AssignmentId, at: DateTime<Utc>) -> Result<()> {
        let mut assignment = self
            .assignments
            .get_mut(assignment_id)
            .ok_or(ValidationError::UnknownAssignment(*assignment_id))?;
        assignment.updated_at = at;
        Ok(())
    }
}
