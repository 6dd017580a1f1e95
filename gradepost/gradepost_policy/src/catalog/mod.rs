//! Access to courses and assignments.
//!
//! Courses and assignments are owned elsewhere. The policy subsystem only
//! needs to look them up and bump their freshness markers.

mod in_memory;

pub use in_memory::InMemoryCatalog;

use chrono::{DateTime, Utc};
use gradepost_core::error::Result;
use gradepost_core::id::{AssignmentId, CourseId};

use crate::model::{Assignment, Course};

/// Trait for the course and assignment collaborators.
pub trait EntityCatalog: Send + Sync {
    /// Look up a course.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Course))` - The course.
    /// * `Ok(None)` - No such course.
    /// * `Err` - If the lookup itself failed.
    fn course(&self, course_id: &CourseId) -> Result<Option<Course>>;

    /// Look up an assignment.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Assignment))` - The assignment.
    /// * `Ok(None)` - No such assignment.
    /// * `Err` - If the lookup itself failed.
    fn assignment(&self, assignment_id: &AssignmentId) -> Result<Option<Assignment>>;

    /// Set a course's `updated_at` marker.
    ///
    /// Fails with `UnknownCourse` if the course does not exist.
    fn touch_course(&self, course_id: &CourseId, at: DateTime<Utc>) -> Result<()>;

    /// Set an assignment's `updated_at` marker.
    ///
    /// Fails with `UnknownAssignment` if the assignment does not exist.
    fn touch_assignment(&self, assignment_id: &AssignmentId, at: DateTime<Utc>) -> Result<()>;
}
