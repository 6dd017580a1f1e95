//! Course and assignment entities.
//!
//! Only the attributes the post-policy subsystem reads are modelled here. The
//! `updated_at` fields are the freshness markers caches key on.

use chrono::{DateTime, Utc};
use gradepost_core::id::{AssignmentId, CourseId};
use serde::{Deserialize, Serialize};

/// A course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// The unique ID of this course.
    pub id: CourseId,

    /// Display name.
    pub name: String,

    /// When this course, or its default post policy, last changed.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a new course stamped at `at`.
    pub fn new(name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: CourseId::new(),
            name: name.into(),
            updated_at: at,
        }
    }
}

/// An assignment within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The unique ID of this assignment.
    pub id: AssignmentId,

    /// The course that owns this assignment.
    pub course_id: CourseId,

    /// Display title.
    pub title: String,

    /// When this assignment, or its override post policy, last changed.
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// Create a new assignment in `course_id` stamped at `at`.
    pub fn new(course_id: CourseId, title: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: AssignmentId::new(),
            course_id,
            title: title.into(),
            updated_at: at,
        }
    }
}
