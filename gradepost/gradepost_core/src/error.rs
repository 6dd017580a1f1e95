//! Error types for gradepost.
//!
//! Errors are grouped by subsystem. The root [`Error`] wraps each of them so
//! callers can propagate with `?` and still match on the specific kind.

use crate::id::{AssignmentId, CourseId};
use thiserror::Error;

/// Root error type for gradepost.
#[derive(Debug, Error)]
pub enum Error {
    /// A write was rejected before reaching storage
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Policy persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Setting store errors
    #[error("Setting error: {0}")]
    Setting(#[from] SettingError),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a policy write is rejected.
///
/// None of these are transient; retrying the same write fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No course was given and none could be derived from an assignment
    #[error("post policy must belong to a course")]
    MissingCourse,

    /// The scope already has a policy and the caller asked for a strict create
    #[error("a post policy already exists for {0}")]
    DuplicateScope(String),

    /// The given assignment belongs to a different course
    #[error("assignment {assignment} belongs to course {actual}, not {given}")]
    CourseMismatch {
        /// The assignment the policy is scoped to
        assignment: AssignmentId,
        /// The course the caller supplied
        given: CourseId,
        /// The course that owns the assignment
        actual: CourseId,
    },

    /// The referenced course does not exist
    #[error("course not found: {0}")]
    UnknownCourse(CourseId),

    /// The referenced assignment does not exist
    #[error("assignment not found: {0}")]
    UnknownAssignment(AssignmentId),
}

/// Errors raised by policy persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another writer created a record for the same scope first
    #[error("unique scope violation: {0}")]
    UniqueViolation(String),

    /// The record to update no longer exists
    #[error("post policy not found: {0}")]
    NotFound(String),

    /// Concurrent creators kept winning the race for a scope
    #[error("gave up on {scope} after {attempts} attempts")]
    RetriesExhausted {
        /// The contested scope
        scope: String,
        /// How many attempts were made
        attempts: u32,
    },

    /// The underlying storage failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised by the setting store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    /// The setting store could not be read or written
    #[error("setting storage error: {0}")]
    Storage(String),
}

/// Result type used throughout gradepost.
pub type Result<T> = std::result::Result<T, Error>;
