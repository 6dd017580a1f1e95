//! Strongly-typed identifiers for gradepost.
//!
//! Each identifier type is a thin wrapper around a UUID with a phantom
//! marker, so a course id can never be passed where an assignment id is
//! expected.
//!
//! # Examples
//!
//! ```
//! use gradepost_core::id::{AssignmentId, CourseId};
//! use std::str::FromStr;
//!
//! let course_id = CourseId::new();
//! let assignment_id = AssignmentId::new();
//! assert_ne!(course_id.to_string(), assignment_id.to_string());
//!
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let course_id = CourseId::from_str(id_str).unwrap();
//! assert_eq!(course_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
///
/// The marker `T` only exists at the type level; equality, hashing and
/// ordering all go through the UUID.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create an identifier from a specific UUID.
    ///
    /// Used when an id comes back from storage or from an external system.
    ///
    /// ```
    /// use gradepost_core::id::CourseId;
    /// use uuid::Uuid;
    ///
    /// let uuid = Uuid::new_v4();
    /// let id = CourseId::from_uuid(uuid);
    /// assert_eq!(id.uuid(), uuid);
    /// ```
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.uuid)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::parse_str(s)?))
    }
}

/// Marker type for courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CourseMarker;
/// Identifier for a course.
pub type CourseId = Id<CourseMarker>;

/// Marker type for assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssignmentMarker;
/// Identifier for an assignment.
pub type AssignmentId = Id<AssignmentMarker>;

/// Marker type for post policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostPolicyMarker;
/// Identifier for a post policy record.
pub type PostPolicyId = Id<PostPolicyMarker>;
