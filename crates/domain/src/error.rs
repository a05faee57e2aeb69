// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Enquiry status string is not a recognized status.
    InvalidEnquiryStatus(String),
    /// Status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is refused.
        reason: String,
    },
    /// Grade level string is not within the supported range.
    InvalidGradeLevel(String),
    /// Academic year is not a valid `YYYY-YYYY` span.
    InvalidAcademicYear(String),
    /// Section identifier is empty or invalid.
    InvalidSection(String),
    /// Class capacity must be a positive integer.
    InvalidCapacity {
        /// The invalid capacity value.
        capacity: u32,
    },
    /// Course does not belong to the draft's grade level.
    SubjectNotInGrade {
        /// The offending course identifier.
        course_id: i64,
        /// The grade level the draft targets.
        grade: String,
    },
    /// Course identifier is unknown to the catalog in use.
    CourseNotFound {
        /// The missing course identifier.
        course_id: i64,
    },
    /// Draft is missing a field required for submission.
    IncompleteDraft {
        /// The missing field.
        field: &'static str,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnquiryStatus(status) => {
                write!(f, "Invalid enquiry status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition enquiry from '{from}' to '{to}': {reason}")
            }
            Self::InvalidGradeLevel(grade) => write!(f, "Invalid grade level: '{grade}'"),
            Self::InvalidAcademicYear(msg) => write!(f, "Invalid academic year: {msg}"),
            Self::InvalidSection(msg) => write!(f, "Invalid section: {msg}"),
            Self::InvalidCapacity { capacity } => {
                write!(f, "Invalid capacity: {capacity}. Must be greater than 0")
            }
            Self::SubjectNotInGrade { course_id, grade } => {
                write!(f, "Course {course_id} does not belong to grade {grade}")
            }
            Self::CourseNotFound { course_id } => {
                write!(f, "Course {course_id} not found in the course catalog")
            }
            Self::IncompleteDraft { field } => {
                write!(f, "Class draft is missing required field: {field}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
