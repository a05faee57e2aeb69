// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The Remote Data Service contract consumed by the engines.
//!
//! This is an abstract data contract, not a wire format. Production code
//! provides an implementation backed by real storage; tests provide a
//! scriptable mock. Two quirks of the contract are load-bearing:
//!
//! - `create_class` does not echo the new identifier; callers re-resolve
//!   it via `find_classes` keyed on `(name, academic_year, branch_id)`.
//!   A backend that echoes the identifier could collapse the two calls
//!   behind this same trait.
//! - `convert_enquiry` must be atomic: the admission insert and the
//!   enquiry status flip are one logical operation. An admission without
//!   a converted enquiry (or vice versa) is a contract violation.

use enrol_domain::{
    AcademicYear, AdmissionRecord, BranchId, ClassId, ClassRecord, Course, CourseId, EnquiryId,
    EnquiryRecord, EnquiryStatus, GradeLevel, NewClass, Teacher,
};

/// Broad classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The service understood the request and refused it.
    Rejected,
    /// The addressed record does not exist.
    NotFound,
    /// The request never completed (connectivity, timeout, serialization).
    Transport,
}

impl ServiceErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::NotFound => "not_found",
            Self::Transport => "transport",
        }
    }
}

/// A structured failure reported by the Remote Data Service.
///
/// The fields mirror what hosted backends typically return: a primary
/// message, nested detail fields, and the raw response payload. All of
/// them are optional; display normalization walks them in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    /// Broad failure classification.
    pub kind: ServiceErrorKind,
    /// Primary human-readable message, if the service supplied one.
    pub message: Option<String>,
    /// Nested detail text, if any.
    pub details: Option<String>,
    /// Remediation hint, if any.
    pub hint: Option<String>,
    /// The raw structured payload, preserved for diagnostics.
    pub payload: Option<serde_json::Value>,
}

impl ServiceError {
    /// Creates a rejection error with a primary message.
    #[must_use]
    pub fn rejected(message: &str) -> Self {
        Self {
            kind: ServiceErrorKind::Rejected,
            message: Some(message.to_string()),
            details: None,
            hint: None,
            payload: None,
        }
    }

    /// Creates a not-found error for a missing record.
    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self {
            kind: ServiceErrorKind::NotFound,
            message: Some(message.to_string()),
            details: None,
            hint: None,
            payload: None,
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: &str) -> Self {
        Self {
            kind: ServiceErrorKind::Transport,
            message: Some(message.to_string()),
            details: None,
            hint: None,
            payload: None,
        }
    }

    /// Attaches nested detail text.
    #[must_use]
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }

    /// Attaches a remediation hint.
    #[must_use]
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    /// Attaches the raw structured payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({})", message, self.kind.as_str()),
            None => write!(f, "remote data service error ({})", self.kind.as_str()),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The abstract Remote Data Service consumed by both engines.
pub trait RemoteDataService {
    /// Fetches an enquiry by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the enquiry does not exist or the call fails.
    fn fetch_enquiry(&self, id: EnquiryId) -> Result<EnquiryRecord, ServiceError>;

    /// Updates an enquiry's status and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the enquiry does not exist or the update is
    /// refused.
    fn update_enquiry_status(
        &mut self,
        id: EnquiryId,
        status: EnquiryStatus,
    ) -> Result<EnquiryRecord, ServiceError>;

    /// Converts an approved enquiry into an admission record.
    ///
    /// Implementations must perform the admission insert and the enquiry
    /// status flip as one atomic operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the enquiry does not exist, is not approved, or
    /// the conversion fails; on failure neither side of the conversion may
    /// be visible.
    fn convert_enquiry(&mut self, id: EnquiryId) -> Result<AdmissionRecord, ServiceError>;

    /// Creates a class. The new identifier is not echoed back.
    ///
    /// # Errors
    ///
    /// Returns an error if creation is refused or fails.
    fn create_class(&mut self, class: &NewClass) -> Result<(), ServiceError>;

    /// Finds classes by the `(name, academic_year, branch_id)` join key.
    ///
    /// Implementations return all matches; callers select among them
    /// (the engines take the most recently created).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails. An empty result is not an
    /// error.
    fn find_classes(
        &self,
        name: &str,
        academic_year: &AcademicYear,
        branch_id: BranchId,
    ) -> Result<Vec<ClassRecord>, ServiceError>;

    /// Records the subject mappings for a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the class does not exist or the mapping fails.
    fn map_class_subjects(
        &mut self,
        class_id: ClassId,
        subject_ids: &[CourseId],
    ) -> Result<(), ServiceError>;

    /// Lists teachers available for assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn list_teachers(&self) -> Result<Vec<Teacher>, ServiceError>;

    /// Lists courses, optionally filtered by grade level.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn list_courses(&self, grade: Option<GradeLevel>) -> Result<Vec<Course>, ServiceError>;
}
