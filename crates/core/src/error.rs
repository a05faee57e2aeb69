// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::service::ServiceError;
use enrol_domain::{ClassId, DomainError};

/// Errors that can occur while driving the engines.
///
/// The partial-commit variants are deliberately distinct from plain remote
/// failures: recovery differs (retry the whole operation vs. complete the
/// missing step vs. manual reconciliation).
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A previous operation on this instance has not settled yet.
    OperationInFlight {
        /// The operation that was refused.
        operation: &'static str,
    },
    /// Submission requires a branch context and none was supplied.
    MissingBranchContext,
    /// The current step's required fields are unset.
    StepIncomplete {
        /// The gating step.
        step: &'static str,
    },
    /// Submission was requested away from the final step.
    SubmitUnavailable {
        /// The step the wizard is currently on.
        step: &'static str,
    },
    /// The Remote Data Service reported a failure, surfaced unchanged.
    Remote(ServiceError),
    /// Class creation was refused or failed; nothing was committed.
    ClassCreateFailed(ServiceError),
    /// The class was created but could not be located afterwards.
    ///
    /// Distinct from `ClassCreateFailed`: retrying the create would
    /// duplicate the class; this state needs reconciliation instead.
    ClassUnresolvable {
        /// The derived class name used as the lookup key.
        name: String,
        /// The academic year scope of the lookup.
        academic_year: String,
        /// The lookup failure, when the lookup call itself failed rather
        /// than returning no match.
        error: Option<ServiceError>,
    },
    /// The class was created and resolved, but subject mapping failed.
    ///
    /// The class record remains in place; the operator must complete the
    /// subject mapping manually or retry just that step.
    SubjectMappingFailed {
        /// The created class.
        class_id: ClassId,
        /// The mapping failure.
        error: ServiceError,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::OperationInFlight { operation } => {
                write!(f, "Operation '{operation}' is already in flight")
            }
            Self::MissingBranchContext => {
                write!(f, "A branch context is required to submit a class")
            }
            Self::StepIncomplete { step } => {
                write!(f, "Step '{step}' has unset required fields")
            }
            Self::SubmitUnavailable { step } => {
                write!(f, "Submission is only available from the final step (currently on '{step}')")
            }
            Self::Remote(err) => write!(f, "Remote data service error: {err}"),
            Self::ClassCreateFailed(err) => write!(f, "Class creation failed: {err}"),
            Self::ClassUnresolvable {
                name,
                academic_year,
                error,
            } => match error {
                Some(err) => write!(
                    f,
                    "Class '{name}' for {academic_year} was created but the lookup failed: {err}"
                ),
                None => write!(
                    f,
                    "Class '{name}' for {academic_year} was created but could not be located"
                ),
            },
            Self::SubjectMappingFailed { class_id, error } => {
                write!(
                    f,
                    "Class {class_id} was created but subject mapping failed: {error}"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
