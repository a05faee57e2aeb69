// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API error taxonomy.
//!
//! Local validation failures and authorization refusals never reach the
//! Remote Data Service; remote and partial-commit failures carry an
//! already-normalized operator message.

use crate::normalize::normalize_remote_error;
use enrol::CoreError;
use enrol_domain::DomainError;
use thiserror::Error;

/// Which half-finished state a partial commit left behind.
///
/// The distinction matters because recovery differs: an unlocatable class
/// needs reconciliation, while incomplete mapping needs just the mapping
/// step repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialCommitKind {
    /// The class was created but could not be located afterwards.
    CreatedButUnlocatable,
    /// The class exists but its subject mappings were not recorded.
    MappingIncomplete,
}

impl PartialCommitKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedButUnlocatable => "created_but_unlocatable",
            Self::MappingIncomplete => "mapping_incomplete",
        }
    }
}

/// Errors surfaced across the API boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },

    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },

    /// The request was malformed or refused by local validation.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// A domain rule was violated.
    #[error("Domain rule violation: {0}")]
    DomainRuleViolation(DomainError),

    /// The Remote Data Service rejected the operation outright.
    #[error("Remote data service error: {message}")]
    RemoteRejected {
        /// Normalized operator-facing message.
        message: String,
    },

    /// A multi-step operation committed partway.
    #[error("{message}")]
    PartialCommit {
        /// Which partial state was left behind.
        kind: PartialCommitKind,
        /// Normalized operator-facing message.
        message: String,
    },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::DomainRuleViolation(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::DomainRuleViolation(domain),
            CoreError::OperationInFlight { operation } => Self::InvalidInput {
                message: format!("operation '{operation}' is already in flight"),
            },
            CoreError::MissingBranchContext => Self::InvalidInput {
                message: String::from("a branch context is required"),
            },
            CoreError::StepIncomplete { step } => Self::InvalidInput {
                message: format!("step '{step}' has unset required fields"),
            },
            CoreError::SubmitUnavailable { step } => Self::InvalidInput {
                message: format!("submission is only available from the final step (on '{step}')"),
            },
            CoreError::Remote(error) => Self::RemoteRejected {
                message: normalize_remote_error(&error),
            },
            CoreError::ClassCreateFailed(error) => Self::RemoteRejected {
                message: normalize_remote_error(&error),
            },
            CoreError::ClassUnresolvable {
                name,
                academic_year,
                ..
            } => Self::PartialCommit {
                kind: PartialCommitKind::CreatedButUnlocatable,
                message: format!(
                    "Class '{name}' for {academic_year} was created but could not be located; \
                     manual reconciliation is required"
                ),
            },
            CoreError::SubjectMappingFailed { class_id, error } => Self::PartialCommit {
                kind: PartialCommitKind::MappingIncomplete,
                message: format!(
                    "Class {class_id} was created but subject mapping failed ({}); \
                     map its subjects manually or retry the mapping step",
                    normalize_remote_error(&error)
                ),
            },
        }
    }
}
