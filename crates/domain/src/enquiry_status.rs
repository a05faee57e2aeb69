// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enquiry status tracking and transition logic.
//!
//! This module defines the enquiry lifecycle states and valid transitions.
//! Transitions are operator-initiated only; sequencing among the working
//! states is an authorization concern, not a domain rule.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Enquiry lifecycle states from first contact through admission.
///
/// Status is tracked per enquiry. `Converted` is the sole terminal state
/// and is reachable only through conversion, never by direct assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    /// Enquiry submitted, not yet acted upon
    New,
    /// Family has been contacted
    Contacted,
    /// Submitted documents and details verified
    Verified,
    /// Cleared for admission
    Approved,
    /// Declined; may still be revisited
    Rejected,
    /// Promoted to an admission record; terminal
    Converted,
}

impl EnquiryStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::Contacted,
        Self::Verified,
        Self::Approved,
        Self::Rejected,
        Self::Converted,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Verified => "verified",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Converted => "converted",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEnquiryStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "verified" => Ok(Self::Verified),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "converted" => Ok(Self::Converted),
            _ => Err(DomainError::InvalidEnquiryStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Converted)
    }

    /// Returns true if this enquiry may be promoted to an admission record.
    #[must_use]
    pub const fn may_convert(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Checks if a direct status assignment from this status to `target` is valid.
    ///
    /// Any non-terminal status may move to any *different* non-terminal
    /// status; the working states carry no enforced linear order. `Converted`
    /// is never a valid assignment target: conversion is the only path in.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        !self.is_terminal() && !target.is_terminal() && (*self as u8) != (target as u8)
    }

    /// Validates a direct status assignment from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if target.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "converted is only reachable through conversion".to_string(),
            });
        }

        Ok(())
    }
}

impl FromStr for EnquiryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in EnquiryStatus::ALL {
            let s = status.as_str();
            match EnquiryStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = EnquiryStatus::parse_str("enrolled");
        assert!(result.is_err());
    }

    #[test]
    fn test_converted_is_sole_terminal_state() {
        assert!(!EnquiryStatus::New.is_terminal());
        assert!(!EnquiryStatus::Contacted.is_terminal());
        assert!(!EnquiryStatus::Verified.is_terminal());
        assert!(!EnquiryStatus::Approved.is_terminal());
        assert!(!EnquiryStatus::Rejected.is_terminal());
        assert!(EnquiryStatus::Converted.is_terminal());
    }

    #[test]
    fn test_only_approved_may_convert() {
        assert!(EnquiryStatus::Approved.may_convert());

        assert!(!EnquiryStatus::New.may_convert());
        assert!(!EnquiryStatus::Contacted.may_convert());
        assert!(!EnquiryStatus::Verified.may_convert());
        assert!(!EnquiryStatus::Rejected.may_convert());
        assert!(!EnquiryStatus::Converted.may_convert());
    }

    #[test]
    fn test_non_terminal_states_mutually_reachable() {
        let working = [
            EnquiryStatus::New,
            EnquiryStatus::Contacted,
            EnquiryStatus::Verified,
            EnquiryStatus::Approved,
            EnquiryStatus::Rejected,
        ];

        for from in working {
            for to in working {
                if from == to {
                    assert!(!from.can_transition_to(to), "{from} -> {to} is a no-op");
                } else {
                    assert!(from.can_transition_to(to), "{from} -> {to} should be legal");
                }
            }
        }
    }

    #[test]
    fn test_rejected_may_return_to_approved() {
        // Observed behavior: rejection is not final.
        assert!(EnquiryStatus::Rejected.can_transition_to(EnquiryStatus::Approved));
        assert!(
            EnquiryStatus::Rejected
                .validate_transition(EnquiryStatus::Approved)
                .is_ok()
        );
    }

    #[test]
    fn test_no_transitions_from_converted() {
        for target in EnquiryStatus::ALL {
            assert!(!EnquiryStatus::Converted.can_transition_to(target));
            assert!(
                EnquiryStatus::Converted
                    .validate_transition(target)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_converted_is_not_an_assignment_target() {
        for from in EnquiryStatus::ALL {
            assert!(!from.can_transition_to(EnquiryStatus::Converted));
            assert!(from.validate_transition(EnquiryStatus::Converted).is_err());
        }
    }
}
