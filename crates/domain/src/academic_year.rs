// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Academic year identifiers.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A validated academic year span such as `2025-2026`.
///
/// Academic years scope classes together with the branch; two consecutive
/// calendar years joined by a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicYear(String);

impl AcademicYear {
    /// Creates an academic year from its string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAcademicYear` if the string is not two
    /// consecutive four-digit years joined by a hyphen.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let Some((first, second)) = value.split_once('-') else {
            return Err(DomainError::InvalidAcademicYear(format!(
                "'{value}' is not in YYYY-YYYY form"
            )));
        };

        if first.len() != 4 || second.len() != 4 {
            return Err(DomainError::InvalidAcademicYear(format!(
                "'{value}' is not in YYYY-YYYY form"
            )));
        }

        let start: u16 = first.parse().map_err(|_| {
            DomainError::InvalidAcademicYear(format!("'{first}' is not a calendar year"))
        })?;
        let end: u16 = second.parse().map_err(|_| {
            DomainError::InvalidAcademicYear(format!("'{second}' is not a calendar year"))
        })?;

        if !(1900..=2200).contains(&start) {
            return Err(DomainError::InvalidAcademicYear(format!(
                "start year must be between 1900 and 2200, got {start}"
            )));
        }

        if end != start + 1 {
            return Err(DomainError::InvalidAcademicYear(format!(
                "'{value}' must span two consecutive years"
            )));
        }

        Ok(Self(value.to_string()))
    }

    /// Creates the academic year beginning in `start_year`.
    #[must_use]
    pub fn from_start_year(start_year: u16) -> Self {
        Self(format!("{start_year}-{}", start_year + 1))
    }

    /// Returns the string form of this academic year.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl FromStr for AcademicYear {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
