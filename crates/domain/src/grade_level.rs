// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grade levels and class display-name derivation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed range of grade levels a class or enquiry may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeLevel {
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    Grade7,
    Grade8,
    Grade9,
    Grade10,
    Grade11,
    Grade12,
}

impl GradeLevel {
    /// All grade levels, in ascending order.
    pub const ALL: [Self; 12] = [
        Self::Grade1,
        Self::Grade2,
        Self::Grade3,
        Self::Grade4,
        Self::Grade5,
        Self::Grade6,
        Self::Grade7,
        Self::Grade8,
        Self::Grade9,
        Self::Grade10,
        Self::Grade11,
        Self::Grade12,
    ];

    /// Returns the numeral string for this grade level.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grade1 => "1",
            Self::Grade2 => "2",
            Self::Grade3 => "3",
            Self::Grade4 => "4",
            Self::Grade5 => "5",
            Self::Grade6 => "6",
            Self::Grade7 => "7",
            Self::Grade8 => "8",
            Self::Grade9 => "9",
            Self::Grade10 => "10",
            Self::Grade11 => "11",
            Self::Grade12 => "12",
        }
    }

    /// Parses a grade level from its numeral string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGradeLevel` if the string is not a
    /// grade within the supported range.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "1" => Ok(Self::Grade1),
            "2" => Ok(Self::Grade2),
            "3" => Ok(Self::Grade3),
            "4" => Ok(Self::Grade4),
            "5" => Ok(Self::Grade5),
            "6" => Ok(Self::Grade6),
            "7" => Ok(Self::Grade7),
            "8" => Ok(Self::Grade8),
            "9" => Ok(Self::Grade9),
            "10" => Ok(Self::Grade10),
            "11" => Ok(Self::Grade11),
            "12" => Ok(Self::Grade12),
            _ => Err(DomainError::InvalidGradeLevel(s.to_string())),
        }
    }

    /// Derives the display name for a class of this grade and section.
    ///
    /// The derivation is deterministic and doubles as the join key used to
    /// re-resolve a created class, so the format must remain stable.
    #[must_use]
    pub fn class_display_name(&self, section: &str) -> String {
        format!("Grade {} - {section}", self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grade {}", self.as_str())
    }
}
