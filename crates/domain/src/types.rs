// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core domain entity types and identifier newtypes.

use crate::academic_year::AcademicYear;
use crate::enquiry_status::EnquiryStatus;
use crate::grade_level::GradeLevel;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier from its raw value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Opaque identifier of an enquiry record.
    EnquiryId
);
id_newtype!(
    /// Canonical identifier of a persisted class.
    ClassId
);
id_newtype!(
    /// Identifier of a teacher.
    TeacherId
);
id_newtype!(
    /// Identifier of a course offered at some grade level.
    CourseId
);
id_newtype!(
    /// Identifier of the branch (location) scoping classes.
    BranchId
);
id_newtype!(
    /// Identifier of an admission record.
    AdmissionId
);

/// A prospective-student enquiry.
///
/// Created externally by enquiry submission; mutated exclusively through
/// the lifecycle controller; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryRecord {
    /// Opaque identifier, immutable.
    pub enquiry_id: EnquiryId,
    /// The prospective student's name.
    pub student_name: String,
    /// Contact number for the guardian.
    pub guardian_phone: String,
    /// The grade the student is applying for.
    pub grade_applied: GradeLevel,
    /// Current lifecycle status.
    pub status: EnquiryStatus,
    /// When the record last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The institutional record created when an enquiry is converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    /// Identifier of the admission record.
    pub admission_id: AdmissionId,
    /// The source enquiry.
    pub enquiry_id: EnquiryId,
    /// The admitted student's name, carried over from the enquiry.
    pub student_name: String,
    /// When the admission was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub admitted_at: OffsetDateTime,
}

/// A teacher available for class assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: TeacherId,
    pub name: String,
}

/// A course offered at a specific grade level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: CourseId,
    pub name: String,
    pub grade_level: GradeLevel,
}

/// A persisted class as echoed by lookups.
///
/// Creation does not echo the identifier, so a class's identity is
/// re-resolved by looking up `(name, academic_year, branch_id)` and taking
/// the most recently created match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub class_id: ClassId,
    pub name: String,
    pub academic_year: AcademicYear,
    pub branch_id: BranchId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The fields submitted to create a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    /// Derived display name; also the re-resolution join key.
    pub name: String,
    pub grade_level: GradeLevel,
    pub section: String,
    pub academic_year: AcademicYear,
    /// Optional; "unassigned" is a valid state for a new class.
    pub teacher_id: Option<TeacherId>,
    pub capacity: u32,
    pub branch_id: BranchId,
}
