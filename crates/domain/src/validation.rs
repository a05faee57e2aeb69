// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::class_draft::ClassDraft;
use crate::error::DomainError;
use crate::grade_level::GradeLevel;
use crate::types::{Course, CourseId};

/// Maximum length of a section identifier.
const MAX_SECTION_LEN: usize = 10;

/// Validates a section identifier.
///
/// # Errors
///
/// Returns an error if the section is empty or longer than ten characters.
pub fn validate_section(section: &str) -> Result<(), DomainError> {
    if section.is_empty() {
        return Err(DomainError::InvalidSection(String::from(
            "Section cannot be empty",
        )));
    }

    if section.chars().count() > MAX_SECTION_LEN {
        return Err(DomainError::InvalidSection(format!(
            "Section must be at most {MAX_SECTION_LEN} characters"
        )));
    }

    Ok(())
}

/// Validates a class capacity.
///
/// # Errors
///
/// Returns an error if the capacity is zero.
pub const fn validate_capacity(capacity: u32) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(DomainError::InvalidCapacity { capacity });
    }
    Ok(())
}

/// Validates that a course may be selected for a draft targeting `grade`.
///
/// This is the selection-time half of the subject-subset invariant; grade
/// changes re-prune already-selected subjects separately.
///
/// # Errors
///
/// Returns an error if the course is unknown to the catalog or belongs to
/// a different grade level.
pub fn validate_subject_in_grade(
    course_id: CourseId,
    grade: GradeLevel,
    catalog: &[Course],
) -> Result<(), DomainError> {
    let Some(course) = catalog.iter().find(|c| c.course_id == course_id) else {
        return Err(DomainError::CourseNotFound {
            course_id: course_id.value(),
        });
    };

    if course.grade_level != grade {
        return Err(DomainError::SubjectNotInGrade {
            course_id: course_id.value(),
            grade: grade.as_str().to_string(),
        });
    }

    Ok(())
}

/// Validates that a draft carries everything submission requires.
///
/// # Errors
///
/// Returns an error if:
/// - The grade level is unset
/// - The section is empty or invalid
/// - The capacity is zero
pub fn validate_draft_for_submit(draft: &ClassDraft) -> Result<(), DomainError> {
    if draft.grade_level.is_none() {
        return Err(DomainError::IncompleteDraft {
            field: "grade_level",
        });
    }

    validate_section(&draft.section)?;
    validate_capacity(draft.capacity)?;

    Ok(())
}
