// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transient class-creation draft state.

use crate::academic_year::AcademicYear;
use crate::grade_level::GradeLevel;
use crate::types::{Course, CourseId, NewClass, TeacherId};

/// The wizard-scoped draft of a class under construction.
///
/// A draft is created empty when the wizard opens, mutated step by step,
/// and discarded on cancel or after a successful submission. It is never
/// persisted in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDraft {
    /// Target grade level; required by submission time.
    pub grade_level: Option<GradeLevel>,
    /// Free-form short section identifier; required, non-empty.
    pub section: String,
    /// Academic year the class belongs to; defaults to the configured
    /// current year.
    pub academic_year: AcademicYear,
    /// Assigned teacher; `None` means unassigned, which is valid.
    pub teacher_id: Option<TeacherId>,
    /// Seat capacity; must be positive by submission time.
    pub capacity: u32,
    /// Selected subjects; must stay a subset of the courses offered at
    /// `grade_level`.
    pub subject_ids: Vec<CourseId>,
}

impl ClassDraft {
    /// Creates an empty draft for the given default academic year.
    #[must_use]
    pub const fn new(academic_year: AcademicYear) -> Self {
        Self {
            grade_level: None,
            section: String::new(),
            academic_year,
            teacher_id: None,
            capacity: 0,
            subject_ids: Vec::new(),
        }
    }

    /// Drops every selected subject that is not offered at `grade`.
    ///
    /// Called whenever the draft's grade level changes, so stale selections
    /// from the previous grade cannot reach submission.
    pub fn retain_subjects_for_grade(&mut self, grade: GradeLevel, catalog: &[Course]) {
        self.subject_ids.retain(|course_id| {
            catalog
                .iter()
                .any(|course| course.course_id == *course_id && course.grade_level == grade)
        });
    }

    /// Derives the class display name, if the required fields are present.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let grade = self.grade_level?;
        if self.section.is_empty() {
            return None;
        }
        Some(grade.class_display_name(&self.section))
    }

    /// Builds the creation payload for the given branch.
    ///
    /// Callers must validate the draft first; missing required fields
    /// yield `None`.
    #[must_use]
    pub fn to_new_class(&self, branch_id: crate::types::BranchId) -> Option<NewClass> {
        let grade_level = self.grade_level?;
        let name = self.display_name()?;
        Some(NewClass {
            name,
            grade_level,
            section: self.section.clone(),
            academic_year: self.academic_year.clone(),
            teacher_id: self.teacher_id,
            capacity: self.capacity,
            branch_id,
        })
    }
}
