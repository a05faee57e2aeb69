// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The multi-step provisioning wizard engine.
//!
//! Steps are data: an ordered slice of descriptors, each carrying its own
//! completion predicate over the draft. Adding or removing a step is a
//! data change, not a control-flow edit. The engine owns the cursor, the
//! draft, and the submission pipeline; it performs no remote calls outside
//! `submit`.

use crate::error::CoreError;
use crate::service::RemoteDataService;
use enrol_domain::{
    AcademicYear, BranchId, ClassDraft, ClassId, ClassRecord, Course, CourseId, GradeLevel,
    NewClass, TeacherId, validate_capacity, validate_draft_for_submit, validate_section,
    validate_subject_in_grade,
};

/// One step of a provisioning sequence.
#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    /// Display name of the step.
    pub name: &'static str,
    /// Whether the draft satisfies this step's required fields.
    pub is_complete: fn(&ClassDraft) -> bool,
}

fn basic_details_complete(draft: &ClassDraft) -> bool {
    draft.grade_level.is_some() && validate_section(&draft.section).is_ok()
}

fn faculty_complete(_draft: &ClassDraft) -> bool {
    // Teacher assignment is optional; "unassigned" is a valid state.
    true
}

fn capacity_complete(draft: &ClassDraft) -> bool {
    validate_capacity(draft.capacity).is_ok()
}

fn subjects_complete(_draft: &ClassDraft) -> bool {
    // An empty subject set is valid.
    true
}

fn review_complete(draft: &ClassDraft) -> bool {
    validate_draft_for_submit(draft).is_ok()
}

/// The class-creation step sequence.
pub const CLASS_CREATION_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        name: "Basic Details",
        is_complete: basic_details_complete,
    },
    StepDescriptor {
        name: "Faculty",
        is_complete: faculty_complete,
    },
    StepDescriptor {
        name: "Capacity",
        is_complete: capacity_complete,
    },
    StepDescriptor {
        name: "Subjects",
        is_complete: subjects_complete,
    },
    StepDescriptor {
        name: "Review",
        is_complete: review_complete,
    },
];

/// A single draft mutation requested by the Presentation Layer.
///
/// Updates are pure: applying one never triggers a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    GradeLevel(GradeLevel),
    Section(String),
    AcademicYear(AcademicYear),
    Teacher(Option<TeacherId>),
    Capacity(u32),
    AddSubject(CourseId),
    RemoveSubject(CourseId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardPhase {
    Editing,
    Submitting,
}

/// The provisioning wizard engine.
#[derive(Debug, Clone)]
pub struct ProvisioningWizard {
    steps: &'static [StepDescriptor],
    cursor: usize,
    draft: ClassDraft,
    default_year: AcademicYear,
    phase: WizardPhase,
}

impl ProvisioningWizard {
    /// Creates a class-creation wizard with an empty draft at step 0.
    #[must_use]
    pub fn new(default_year: AcademicYear) -> Self {
        Self::with_steps(CLASS_CREATION_STEPS, default_year)
    }

    /// Creates a wizard over a custom step sequence.
    ///
    /// # Panics
    ///
    /// Panics if `steps` is empty.
    #[must_use]
    pub fn with_steps(steps: &'static [StepDescriptor], default_year: AcademicYear) -> Self {
        assert!(!steps.is_empty(), "a wizard requires at least one step");
        Self {
            steps,
            cursor: 0,
            draft: ClassDraft::new(default_year.clone()),
            default_year,
            phase: WizardPhase::Editing,
        }
    }

    /// Returns the current step index.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of steps.
    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the current step descriptor.
    #[must_use]
    pub const fn current_step(&self) -> &StepDescriptor {
        &self.steps[self.cursor]
    }

    /// Returns the draft under construction.
    #[must_use]
    pub const fn draft(&self) -> &ClassDraft {
        &self.draft
    }

    /// Returns true while a submission is running.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, WizardPhase::Submitting)
    }

    /// Whether the cursor may advance from the current step.
    ///
    /// Exposed so the Presentation Layer can disable the affordance.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.cursor + 1 < self.steps.len() && (self.current_step().is_complete)(&self.draft)
    }

    /// Moves the cursor forward one step.
    ///
    /// At the final step this is a clamped no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the current step's required fields are unset.
    pub fn advance(&mut self) -> Result<(), CoreError> {
        if self.cursor + 1 >= self.steps.len() {
            return Ok(());
        }

        if !(self.current_step().is_complete)(&self.draft) {
            return Err(CoreError::StepIncomplete {
                step: self.current_step().name,
            });
        }

        self.cursor += 1;
        Ok(())
    }

    /// Moves the cursor back one step, clamped at 0.
    ///
    /// Retreating never discards previously entered draft fields.
    pub const fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Applies a draft update.
    ///
    /// Changing the grade level re-prunes the selected subjects against
    /// `catalog`, so selections that no longer belong to the grade cannot
    /// reach submission. Adding a subject is validated against the catalog
    /// at selection time.
    ///
    /// # Errors
    ///
    /// Returns an error if a subject is added before a grade is chosen,
    /// the subject is unknown, or it belongs to a different grade.
    pub fn apply_update(
        &mut self,
        update: DraftUpdate,
        catalog: &[Course],
    ) -> Result<(), CoreError> {
        match update {
            DraftUpdate::GradeLevel(grade) => {
                self.draft.grade_level = Some(grade);
                self.draft.retain_subjects_for_grade(grade, catalog);
            }
            DraftUpdate::Section(section) => self.draft.section = section,
            DraftUpdate::AcademicYear(year) => self.draft.academic_year = year,
            DraftUpdate::Teacher(teacher_id) => self.draft.teacher_id = teacher_id,
            DraftUpdate::Capacity(capacity) => self.draft.capacity = capacity,
            DraftUpdate::AddSubject(course_id) => {
                let Some(grade) = self.draft.grade_level else {
                    return Err(CoreError::DomainViolation(
                        enrol_domain::DomainError::IncompleteDraft {
                            field: "grade_level",
                        },
                    ));
                };
                validate_subject_in_grade(course_id, grade, catalog)?;
                if !self.draft.subject_ids.contains(&course_id) {
                    self.draft.subject_ids.push(course_id);
                }
            }
            DraftUpdate::RemoveSubject(course_id) => {
                self.draft.subject_ids.retain(|id| *id != course_id);
            }
        }
        Ok(())
    }

    /// Discards the draft and returns the wizard to its initial state.
    pub fn cancel(&mut self) {
        self.draft = ClassDraft::new(self.default_year.clone());
        self.cursor = 0;
        self.phase = WizardPhase::Editing;
    }

    /// Submits the draft: create, re-resolve, map subjects.
    ///
    /// On success the resolved class id is returned and the draft is
    /// discarded. On any failure the wizard keeps the draft and cursor so
    /// the operator can correct and retry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A submission is already in flight
    /// - No branch context was supplied
    /// - The wizard is not on the final step
    /// - The draft is missing required fields
    /// - Creation fails (`ClassCreateFailed`; nothing was committed)
    /// - The created class cannot be located (`ClassUnresolvable`; no
    ///   subject mapping is attempted)
    /// - Subject mapping fails (`SubjectMappingFailed`; the class record
    ///   remains in place)
    pub fn submit<S: RemoteDataService + ?Sized>(
        &mut self,
        service: &mut S,
        branch: Option<BranchId>,
    ) -> Result<ClassId, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::OperationInFlight {
                operation: "submit",
            });
        }

        let Some(branch_id) = branch else {
            return Err(CoreError::MissingBranchContext);
        };

        if self.cursor + 1 != self.steps.len() {
            return Err(CoreError::SubmitUnavailable {
                step: self.current_step().name,
            });
        }

        validate_draft_for_submit(&self.draft)?;

        let Some(new_class) = self.draft.to_new_class(branch_id) else {
            unreachable!("draft was validated for submission")
        };

        self.phase = WizardPhase::Submitting;
        let result: Result<ClassId, CoreError> = run_submit_pipeline(
            service,
            &new_class,
            &self.draft.subject_ids,
        );
        self.phase = WizardPhase::Editing;

        let class_id: ClassId = result?;

        // Success discards the draft.
        self.draft = ClassDraft::new(self.default_year.clone());
        self.cursor = 0;

        Ok(class_id)
    }
}

/// The create → resolve → map pipeline.
///
/// The creation call does not echo the new identifier, so the class is
/// re-resolved by its derived name within `(academic_year, branch_id)`,
/// newest first. Each stage maps its failure to a distinct error so the
/// caller can tell "nothing committed" from the partial states.
fn run_submit_pipeline<S: RemoteDataService + ?Sized>(
    service: &mut S,
    new_class: &NewClass,
    subject_ids: &[CourseId],
) -> Result<ClassId, CoreError> {
    service
        .create_class(new_class)
        .map_err(CoreError::ClassCreateFailed)?;

    let matches: Vec<ClassRecord> = service
        .find_classes(
            &new_class.name,
            &new_class.academic_year,
            new_class.branch_id,
        )
        .map_err(|error| CoreError::ClassUnresolvable {
            name: new_class.name.clone(),
            academic_year: new_class.academic_year.value().to_string(),
            error: Some(error),
        })?;

    // Duplicates are possible within the join-key scope; take the most
    // recently created, id as the tie-break.
    let Some(created) = matches
        .into_iter()
        .max_by_key(|record| (record.created_at, record.class_id))
    else {
        return Err(CoreError::ClassUnresolvable {
            name: new_class.name.clone(),
            academic_year: new_class.academic_year.value().to_string(),
            error: None,
        });
    };

    if !subject_ids.is_empty() {
        service
            .map_class_subjects(created.class_id, subject_ids)
            .map_err(|error| CoreError::SubjectMappingFailed {
                class_id: created.class_id,
                error,
            })?;
    }

    Ok(created.class_id)
}
