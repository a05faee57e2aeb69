// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod normalize;

#[cfg(test)]
mod tests;

use enrol::{
    ConvertOutcome, DraftUpdate, EnquiryLifecycle, ProvisioningWizard, RemoteDataService,
    StatusOutcome,
};
use enrol_domain::{
    AcademicYear, BranchId, CourseId, EnquiryId, EnquiryRecord, EnquiryStatus, GradeLevel,
    TeacherId,
};
use std::str::FromStr;
use tracing::info;

pub use error::{ApiError, PartialCommitKind};
pub use normalize::normalize_remote_error;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
/// Sequencing among the working enquiry statuses is controlled here, by
/// role, not by the lifecycle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full authority over the enquiry lifecycle and
    /// class provisioning.
    ///
    /// Admins may perform:
    /// - any enquiry status assignment, including approval and rejection
    /// - conversion of approved enquiries into admissions
    /// - class creation
    Admin,
    /// Front-desk role: operators handling day-to-day enquiry intake.
    ///
    /// Front-desk operators may move enquiries among the intake statuses
    /// (`new`, `contacted`, `verified`) but may not approve, reject,
    /// convert, or provision classes.
    FrontDesk,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::FrontDesk => "front_desk",
        }
    }
}

/// An authenticated actor with an associated role.
///
/// This represents a system operator who has been authenticated and has
/// permission to perform certain actions based on their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }
}

/// Stub authentication function.
///
/// Real authentication is an external identity provider's job and is out
/// of scope here; this placeholder only rejects empty actor ids.
///
/// # Errors
///
/// Returns an error if authentication fails.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, ApiError> {
    if actor_id.is_empty() {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Validates that `actor` may assign `target` to an enquiry.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if the role does not permit the
/// assignment.
pub fn authorize_status_change(
    actor: &AuthenticatedActor,
    target: EnquiryStatus,
) -> Result<(), ApiError> {
    let permitted: bool = match actor.role {
        Role::Admin => true,
        Role::FrontDesk => matches!(
            target,
            EnquiryStatus::New | EnquiryStatus::Contacted | EnquiryStatus::Verified
        ),
    };

    if permitted {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: format!("set status to '{target}'"),
            required_role: Role::Admin.as_str().to_string(),
        })
    }
}

/// Validates that `actor` may convert enquiries.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` unless the actor is an admin.
pub fn authorize_conversion(actor: &AuthenticatedActor) -> Result<(), ApiError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: String::from("convert enquiry"),
            required_role: Role::Admin.as_str().to_string(),
        })
    }
}

/// Validates that `actor` may create classes.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` unless the actor is an admin.
pub fn authorize_class_creation(actor: &AuthenticatedActor) -> Result<(), ApiError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: String::from("create class"),
            required_role: Role::Admin.as_str().to_string(),
        })
    }
}

/// API request to change an enquiry's status.
///
/// This DTO is distinct from domain types and represents the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEnquiryStatusRequest {
    /// The enquiry to change.
    pub enquiry_id: i64,
    /// The target status, in its string form.
    pub status: String,
}

/// API response for a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEnquiryStatusResponse {
    /// The enquiry that was addressed.
    pub enquiry_id: i64,
    /// The enquiry's status after the operation.
    pub status: String,
    /// Whether the status actually changed.
    pub changed: bool,
    /// A human-readable outcome message.
    pub message: String,
}

/// API response for a conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertEnquiryResponse {
    /// The enquiry that was addressed.
    pub enquiry_id: i64,
    /// The created admission record, when conversion took place.
    pub admission_id: Option<i64>,
    /// Whether the enquiry was converted.
    pub converted: bool,
    /// A human-readable outcome message.
    pub message: String,
}

/// API response listing the legal status assignments for an enquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalTargetsResponse {
    /// The enquiry that was inspected.
    pub enquiry_id: i64,
    /// The enquiry's current status.
    pub current: String,
    /// Statuses the enquiry may currently be assigned to.
    pub targets: Vec<String>,
    /// Whether the enquiry is eligible for conversion.
    pub may_convert: bool,
}

/// API request to create a class with its subject mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClassRequest {
    /// The grade level, in its numeral string form.
    pub grade_level: String,
    /// The section identifier.
    pub section: String,
    /// The academic year; `None` uses the configured default.
    pub academic_year: Option<String>,
    /// The assigned teacher, if any.
    pub teacher_id: Option<i64>,
    /// The seat capacity.
    pub capacity: u32,
    /// The selected subjects.
    pub subject_ids: Vec<i64>,
    /// The branch context. Required; its absence is a hard error.
    pub branch_id: Option<i64>,
}

/// API response for a successful class creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClassResponse {
    /// The resolved identifier of the created class.
    pub class_id: i64,
    /// The derived class display name.
    pub name: String,
    /// The academic year the class belongs to.
    pub academic_year: String,
    /// A human-readable outcome message.
    pub message: String,
}

/// Teacher information for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherInfo {
    pub teacher_id: i64,
    pub name: String,
}

/// Course information for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInfo {
    pub course_id: i64,
    pub name: String,
    pub grade_level: String,
}

/// Changes an enquiry's status on behalf of an authenticated actor.
///
/// Terminal and same-status requests are reported as unchanged rather
/// than errors; the Presentation Layer is expected to have disabled those
/// affordances already.
///
/// # Errors
///
/// Returns an error if the status string is invalid, the actor's role
/// does not permit the assignment, or the Remote Data Service refuses the
/// update.
pub fn update_enquiry_status<S: RemoteDataService + ?Sized>(
    service: &mut S,
    request: &UpdateEnquiryStatusRequest,
    actor: &AuthenticatedActor,
) -> Result<UpdateEnquiryStatusResponse, ApiError> {
    let target: EnquiryStatus = EnquiryStatus::from_str(&request.status)?;
    authorize_status_change(actor, target)?;

    let record: EnquiryRecord = fetch_enquiry(service, request.enquiry_id)?;
    let mut controller: EnquiryLifecycle = EnquiryLifecycle::new(record);

    let outcome: StatusOutcome = controller.set_status(service, target)?;

    let response = match outcome {
        StatusOutcome::Updated(updated) => {
            info!(
                actor_id = %actor.id,
                enquiry_id = request.enquiry_id,
                status = %updated.status,
                "Enquiry status updated"
            );
            UpdateEnquiryStatusResponse {
                enquiry_id: request.enquiry_id,
                status: updated.status.as_str().to_string(),
                changed: true,
                message: format!("Enquiry status set to '{}'", updated.status),
            }
        }
        StatusOutcome::Terminal => UpdateEnquiryStatusResponse {
            enquiry_id: request.enquiry_id,
            status: EnquiryStatus::Converted.as_str().to_string(),
            changed: false,
            message: String::from("Enquiry is already converted; no action taken"),
        },
        StatusOutcome::Unchanged => UpdateEnquiryStatusResponse {
            enquiry_id: request.enquiry_id,
            status: controller.record().status.as_str().to_string(),
            changed: false,
            message: String::from("Enquiry already has this status; no action taken"),
        },
    };

    Ok(response)
}

/// Converts an approved enquiry into an admission record.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the Remote Data
/// Service refuses the conversion.
pub fn convert_enquiry<S: RemoteDataService + ?Sized>(
    service: &mut S,
    enquiry_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ConvertEnquiryResponse, ApiError> {
    authorize_conversion(actor)?;

    let record: EnquiryRecord = fetch_enquiry(service, enquiry_id)?;
    let mut controller: EnquiryLifecycle = EnquiryLifecycle::new(record);

    match controller.convert(service)? {
        ConvertOutcome::Converted(admission) => {
            info!(
                actor_id = %actor.id,
                enquiry_id,
                admission_id = admission.admission_id.value(),
                "Enquiry converted to admission"
            );
            Ok(ConvertEnquiryResponse {
                enquiry_id,
                admission_id: Some(admission.admission_id.value()),
                converted: true,
                message: format!(
                    "Enquiry converted; admission record {} created",
                    admission.admission_id
                ),
            })
        }
        ConvertOutcome::NotEligible => Ok(ConvertEnquiryResponse {
            enquiry_id,
            admission_id: None,
            converted: false,
            message: String::from("Enquiry is not approved; no action taken"),
        }),
    }
}

/// API response describing an enquiry together with its legal transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryDetailResponse {
    pub enquiry_id: i64,
    pub student_name: String,
    pub guardian_phone: String,
    pub grade_applied: String,
    pub status: String,
    /// Statuses the enquiry may currently be assigned to.
    pub targets: Vec<String>,
    /// Whether the enquiry is eligible for conversion.
    pub may_convert: bool,
}

/// Fetches an enquiry together with its legal transitions.
///
/// # Errors
///
/// Returns an error if the enquiry cannot be fetched.
pub fn get_enquiry<S: RemoteDataService + ?Sized>(
    service: &S,
    enquiry_id: i64,
) -> Result<EnquiryDetailResponse, ApiError> {
    let record: EnquiryRecord = fetch_enquiry_ref(service, enquiry_id)?;
    let controller: EnquiryLifecycle = EnquiryLifecycle::new(record);
    let record: &EnquiryRecord = controller.record();

    Ok(EnquiryDetailResponse {
        enquiry_id,
        student_name: record.student_name.clone(),
        guardian_phone: record.guardian_phone.clone(),
        grade_applied: record.grade_applied.as_str().to_string(),
        status: record.status.as_str().to_string(),
        targets: controller
            .legal_targets()
            .into_iter()
            .map(|status| status.as_str().to_string())
            .collect(),
        may_convert: controller.may_convert(),
    })
}

/// Reports the legal status assignments and conversion eligibility for an
/// enquiry, so the Presentation Layer can disable illegal affordances.
///
/// # Errors
///
/// Returns an error if the enquiry cannot be fetched.
pub fn legal_status_targets<S: RemoteDataService + ?Sized>(
    service: &S,
    enquiry_id: i64,
) -> Result<LegalTargetsResponse, ApiError> {
    let record: EnquiryRecord = fetch_enquiry_ref(service, enquiry_id)?;
    let controller: EnquiryLifecycle = EnquiryLifecycle::new(record);

    Ok(LegalTargetsResponse {
        enquiry_id,
        current: controller.record().status.as_str().to_string(),
        targets: controller
            .legal_targets()
            .into_iter()
            .map(|status| status.as_str().to_string())
            .collect(),
        may_convert: controller.may_convert(),
    })
}

/// Creates a class with its subject mappings by driving the provisioning
/// wizard end to end.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the request is invalid,
/// or any stage of the submission pipeline fails; partial-commit failures
/// are surfaced as `ApiError::PartialCommit` with a distinct kind.
pub fn create_class<S: RemoteDataService + ?Sized>(
    service: &mut S,
    request: &CreateClassRequest,
    actor: &AuthenticatedActor,
    default_year: &AcademicYear,
) -> Result<CreateClassResponse, ApiError> {
    authorize_class_creation(actor)?;

    let grade: GradeLevel = GradeLevel::from_str(&request.grade_level)?;
    let academic_year: AcademicYear = match &request.academic_year {
        Some(year) => AcademicYear::new(year)?,
        None => default_year.clone(),
    };

    let catalog = service
        .list_courses(Some(grade))
        .map_err(|error| ApiError::RemoteRejected {
            message: normalize_remote_error(&error),
        })?;

    let mut wizard: ProvisioningWizard = ProvisioningWizard::new(academic_year.clone());
    wizard.apply_update(DraftUpdate::GradeLevel(grade), &catalog)?;
    wizard.apply_update(DraftUpdate::Section(request.section.clone()), &catalog)?;
    wizard.apply_update(DraftUpdate::AcademicYear(academic_year.clone()), &catalog)?;
    wizard.apply_update(
        DraftUpdate::Teacher(request.teacher_id.map(TeacherId::new)),
        &catalog,
    )?;
    wizard.apply_update(DraftUpdate::Capacity(request.capacity), &catalog)?;
    for subject_id in &request.subject_ids {
        wizard.apply_update(DraftUpdate::AddSubject(CourseId::new(*subject_id)), &catalog)?;
    }

    while wizard.cursor() + 1 < wizard.step_count() {
        wizard.advance()?;
    }

    let branch: Option<BranchId> = request.branch_id.map(BranchId::new);
    let name: String = grade.class_display_name(&request.section);
    let class_id = wizard.submit(service, branch)?;

    info!(
        actor_id = %actor.id,
        class_id = class_id.value(),
        name = %name,
        academic_year = %academic_year,
        "Class created"
    );

    Ok(CreateClassResponse {
        class_id: class_id.value(),
        name,
        academic_year: academic_year.value().to_string(),
        message: String::from("Class created with its subject mappings"),
    })
}

/// Lists teachers available for class assignment.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub fn list_teachers<S: RemoteDataService + ?Sized>(
    service: &S,
) -> Result<Vec<TeacherInfo>, ApiError> {
    let teachers = service
        .list_teachers()
        .map_err(|error| ApiError::RemoteRejected {
            message: normalize_remote_error(&error),
        })?;

    Ok(teachers
        .into_iter()
        .map(|teacher| TeacherInfo {
            teacher_id: teacher.teacher_id.value(),
            name: teacher.name,
        })
        .collect())
}

/// Lists courses, optionally restricted to one grade level.
///
/// # Errors
///
/// Returns an error if the grade filter is invalid or the listing fails.
pub fn list_courses<S: RemoteDataService + ?Sized>(
    service: &S,
    grade: Option<&str>,
) -> Result<Vec<CourseInfo>, ApiError> {
    let filter: Option<GradeLevel> = match grade {
        Some(value) => Some(GradeLevel::from_str(value)?),
        None => None,
    };

    let courses = service
        .list_courses(filter)
        .map_err(|error| ApiError::RemoteRejected {
            message: normalize_remote_error(&error),
        })?;

    Ok(courses
        .into_iter()
        .map(|course| CourseInfo {
            course_id: course.course_id.value(),
            name: course.name,
            grade_level: course.grade_level.as_str().to_string(),
        })
        .collect())
}

fn fetch_enquiry<S: RemoteDataService + ?Sized>(
    service: &mut S,
    enquiry_id: i64,
) -> Result<EnquiryRecord, ApiError> {
    fetch_enquiry_ref(&*service, enquiry_id)
}

fn fetch_enquiry_ref<S: RemoteDataService + ?Sized>(
    service: &S,
    enquiry_id: i64,
) -> Result<EnquiryRecord, ApiError> {
    service
        .fetch_enquiry(EnquiryId::new(enquiry_id))
        .map_err(|error| match error.kind {
            // Addressing a nonexistent enquiry is an operator input
            // problem, not a service fault.
            enrol::ServiceErrorKind::NotFound => ApiError::InvalidInput {
                message: format!("enquiry {enquiry_id} not found"),
            },
            _ => ApiError::RemoteRejected {
                message: normalize_remote_error(&error),
            },
        })
}
