// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AuthenticatedActor, Role};
use enrol::{RemoteDataService, ServiceError};
use enrol_domain::{
    AcademicYear, AdmissionId, AdmissionRecord, BranchId, ClassId, ClassRecord, Course, CourseId,
    EnquiryId, EnquiryRecord, EnquiryStatus, GradeLevel, NewClass, Teacher, TeacherId,
};
use time::OffsetDateTime;

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn front_desk() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("desk-1"), Role::FrontDesk)
}

pub fn test_year() -> AcademicYear {
    AcademicYear::from_start_year(2025)
}

fn ts(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_750_000_000 + seconds).expect("valid test timestamp")
}

/// Minimal in-memory service for boundary tests.
pub struct StubService {
    pub enquiries: Vec<EnquiryRecord>,
    pub admissions: Vec<AdmissionRecord>,
    pub classes: Vec<ClassRecord>,
    pub class_subjects: Vec<(ClassId, CourseId)>,
    pub fail_map_subjects: Option<ServiceError>,
    pub suppress_class_insert: bool,
    next_id: i64,
}

impl StubService {
    pub fn new() -> Self {
        Self {
            enquiries: Vec::new(),
            admissions: Vec::new(),
            classes: Vec::new(),
            class_subjects: Vec::new(),
            fail_map_subjects: None,
            suppress_class_insert: false,
            next_id: 100,
        }
    }

    pub fn with_enquiry(status: EnquiryStatus) -> Self {
        let mut service = Self::new();
        service.enquiries.push(EnquiryRecord {
            enquiry_id: EnquiryId::new(1),
            student_name: String::from("Asha Verma"),
            guardian_phone: String::from("+91-98000-00000"),
            grade_applied: GradeLevel::Grade5,
            status,
            updated_at: ts(0),
        });
        service
    }
}

impl RemoteDataService for StubService {
    fn fetch_enquiry(&self, id: EnquiryId) -> Result<EnquiryRecord, ServiceError> {
        self.enquiries
            .iter()
            .find(|e| e.enquiry_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("enquiry not found"))
    }

    fn update_enquiry_status(
        &mut self,
        id: EnquiryId,
        status: EnquiryStatus,
    ) -> Result<EnquiryRecord, ServiceError> {
        let Some(enquiry) = self.enquiries.iter_mut().find(|e| e.enquiry_id == id) else {
            return Err(ServiceError::not_found("enquiry not found"));
        };
        enquiry.status = status;
        enquiry.updated_at = ts(60);
        Ok(enquiry.clone())
    }

    fn convert_enquiry(&mut self, id: EnquiryId) -> Result<AdmissionRecord, ServiceError> {
        let Some(enquiry) = self.enquiries.iter_mut().find(|e| e.enquiry_id == id) else {
            return Err(ServiceError::not_found("enquiry not found"));
        };
        if !enquiry.status.may_convert() {
            return Err(ServiceError::rejected("enquiry is not approved"));
        }
        enquiry.status = EnquiryStatus::Converted;
        self.next_id += 1;
        let admission = AdmissionRecord {
            admission_id: AdmissionId::new(self.next_id),
            enquiry_id: id,
            student_name: enquiry.student_name.clone(),
            admitted_at: ts(120),
        };
        self.admissions.push(admission.clone());
        Ok(admission)
    }

    fn create_class(&mut self, class: &NewClass) -> Result<(), ServiceError> {
        if !self.suppress_class_insert {
            self.next_id += 1;
            self.classes.push(ClassRecord {
                class_id: ClassId::new(self.next_id),
                name: class.name.clone(),
                academic_year: class.academic_year.clone(),
                branch_id: class.branch_id,
                created_at: ts(self.next_id),
            });
        }
        Ok(())
    }

    fn find_classes(
        &self,
        name: &str,
        academic_year: &AcademicYear,
        branch_id: BranchId,
    ) -> Result<Vec<ClassRecord>, ServiceError> {
        Ok(self
            .classes
            .iter()
            .filter(|c| {
                c.name == name && &c.academic_year == academic_year && c.branch_id == branch_id
            })
            .cloned()
            .collect())
    }

    fn map_class_subjects(
        &mut self,
        class_id: ClassId,
        subject_ids: &[CourseId],
    ) -> Result<(), ServiceError> {
        if let Some(error) = &self.fail_map_subjects {
            return Err(error.clone());
        }
        for course_id in subject_ids {
            self.class_subjects.push((class_id, *course_id));
        }
        Ok(())
    }

    fn list_teachers(&self) -> Result<Vec<Teacher>, ServiceError> {
        Ok(vec![Teacher {
            teacher_id: TeacherId::new(1),
            name: String::from("R. Iyer"),
        }])
    }

    fn list_courses(&self, grade: Option<GradeLevel>) -> Result<Vec<Course>, ServiceError> {
        let all = vec![
            Course {
                course_id: CourseId::new(1),
                name: String::from("Mathematics V"),
                grade_level: GradeLevel::Grade5,
            },
            Course {
                course_id: CourseId::new(2),
                name: String::from("Science V"),
                grade_level: GradeLevel::Grade5,
            },
            Course {
                course_id: CourseId::new(3),
                name: String::from("Mathematics VI"),
                grade_level: GradeLevel::Grade6,
            },
        ];
        Ok(all
            .into_iter()
            .filter(|c| grade.is_none_or(|g| c.grade_level == g))
            .collect())
    }
}
