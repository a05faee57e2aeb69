// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::service::{RemoteDataService, ServiceError};
use enrol_domain::{
    AcademicYear, AdmissionId, AdmissionRecord, BranchId, ClassId, ClassRecord, Course, CourseId,
    EnquiryId, EnquiryRecord, EnquiryStatus, GradeLevel, NewClass, Teacher, TeacherId,
};
use std::cell::{Cell, RefCell};
use time::OffsetDateTime;

/// Fixed base instant for deterministic timestamps.
const BASE_SECONDS: i64 = 1_750_000_000;

pub fn ts(offset_seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(BASE_SECONDS + offset_seconds)
        .expect("valid test timestamp")
}

pub fn create_test_enquiry(status: EnquiryStatus) -> EnquiryRecord {
    EnquiryRecord {
        enquiry_id: EnquiryId::new(1),
        student_name: String::from("Asha Verma"),
        guardian_phone: String::from("+91-98000-00000"),
        grade_applied: GradeLevel::Grade5,
        status,
        updated_at: ts(0),
    }
}

pub fn test_year() -> AcademicYear {
    AcademicYear::from_start_year(2025)
}

/// Scriptable in-memory stand-in for the Remote Data Service.
///
/// Every operation counts its calls; each can be scripted to fail.
/// `suppress_class_insert` makes `create_class` report success without
/// storing anything, and `convert_half_commits` simulates a defective
/// backend that inserts the admission and then reports failure.
pub struct MockRemoteService {
    pub enquiries: Vec<EnquiryRecord>,
    pub admissions: Vec<AdmissionRecord>,
    pub classes: Vec<ClassRecord>,
    pub class_subjects: Vec<(ClassId, CourseId)>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,

    pub fail_update_status: Option<ServiceError>,
    pub fail_convert: Option<ServiceError>,
    pub fail_create_class: Option<ServiceError>,
    pub fail_find_classes: Option<ServiceError>,
    pub fail_map_subjects: Option<ServiceError>,
    pub suppress_class_insert: bool,
    pub convert_half_commits: bool,

    pub update_status_calls: usize,
    pub convert_calls: usize,
    pub create_class_calls: usize,
    /// Interior mutability: lookups run through `&self`.
    pub find_class_calls: Cell<usize>,
    pub map_subject_calls: usize,
    pub find_class_keys: RefCell<Vec<(String, String, i64)>>,

    next_class_id: i64,
    next_admission_id: i64,
    created_tick: i64,
}

impl MockRemoteService {
    pub fn new() -> Self {
        Self {
            enquiries: Vec::new(),
            admissions: Vec::new(),
            classes: Vec::new(),
            class_subjects: Vec::new(),
            teachers: vec![
                Teacher {
                    teacher_id: TeacherId::new(1),
                    name: String::from("R. Iyer"),
                },
                Teacher {
                    teacher_id: TeacherId::new(2),
                    name: String::from("S. Menon"),
                },
            ],
            courses: vec![
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
            ],
            fail_update_status: None,
            fail_convert: None,
            fail_create_class: None,
            fail_find_classes: None,
            fail_map_subjects: None,
            suppress_class_insert: false,
            convert_half_commits: false,
            update_status_calls: 0,
            convert_calls: 0,
            create_class_calls: 0,
            find_class_calls: Cell::new(0),
            map_subject_calls: 0,
            find_class_keys: RefCell::new(Vec::new()),
            next_class_id: 100,
            next_admission_id: 500,
            created_tick: 0,
        }
    }

    pub fn with_enquiry(record: EnquiryRecord) -> Self {
        let mut service = Self::new();
        service.enquiries.push(record);
        service
    }

    /// Pre-inserts a class with a chosen creation instant, bypassing the
    /// counters, for duplicate-resolution scenarios.
    pub fn push_class(
        &mut self,
        class_id: i64,
        name: &str,
        academic_year: &AcademicYear,
        branch_id: BranchId,
        created_at: OffsetDateTime,
    ) -> ClassId {
        let id = ClassId::new(class_id);
        self.classes.push(ClassRecord {
            class_id: id,
            name: name.to_string(),
            academic_year: academic_year.clone(),
            branch_id,
            created_at,
        });
        id
    }
}

impl RemoteDataService for MockRemoteService {
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
        self.update_status_calls += 1;

        if let Some(error) = &self.fail_update_status {
            return Err(error.clone());
        }

        let Some(enquiry) = self.enquiries.iter_mut().find(|e| e.enquiry_id == id) else {
            return Err(ServiceError::not_found("enquiry not found"));
        };

        enquiry.status = status;
        enquiry.updated_at = ts(60);
        Ok(enquiry.clone())
    }

    fn convert_enquiry(&mut self, id: EnquiryId) -> Result<AdmissionRecord, ServiceError> {
        self.convert_calls += 1;

        let Some(index) = self.enquiries.iter().position(|e| e.enquiry_id == id) else {
            return Err(ServiceError::not_found("enquiry not found"));
        };

        if self.convert_half_commits {
            // Defective non-atomic backend: admission lands, then failure.
            let student_name = self.enquiries[index].student_name.clone();
            self.next_admission_id += 1;
            self.admissions.push(AdmissionRecord {
                admission_id: AdmissionId::new(self.next_admission_id),
                enquiry_id: id,
                student_name,
                admitted_at: ts(120),
            });
            return Err(ServiceError::transport("connection reset during conversion"));
        }

        if let Some(error) = &self.fail_convert {
            return Err(error.clone());
        }

        if !self.enquiries[index].status.may_convert() {
            return Err(ServiceError::rejected("enquiry is not approved"));
        }

        // Atomic: both sides or neither.
        self.enquiries[index].status = EnquiryStatus::Converted;
        self.next_admission_id += 1;
        let admission = AdmissionRecord {
            admission_id: AdmissionId::new(self.next_admission_id),
            enquiry_id: id,
            student_name: self.enquiries[index].student_name.clone(),
            admitted_at: ts(120),
        };
        self.admissions.push(admission.clone());
        Ok(admission)
    }

    fn create_class(&mut self, class: &NewClass) -> Result<(), ServiceError> {
        self.create_class_calls += 1;

        if let Some(error) = &self.fail_create_class {
            return Err(error.clone());
        }

        if !self.suppress_class_insert {
            self.next_class_id += 1;
            self.created_tick += 1;
            self.classes.push(ClassRecord {
                class_id: ClassId::new(self.next_class_id),
                name: class.name.clone(),
                academic_year: class.academic_year.clone(),
                branch_id: class.branch_id,
                created_at: ts(10_000 + self.created_tick * 60),
            });
        }

        // The identifier is deliberately not echoed.
        Ok(())
    }

    fn find_classes(
        &self,
        name: &str,
        academic_year: &AcademicYear,
        branch_id: BranchId,
    ) -> Result<Vec<ClassRecord>, ServiceError> {
        self.find_class_calls.set(self.find_class_calls.get() + 1);
        self.find_class_keys.borrow_mut().push((
            name.to_string(),
            academic_year.value().to_string(),
            branch_id.value(),
        ));

        if let Some(error) = &self.fail_find_classes {
            return Err(error.clone());
        }

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
        self.map_subject_calls += 1;

        if let Some(error) = &self.fail_map_subjects {
            return Err(error.clone());
        }

        if !self.classes.iter().any(|c| c.class_id == class_id) {
            return Err(ServiceError::not_found("class not found"));
        }

        for course_id in subject_ids {
            if !self.class_subjects.contains(&(class_id, *course_id)) {
                self.class_subjects.push((class_id, *course_id));
            }
        }
        Ok(())
    }

    fn list_teachers(&self) -> Result<Vec<Teacher>, ServiceError> {
        Ok(self.teachers.clone())
    }

    fn list_courses(&self, grade: Option<GradeLevel>) -> Result<Vec<Course>, ServiceError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| grade.is_none_or(|g| c.grade_level == g))
            .cloned()
            .collect())
    }
}
