// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqliteDataService;
use enrol::{RemoteDataService, ServiceErrorKind};
use enrol_domain::{AcademicYear, BranchId, ClassId, CourseId, GradeLevel, NewClass};

fn service() -> SqliteDataService {
    SqliteDataService::new_in_memory().expect("in-memory database")
}

fn new_class(section: &str) -> NewClass {
    NewClass {
        name: GradeLevel::Grade5.class_display_name(section),
        grade_level: GradeLevel::Grade5,
        section: section.to_string(),
        academic_year: AcademicYear::from_start_year(2025),
        teacher_id: None,
        capacity: 30,
        branch_id: BranchId::new(42),
    }
}

#[test]
fn test_created_class_is_found_by_join_key() {
    let mut service = service();
    service.create_class(&new_class("A")).expect("create class");

    let matches = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2025),
            BranchId::new(42),
        )
        .expect("lookup");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Grade 5 - A");
    assert_eq!(matches[0].branch_id, BranchId::new(42));
}

#[test]
fn test_lookup_scopes_by_year_and_branch() {
    let mut service = service();
    service.create_class(&new_class("A")).expect("create class");

    let other_year = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2024),
            BranchId::new(42),
        )
        .expect("lookup");
    assert!(other_year.is_empty());

    let other_branch = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2025),
            BranchId::new(7),
        )
        .expect("lookup");
    assert!(other_branch.is_empty());
}

#[test]
fn test_duplicate_classes_return_newest_first() {
    let mut service = service();
    service.create_class(&new_class("A")).expect("create class");
    service.create_class(&new_class("A")).expect("create duplicate");

    let matches = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2025),
            BranchId::new(42),
        )
        .expect("lookup");

    assert_eq!(matches.len(), 2);
    assert!(
        matches[0].class_id > matches[1].class_id,
        "newest creation must sort first"
    );
    assert!(matches[0].created_at >= matches[1].created_at);
}

#[test]
fn test_subject_mapping_round_trips_and_is_idempotent() {
    let mut service = service();
    let maths = service
        .insert_course("Mathematics V", GradeLevel::Grade5)
        .expect("seed course");
    let science = service
        .insert_course("Science V", GradeLevel::Grade5)
        .expect("seed course");

    service.create_class(&new_class("A")).expect("create class");
    let class_id = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2025),
            BranchId::new(42),
        )
        .expect("lookup")[0]
        .class_id;

    service
        .map_class_subjects(class_id, &[maths, science])
        .expect("map subjects");
    // Remapping the same pairs is not an error.
    service
        .map_class_subjects(class_id, &[maths])
        .expect("idempotent remap");
}

#[test]
fn test_mapping_to_missing_class_is_not_found() {
    let mut service = service();
    let course = service
        .insert_course("Mathematics V", GradeLevel::Grade5)
        .expect("seed course");

    let result = service.map_class_subjects(ClassId::new(404), &[course]);

    match result {
        Err(error) => assert_eq!(error.kind, ServiceErrorKind::NotFound),
        Ok(()) => panic!("mapping to a missing class must fail"),
    }
}

#[test]
fn test_mapping_unknown_course_violates_foreign_key() {
    let mut service = service();
    service.create_class(&new_class("A")).expect("create class");
    let class_id = service
        .find_classes(
            "Grade 5 - A",
            &AcademicYear::from_start_year(2025),
            BranchId::new(42),
        )
        .expect("lookup")[0]
        .class_id;

    let result = service.map_class_subjects(class_id, &[CourseId::new(999)]);
    assert!(result.is_err(), "foreign keys are enforced");
}
