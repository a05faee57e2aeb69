// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{MockRemoteService, test_year, ts};
use crate::{CoreError, DraftUpdate, ProvisioningWizard};
use crate::service::{RemoteDataService, ServiceError};
use enrol_domain::{BranchId, ClassId, CourseId, GradeLevel};

const BRANCH: BranchId = BranchId::new(42);

/// Builds a wizard on the Review step with a complete Grade 5 - A draft
/// carrying two subject selections.
fn ready_wizard(service: &MockRemoteService) -> ProvisioningWizard {
    let catalog = service.list_courses(None).expect("catalog");

    let mut wizard = ProvisioningWizard::new(test_year());
    wizard
        .apply_update(DraftUpdate::GradeLevel(GradeLevel::Grade5), &catalog)
        .expect("set grade");
    wizard
        .apply_update(DraftUpdate::Section(String::from("A")), &catalog)
        .expect("set section");
    wizard
        .apply_update(DraftUpdate::Capacity(30), &catalog)
        .expect("set capacity");
    wizard
        .apply_update(DraftUpdate::AddSubject(CourseId::new(1)), &catalog)
        .expect("add subject");
    wizard
        .apply_update(DraftUpdate::AddSubject(CourseId::new(2)), &catalog)
        .expect("add subject");

    while wizard.cursor() + 1 < wizard.step_count() {
        wizard.advance().expect("advance to review");
    }
    wizard
}

#[test]
fn test_submit_requires_branch_context() {
    let mut service = MockRemoteService::new();
    let mut wizard = ready_wizard(&service);

    let result = wizard.submit(&mut service, None);

    assert!(matches!(result, Err(CoreError::MissingBranchContext)));
    assert_eq!(service.create_class_calls, 0);
}

#[test]
fn test_submit_unavailable_before_final_step() {
    let mut service = MockRemoteService::new();
    let mut wizard = ProvisioningWizard::new(test_year());

    let result = wizard.submit(&mut service, Some(BRANCH));

    assert!(matches!(
        result,
        Err(CoreError::SubmitUnavailable {
            step: "Basic Details"
        })
    ));
    assert_eq!(service.create_class_calls, 0);
}

#[test]
fn test_submit_creates_then_resolves_by_derived_name() {
    let mut service = MockRemoteService::new();
    let mut wizard = ready_wizard(&service);

    let class_id = wizard
        .submit(&mut service, Some(BRANCH))
        .expect("submission should succeed");

    assert_eq!(service.create_class_calls, 1);
    assert_eq!(service.classes.len(), 1);
    assert_eq!(service.classes[0].name, "Grade 5 - A");
    assert_eq!(service.classes[0].class_id, class_id);

    // The lookup used the derived name within (academic_year, branch).
    let keys = service.find_class_keys.borrow();
    assert_eq!(
        keys.as_slice(),
        &[(String::from("Grade 5 - A"), String::from("2025-2026"), 42)]
    );
}

#[test]
fn test_submit_maps_selected_subjects_to_resolved_class() {
    let mut service = MockRemoteService::new();
    let mut wizard = ready_wizard(&service);

    let class_id = wizard
        .submit(&mut service, Some(BRANCH))
        .expect("submission should succeed");

    assert_eq!(service.map_subject_calls, 1);
    assert_eq!(
        service.class_subjects,
        vec![(class_id, CourseId::new(1)), (class_id, CourseId::new(2))]
    );
}

#[test]
fn test_submit_selects_newest_among_duplicates() {
    let mut service = MockRemoteService::new();
    // Two stale duplicates already exist under the same join key; the
    // create call is suppressed so resolution sees only these.
    service.push_class(7, "Grade 5 - A", &test_year(), BRANCH, ts(1_000));
    service.push_class(8, "Grade 5 - A", &test_year(), BRANCH, ts(2_000));
    service.suppress_class_insert = true;

    let mut wizard = ready_wizard(&service);
    let class_id = wizard
        .submit(&mut service, Some(BRANCH))
        .expect("submission should resolve");

    assert_eq!(class_id, ClassId::new(8), "newest creation wins");
}

#[test]
fn test_create_failure_aborts_with_no_further_calls() {
    let mut service = MockRemoteService::new();
    service.fail_create_class = Some(ServiceError::rejected("duplicate class name"));

    let mut wizard = ready_wizard(&service);
    let result = wizard.submit(&mut service, Some(BRANCH));

    assert!(matches!(result, Err(CoreError::ClassCreateFailed(_))));
    assert_eq!(service.find_class_calls.get(), 0);
    assert_eq!(service.map_subject_calls, 0);
    assert!(service.classes.is_empty());
}

#[test]
fn test_created_but_unlocatable_is_distinct_error() {
    let mut service = MockRemoteService::new();
    service.suppress_class_insert = true;

    let mut wizard = ready_wizard(&service);
    let result = wizard.submit(&mut service, Some(BRANCH));

    match result {
        Err(CoreError::ClassUnresolvable {
            name,
            academic_year,
            error: None,
        }) => {
            assert_eq!(name, "Grade 5 - A");
            assert_eq!(academic_year, "2025-2026");
        }
        other => panic!("expected ClassUnresolvable, got {other:?}"),
    }

    // No mapping attempt against an unresolved class.
    assert_eq!(service.map_subject_calls, 0);
}

#[test]
fn test_lookup_call_failure_is_unresolvable_with_source() {
    let mut service = MockRemoteService::new();
    service.fail_find_classes = Some(ServiceError::transport("socket closed"));

    let mut wizard = ready_wizard(&service);
    let result = wizard.submit(&mut service, Some(BRANCH));

    assert!(matches!(
        result,
        Err(CoreError::ClassUnresolvable { error: Some(_), .. })
    ));
    assert_eq!(service.map_subject_calls, 0);
}

#[test]
fn test_mapping_failure_reports_partial_commit_and_keeps_class() {
    let mut service = MockRemoteService::new();
    service.fail_map_subjects = Some(ServiceError::rejected("foreign key violation"));

    let mut wizard = ready_wizard(&service);
    let result = wizard.submit(&mut service, Some(BRANCH));

    match result {
        Err(CoreError::SubjectMappingFailed { class_id, .. }) => {
            // The created class record stays in place for reconciliation.
            assert!(service.classes.iter().any(|c| c.class_id == class_id));
        }
        other => panic!("expected SubjectMappingFailed, got {other:?}"),
    }
    assert!(service.class_subjects.is_empty());

    // The wizard keeps the draft so the operator can retry.
    assert_eq!(wizard.draft().section, "A");
    assert_eq!(wizard.cursor(), wizard.step_count() - 1);
}

#[test]
fn test_empty_subject_selection_skips_mapping() {
    let mut service = MockRemoteService::new();
    let catalog = service.list_courses(None).expect("catalog");

    let mut wizard = ready_wizard(&service);
    wizard
        .apply_update(DraftUpdate::RemoveSubject(CourseId::new(1)), &catalog)
        .expect("remove subject");
    wizard
        .apply_update(DraftUpdate::RemoveSubject(CourseId::new(2)), &catalog)
        .expect("remove subject");

    wizard
        .submit(&mut service, Some(BRANCH))
        .expect("submission should succeed");

    assert_eq!(service.map_subject_calls, 0);
    assert!(service.class_subjects.is_empty());
}

#[test]
fn test_successful_submit_discards_draft() {
    let mut service = MockRemoteService::new();
    let mut wizard = ready_wizard(&service);

    wizard
        .submit(&mut service, Some(BRANCH))
        .expect("submission should succeed");

    assert_eq!(wizard.cursor(), 0);
    assert!(wizard.draft().grade_level.is_none());
    assert!(wizard.draft().section.is_empty());
    assert!(wizard.draft().subject_ids.is_empty());
    assert!(!wizard.is_submitting());
}
