// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqliteDataService;
use enrol::RemoteDataService;
use enrol_domain::{EnquiryId, EnquiryStatus, GradeLevel};

fn service_with_enquiry(status: EnquiryStatus) -> (SqliteDataService, EnquiryId) {
    let service = SqliteDataService::new_in_memory().expect("in-memory database");
    let enquiry_id = service
        .insert_enquiry("Asha Verma", "+91-98000-00000", GradeLevel::Grade5, status)
        .expect("seed enquiry");
    (service, enquiry_id)
}

#[test]
fn test_conversion_commits_both_sides() {
    let (mut service, enquiry_id) = service_with_enquiry(EnquiryStatus::Approved);

    let admission = service.convert_enquiry(enquiry_id).expect("convert");

    assert_eq!(admission.enquiry_id, enquiry_id);
    assert_eq!(admission.student_name, "Asha Verma");

    // Both sides landed: admission row and flipped status.
    let fetched = service.fetch_enquiry(enquiry_id).expect("fetch");
    assert_eq!(fetched.status, EnquiryStatus::Converted);
    let stored = service
        .find_admission(enquiry_id)
        .expect("admission lookup");
    assert_eq!(stored, Some(admission));
}

#[test]
fn test_conversion_of_unapproved_enquiry_writes_nothing() {
    for status in [
        EnquiryStatus::New,
        EnquiryStatus::Contacted,
        EnquiryStatus::Verified,
        EnquiryStatus::Rejected,
    ] {
        let (mut service, enquiry_id) = service_with_enquiry(status);

        let result = service.convert_enquiry(enquiry_id);
        assert!(result.is_err(), "conversion from '{status}' must be refused");

        // Neither side changed: no admission, status intact.
        let fetched = service.fetch_enquiry(enquiry_id).expect("fetch");
        assert_eq!(fetched.status, status);
        assert!(
            service
                .find_admission(enquiry_id)
                .expect("admission lookup")
                .is_none()
        );
    }
}

#[test]
fn test_conversion_is_not_repeatable() {
    let (mut service, enquiry_id) = service_with_enquiry(EnquiryStatus::Approved);

    let first = service.convert_enquiry(enquiry_id).expect("first conversion");

    let second = service.convert_enquiry(enquiry_id);
    assert!(second.is_err(), "converted enquiries cannot convert again");

    // The original admission is untouched.
    let stored = service
        .find_admission(enquiry_id)
        .expect("admission lookup");
    assert_eq!(stored, Some(first));
}

#[test]
fn test_conversion_of_missing_enquiry_fails_cleanly() {
    let mut service = SqliteDataService::new_in_memory().expect("in-memory database");

    let result = service.convert_enquiry(EnquiryId::new(404));
    assert!(result.is_err());
}
