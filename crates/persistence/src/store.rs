// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `RemoteDataService` implementation over `SQLite`.

use crate::SqliteDataService;
use crate::error::PersistenceError;
use enrol::{RemoteDataService, ServiceError};
use enrol_domain::{
    AcademicYear, AdmissionId, AdmissionRecord, BranchId, ClassId, ClassRecord, Course, CourseId,
    EnquiryId, EnquiryRecord, EnquiryStatus, GradeLevel, NewClass, Teacher, TeacherId,
};
use rusqlite::{Transaction, params};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

/// Formats the current instant as RFC 3339.
pub(crate) fn now_rfc3339() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::CorruptRow(format!("timestamp formatting failed: {e}")))
}

/// Parses a stored RFC 3339 timestamp.
pub(crate) fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRow(format!("bad timestamp '{value}': {e}")))
}

fn parse_status(value: &str) -> Result<EnquiryStatus, PersistenceError> {
    EnquiryStatus::from_str(value)
        .map_err(|e| PersistenceError::CorruptRow(format!("bad status '{value}': {e}")))
}

fn parse_grade(value: &str) -> Result<GradeLevel, PersistenceError> {
    GradeLevel::from_str(value)
        .map_err(|e| PersistenceError::CorruptRow(format!("bad grade '{value}': {e}")))
}

fn parse_year(value: &str) -> Result<AcademicYear, PersistenceError> {
    AcademicYear::new(value)
        .map_err(|e| PersistenceError::CorruptRow(format!("bad academic year '{value}': {e}")))
}

/// Raw enquiry row as stored.
type EnquiryRow = (i64, String, String, String, String, String);

fn enquiry_from_row(row: EnquiryRow) -> Result<EnquiryRecord, PersistenceError> {
    let (enquiry_id, student_name, guardian_phone, grade_applied, status, updated_at) = row;
    Ok(EnquiryRecord {
        enquiry_id: EnquiryId::new(enquiry_id),
        student_name,
        guardian_phone,
        grade_applied: parse_grade(&grade_applied)?,
        status: parse_status(&status)?,
        updated_at: parse_rfc3339(&updated_at)?,
    })
}

fn select_enquiry(
    conn: &rusqlite::Connection,
    id: EnquiryId,
) -> Result<EnquiryRecord, PersistenceError> {
    let row: EnquiryRow = conn
        .query_row(
            "SELECT enquiry_id, student_name, guardian_phone, grade_applied, status, updated_at
             FROM enquiries WHERE enquiry_id = ?1",
            params![id.value()],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                PersistenceError::NotFound(format!("enquiry {} not found", id.value()))
            }
            other => PersistenceError::from(other),
        })?;
    enquiry_from_row(row)
}

impl RemoteDataService for SqliteDataService {
    fn fetch_enquiry(&self, id: EnquiryId) -> Result<EnquiryRecord, ServiceError> {
        Ok(select_enquiry(self.connection(), id)?)
    }

    fn update_enquiry_status(
        &mut self,
        id: EnquiryId,
        status: EnquiryStatus,
    ) -> Result<EnquiryRecord, ServiceError> {
        let updated: usize = self
            .connection()
            .execute(
                "UPDATE enquiries SET status = ?1, updated_at = ?2 WHERE enquiry_id = ?3",
                params![status.as_str(), now_rfc3339()?, id.value()],
            )
            .map_err(PersistenceError::from)?;

        if updated == 0 {
            return Err(
                PersistenceError::NotFound(format!("enquiry {} not found", id.value())).into(),
            );
        }

        debug!(enquiry_id = id.value(), status = status.as_str(), "Updated enquiry status");
        Ok(select_enquiry(self.connection(), id)?)
    }

    fn convert_enquiry(&mut self, id: EnquiryId) -> Result<AdmissionRecord, ServiceError> {
        let tx: Transaction<'_> = self
            .connection_mut()
            .transaction()
            .map_err(PersistenceError::from)?;

        let enquiry: EnquiryRecord = select_enquiry(&tx, id)?;

        if !enquiry.status.may_convert() {
            // The transaction rolls back on drop; nothing was written.
            return Err(ServiceError::rejected("enquiry is not approved").with_details(
                &format!("current status is '{}'", enquiry.status),
            ));
        }

        let admitted_at: String = now_rfc3339()?;

        // One transaction covers both sides: the admission insert and the
        // enquiry status flip commit together or not at all.
        tx.execute(
            "INSERT INTO admissions (enquiry_id, student_name, admitted_at)
             VALUES (?1, ?2, ?3)",
            params![id.value(), enquiry.student_name, admitted_at],
        )
        .map_err(PersistenceError::from)?;
        let admission_id: i64 = tx.last_insert_rowid();

        tx.execute(
            "UPDATE enquiries SET status = ?1, updated_at = ?2 WHERE enquiry_id = ?3",
            params![EnquiryStatus::Converted.as_str(), admitted_at, id.value()],
        )
        .map_err(PersistenceError::from)?;

        tx.commit().map_err(PersistenceError::from)?;

        info!(enquiry_id = id.value(), admission_id, "Converted enquiry to admission");

        Ok(AdmissionRecord {
            admission_id: AdmissionId::new(admission_id),
            enquiry_id: id,
            student_name: enquiry.student_name,
            admitted_at: parse_rfc3339(&admitted_at)?,
        })
    }

    fn create_class(&mut self, class: &NewClass) -> Result<(), ServiceError> {
        self.connection()
            .execute(
                "INSERT INTO classes
                 (name, grade_level, section, academic_year, teacher_id, capacity, branch_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    class.name,
                    class.grade_level.as_str(),
                    class.section,
                    class.academic_year.value(),
                    class.teacher_id.map(|t| t.value()),
                    class.capacity,
                    class.branch_id.value(),
                    now_rfc3339()?,
                ],
            )
            .map_err(PersistenceError::from)?;

        debug!(name = %class.name, year = class.academic_year.value(), "Created class");

        // The identifier is deliberately not echoed; callers re-resolve it
        // through find_classes.
        Ok(())
    }

    fn find_classes(
        &self,
        name: &str,
        academic_year: &AcademicYear,
        branch_id: BranchId,
    ) -> Result<Vec<ClassRecord>, ServiceError> {
        let mut stmt = self
            .connection()
            .prepare(
                "SELECT class_id, name, academic_year, branch_id, created_at
                 FROM classes
                 WHERE name = ?1 AND academic_year = ?2 AND branch_id = ?3
                 ORDER BY created_at DESC, class_id DESC",
            )
            .map_err(PersistenceError::from)?;

        let raw: Vec<(i64, String, String, i64, String)> = stmt
            .query_map(
                params![name, academic_year.value(), branch_id.value()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .map_err(PersistenceError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(PersistenceError::from)?;

        let mut records: Vec<ClassRecord> = Vec::with_capacity(raw.len());
        for (class_id, name, year, branch, created_at) in raw {
            records.push(ClassRecord {
                class_id: ClassId::new(class_id),
                name,
                academic_year: parse_year(&year)?,
                branch_id: BranchId::new(branch),
                created_at: parse_rfc3339(&created_at)?,
            });
        }
        Ok(records)
    }

    fn map_class_subjects(
        &mut self,
        class_id: ClassId,
        subject_ids: &[CourseId],
    ) -> Result<(), ServiceError> {
        let tx: Transaction<'_> = self
            .connection_mut()
            .transaction()
            .map_err(PersistenceError::from)?;

        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM classes WHERE class_id = ?1",
                params![class_id.value()],
                |_| Ok(()),
            )
            .map(|()| true)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                other => Err(PersistenceError::from(other)),
            })?;

        if !exists {
            return Err(PersistenceError::NotFound(format!(
                "class {} not found",
                class_id.value()
            ))
            .into());
        }

        for course_id in subject_ids {
            tx.execute(
                "INSERT OR IGNORE INTO class_subjects (class_id, course_id) VALUES (?1, ?2)",
                params![class_id.value(), course_id.value()],
            )
            .map_err(PersistenceError::from)?;
        }

        tx.commit().map_err(PersistenceError::from)?;

        debug!(
            class_id = class_id.value(),
            count = subject_ids.len(),
            "Mapped class subjects"
        );
        Ok(())
    }

    fn list_teachers(&self) -> Result<Vec<Teacher>, ServiceError> {
        let mut stmt = self
            .connection()
            .prepare("SELECT teacher_id, name FROM teachers ORDER BY name")
            .map_err(PersistenceError::from)?;

        let teachers: Vec<Teacher> = stmt
            .query_map([], |row| {
                Ok(Teacher {
                    teacher_id: TeacherId::new(row.get(0)?),
                    name: row.get(1)?,
                })
            })
            .map_err(PersistenceError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(PersistenceError::from)?;

        Ok(teachers)
    }

    fn list_courses(&self, grade: Option<GradeLevel>) -> Result<Vec<Course>, ServiceError> {
        let raw: Vec<(i64, String, String)> = match grade {
            Some(grade) => {
                let mut stmt = self
                    .connection()
                    .prepare(
                        "SELECT course_id, name, grade_level FROM courses
                         WHERE grade_level = ?1 ORDER BY name",
                    )
                    .map_err(PersistenceError::from)?;
                let rows = stmt
                    .query_map(params![grade.as_str()], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })
                    .map_err(PersistenceError::from)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(PersistenceError::from)?;
                rows
            }
            None => {
                let mut stmt = self
                    .connection()
                    .prepare("SELECT course_id, name, grade_level FROM courses ORDER BY name")
                    .map_err(PersistenceError::from)?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                    .map_err(PersistenceError::from)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(PersistenceError::from)?;
                rows
            }
        };

        let mut courses: Vec<Course> = Vec::with_capacity(raw.len());
        for (course_id, name, grade_level) in raw {
            courses.push(Course {
                course_id: CourseId::new(course_id),
                name,
                grade_level: parse_grade(&grade_level)?,
            });
        }
        Ok(courses)
    }
}
