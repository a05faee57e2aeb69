// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-backed Remote Data Service for the Enrol system.
//!
//! This crate provides `SqliteDataService`, a concrete implementation of
//! the `RemoteDataService` contract standing in for the hosted backend.
//! It honors the contract's load-bearing quirks:
//!
//! - `create_class` does not echo the new identifier; callers re-resolve
//!   it through `find_classes`, which orders matches newest-first.
//! - `convert_enquiry` runs the admission insert and the enquiry status
//!   flip inside a single transaction, so conversion is atomic.
//!
//! `SQLite` requires no external infrastructure; unit and integration
//! tests run against in-memory databases.

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
mod schema;
mod store;

#[cfg(test)]
mod tests;

use rusqlite::{Connection, params};
use std::path::Path;
use tracing::info;

pub use error::PersistenceError;

use enrol_domain::{AdmissionId, AdmissionRecord, CourseId, EnquiryId, EnquiryStatus, GradeLevel, TeacherId};

/// A `RemoteDataService` backed by a `SQLite` database.
pub struct SqliteDataService {
    conn: Connection,
}

impl SqliteDataService {
    /// Creates a service over an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;
        schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a service over a file-backed database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;
        schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Seeds a teacher and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_teacher(&self, name: &str) -> Result<TeacherId, PersistenceError> {
        self.conn
            .execute("INSERT INTO teachers (name) VALUES (?1)", params![name])?;
        Ok(TeacherId::new(self.conn.last_insert_rowid()))
    }

    /// Seeds a course at a grade level and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_course(
        &self,
        name: &str,
        grade: GradeLevel,
    ) -> Result<CourseId, PersistenceError> {
        self.conn.execute(
            "INSERT INTO courses (name, grade_level) VALUES (?1, ?2)",
            params![name, grade.as_str()],
        )?;
        Ok(CourseId::new(self.conn.last_insert_rowid()))
    }

    /// Seeds an enquiry and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_enquiry(
        &self,
        student_name: &str,
        guardian_phone: &str,
        grade_applied: GradeLevel,
        status: EnquiryStatus,
    ) -> Result<EnquiryId, PersistenceError> {
        self.conn.execute(
            "INSERT INTO enquiries (student_name, guardian_phone, grade_applied, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                student_name,
                guardian_phone,
                grade_applied.as_str(),
                status.as_str(),
                store::now_rfc3339()?,
            ],
        )?;
        let enquiry_id: EnquiryId = EnquiryId::new(self.conn.last_insert_rowid());
        info!(enquiry_id = enquiry_id.value(), student_name, "Seeded enquiry");
        Ok(enquiry_id)
    }

    /// Looks up the admission record for an enquiry, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_admission(
        &self,
        enquiry_id: EnquiryId,
    ) -> Result<Option<AdmissionRecord>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT admission_id, enquiry_id, student_name, admitted_at
             FROM admissions WHERE enquiry_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![enquiry_id.value()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        match rows.next() {
            Some(row) => {
                let (admission_id, enquiry_id, student_name, admitted_at) = row?;
                Ok(Some(AdmissionRecord {
                    admission_id: AdmissionId::new(admission_id),
                    enquiry_id: EnquiryId::new(enquiry_id),
                    student_name,
                    admitted_at: store::parse_rfc3339(&admitted_at)?,
                }))
            }
            None => Ok(None),
        }
    }

    pub(crate) const fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) const fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
