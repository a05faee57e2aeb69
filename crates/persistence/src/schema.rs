// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use rusqlite::Connection;
use tracing::info;

/// Initializes the database schema.
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS teachers (
            teacher_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS courses (
            course_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            grade_level TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_courses_grade
            ON courses(grade_level);

        CREATE TABLE IF NOT EXISTS enquiries (
            enquiry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            guardian_phone TEXT NOT NULL,
            grade_applied TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN (
                'new', 'contacted', 'verified', 'approved', 'rejected', 'converted'
            )),
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS admissions (
            admission_id INTEGER PRIMARY KEY AUTOINCREMENT,
            enquiry_id INTEGER NOT NULL UNIQUE,
            student_name TEXT NOT NULL,
            admitted_at TEXT NOT NULL,
            FOREIGN KEY(enquiry_id) REFERENCES enquiries(enquiry_id)
        );

        CREATE TABLE IF NOT EXISTS classes (
            class_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            grade_level TEXT NOT NULL,
            section TEXT NOT NULL,
            academic_year TEXT NOT NULL,
            teacher_id INTEGER,
            capacity INTEGER NOT NULL,
            branch_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(teacher_id) REFERENCES teachers(teacher_id)
        );

        CREATE INDEX IF NOT EXISTS idx_classes_lookup
            ON classes(name, academic_year, branch_id);

        CREATE TABLE IF NOT EXISTS class_subjects (
            class_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            PRIMARY KEY (class_id, course_id),
            FOREIGN KEY(class_id) REFERENCES classes(class_id),
            FOREIGN KEY(course_id) REFERENCES courses(course_id)
        );
        ",
    )
    .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    Ok(())
}
