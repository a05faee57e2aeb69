// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrol::ServiceError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested record was not found.
    NotFound(String),
    /// Schema initialization failed.
    InitializationError(String),
    /// A stored value could not be interpreted.
    CorruptRow(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::CorruptRow(msg) => write!(f, "Corrupt row: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::NotFound(String::from("Record not found"))
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ServiceError {
    fn from(err: PersistenceError) -> Self {
        let payload = serde_json::json!({
            "source": "sqlite",
            "error": err.to_string(),
        });
        match err {
            PersistenceError::NotFound(msg) => Self::not_found(&msg),
            PersistenceError::DatabaseConnectionFailed(msg) => {
                Self::transport(&msg).with_payload(payload)
            }
            other => Self::rejected(&other.to_string()).with_payload(payload),
        }
    }
}
