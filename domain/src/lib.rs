//! Domain library for the student app.
//!
//! Holds the student types, the storage port (trait) and the error definition,
//! plus the startup seeding step. Keep storage backends that need IO out of
//! this crate; only the in-memory adapter lives here.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by a storage backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(u64);

impl StudentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input data for a student that has not been stored yet.
///
/// Fields are free-form; no format checks are applied to `email`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
}

impl NewStudent {
    pub fn new<N, E>(name: N, email: E, date_of_birth: NaiveDate, age: i32) -> Self
    where
        N: Into<String>,
        E: Into<String>,
    {
        Self {
            name: name.into(),
            email: email.into(),
            date_of_birth,
            age,
        }
    }
}

/// Stored student record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
}

impl Student {
    /// Attach a backend-assigned id to submitted student data.
    pub fn from_new(id: StudentId, input: NewStudent) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            date_of_birth: input.date_of_birth,
            age: input.age,
        }
    }
}

/// Repository port for persisting students.
///
/// Backends store the batch in the given order and return the stored records
/// in that same order. Partial-failure behaviour is up to the backend.
pub trait StudentRepository: Send + Sync {
    fn save_all(&self, students: Vec<NewStudent>) -> Result<Vec<Student>, CoreError>;
}

/// Core domain errors (no external error crates to keep deps small).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    Repository(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::Repository(msg) => write!(f, "repository error: {}", msg),
        }
    }
}

impl Error for CoreError {}

/// Return a short about/version line for binaries to log.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{}", pkg, ver)
}

pub mod adapters;
pub mod seed;
