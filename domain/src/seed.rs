//! Initial data written on startup.
//!
//! Re-seeding is not deduplicated: running [`seed_students`] twice against the
//! same repository stores the records twice.

use chrono::NaiveDate;

use crate::{CoreError, NewStudent, StudentRepository};

/// The fixed records inserted on startup, in insertion order.
pub fn initial_students() -> Vec<NewStudent> {
    vec![
        NewStudent::new(
            "Hailey",
            "haileybarks@gmail.com",
            date(2025, 11, 15),
            2,
        ),
        NewStudent::new(
            "Jacob",
            "jacobgates@gmail.com",
            date(2005, 1, 15),
            20,
        ),
    ]
}

/// Submit [`initial_students`] to the repository as a single batch.
///
/// Errors from the repository are returned unchanged.
pub fn seed_students<R: StudentRepository + ?Sized>(repo: &R) -> Result<(), CoreError> {
    repo.save_all(initial_students())?;
    Ok(())
}

// Literal dates above are all valid calendar days.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
