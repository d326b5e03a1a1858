//! sqlite-adapter — SQLite implementation of the StudentRepository port.
//!
//! Purpose
//! - Provide a lightweight, file-based repository so seeded data survives
//!   restarts without any external database.
//! - Implements the `StudentRepository` trait from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - Dates are stored as ISO-8601 text (`YYYY-MM-DD`) via rusqlite's chrono support.
//! - A batch is written inside one transaction; a failed insert rolls back the batch.

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use domain::{CoreError, NewStudent, Student, StudentId, StudentRepository};
use rusqlite::{params, Connection};

/// SQLite-backed student repository.
pub struct SqliteStudentRepo {
    conn: Mutex<Connection>,
}

impl SqliteStudentRepo {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(map_sqerr)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database; contents vanish on drop.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqerr)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CoreError> {
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// All stored students ordered by id.
    pub fn find_all(&self) -> Result<Vec<Student>, CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        let mut stmt = conn
            .prepare("SELECT id, name, email, date_of_birth, age FROM students ORDER BY id")
            .map_err(map_sqerr)?;
        let mut rows = stmt.query([]).map_err(map_sqerr)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqerr)? {
            out.push(row_to_student(row)?);
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<usize, CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .map_err(map_sqerr)?;
        Ok(n as usize)
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            age INTEGER NOT NULL
        );
        "#,
    )
    .map_err(map_sqerr)
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError { CoreError::Repository(format!("sqlite error: {e}")) }

fn row_to_student(row: &rusqlite::Row) -> Result<Student, CoreError> {
    let id: i64 = row.get(0).map_err(map_sqerr)?;
    let name: String = row.get(1).map_err(map_sqerr)?;
    let email: String = row.get(2).map_err(map_sqerr)?;
    let date_of_birth: NaiveDate = row.get(3).map_err(map_sqerr)?;
    let age: i32 = row.get(4).map_err(map_sqerr)?;
    Ok(Student {
        id: StudentId::new(id as u64),
        name,
        email,
        date_of_birth,
        age,
    })
}

impl StudentRepository for SqliteStudentRepo {
    fn save_all(&self, students: Vec<NewStudent>) -> Result<Vec<Student>, CoreError> {
        let mut conn = self.conn.lock().map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        let tx = conn.transaction().map_err(map_sqerr)?;
        let mut saved = Vec::with_capacity(students.len());
        {
            let mut stmt = tx
                .prepare("INSERT INTO students(name, email, date_of_birth, age) VALUES (?1, ?2, ?3, ?4)")
                .map_err(map_sqerr)?;
            for input in students {
                stmt.execute(params![input.name, input.email, input.date_of_birth, input.age])
                    .map_err(map_sqerr)?;
                let id = StudentId::new(tx.last_insert_rowid() as u64);
                saved.push(Student::from_new(id, input));
            }
        }
        tx.commit().map_err(map_sqerr)?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::seed::{initial_students, seed_students};

    fn tmp_db() -> (SqliteStudentRepo, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        let repo = SqliteStudentRepo::open(path).unwrap();
        (repo, dir)
    }

    #[test]
    fn save_all_roundtrip_keeps_fields_and_order() {
        let (repo, _dir) = tmp_db();
        let saved = repo.save_all(initial_students()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id.get(), 1);
        assert_eq!(saved[1].id.get(), 2);

        let got = repo.find_all().unwrap();
        assert_eq!(got, saved);
        assert_eq!(got[0].name, "Hailey");
        assert_eq!(got[0].date_of_birth, NaiveDate::from_ymd_opt(2025, 11, 15).unwrap());
        assert_eq!(got[1].email, "jacobgates@gmail.com");
        assert_eq!(got[1].age, 20);
    }

    #[test]
    fn seeding_twice_stores_four_rows() {
        let repo = SqliteStudentRepo::open_in_memory().unwrap();
        seed_students(&repo).unwrap();
        seed_students(&repo).unwrap();
        assert_eq!(repo.count().unwrap(), 4);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.db");
        {
            let repo = SqliteStudentRepo::open(&path).unwrap();
            seed_students(&repo).unwrap();
        }
        let repo = SqliteStudentRepo::open(&path).unwrap();
        let names: Vec<_> = repo.find_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Hailey", "Jacob"]);
    }

    #[test]
    fn empty_batch_is_noop() {
        let repo = SqliteStudentRepo::open_in_memory().unwrap();
        assert!(repo.save_all(Vec::new()).unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
