use std::sync::Mutex;

use crate::{CoreError, NewStudent, Student, StudentId, StudentRepository};

/// Simple in-memory repository. Ids start at 1 and increase by one per stored
/// record; a batch is applied under a single lock.
pub struct InMemoryStudentRepo {
    inner: Mutex<Inner>,
}

struct Inner {
    students: Vec<Student>,
    next_id: u64,
}

impl InMemoryStudentRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                students: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// All stored students in insertion order.
    pub fn find_all(&self) -> Result<Vec<Student>, CoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        Ok(inner.students.clone())
    }

    pub fn count(&self) -> Result<usize, CoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        Ok(inner.students.len())
    }
}

impl Default for InMemoryStudentRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentRepository for InMemoryStudentRepo {
    fn save_all(&self, students: Vec<NewStudent>) -> Result<Vec<Student>, CoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        let mut saved = Vec::with_capacity(students.len());
        for input in students {
            let id = StudentId::new(inner.next_id);
            inner.next_id += 1;
            let student = Student::from_new(id, input);
            inner.students.push(student.clone());
            saved.push(student);
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mk_student(name: &str) -> NewStudent {
        NewStudent::new(
            name,
            format!("{}@example.com", name.to_lowercase()),
            NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            23,
        )
    }

    #[test]
    fn save_all_assigns_sequential_ids() {
        let repo = InMemoryStudentRepo::new();
        let saved = repo
            .save_all(vec![mk_student("A"), mk_student("B"), mk_student("C")])
            .unwrap();
        let ids: Vec<_> = saved.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, [1, 2, 3]);

        let more = repo.save_all(vec![mk_student("D")]).unwrap();
        assert_eq!(more[0].id.get(), 4);
    }

    #[test]
    fn find_all_preserves_insertion_order() {
        let repo = InMemoryStudentRepo::new();
        repo.save_all(vec![mk_student("Zed"), mk_student("Amy")]).unwrap();
        let names: Vec<_> = repo.find_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Zed", "Amy"]);
    }

    #[test]
    fn empty_batch_is_noop() {
        let repo = InMemoryStudentRepo::new();
        let saved = repo.save_all(Vec::new()).unwrap();
        assert!(saved.is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn duplicates_are_stored() {
        let repo = InMemoryStudentRepo::new();
        repo.save_all(vec![mk_student("Same"), mk_student("Same")]).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }
}
