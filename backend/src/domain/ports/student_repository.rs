//! Port for student persistence.

use async_trait::async_trait;

use crate::domain::entities::Student;
use crate::domain::ids::{ClassId, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "student repository query failed: {message}",
        /// A student with this roll number already exists.
        DuplicateRollNo { roll_no: String } =>
            "roll number {roll_no} already exists",
    }
}

/// New student draft; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Pre-generated identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Unique roll number.
    pub roll_no: String,
    /// Class the student enrols into.
    pub class_id: ClassId,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New roll number.
    pub roll_no: Option<String>,
    /// New enrolment class.
    pub class_id: Option<ClassId>,
}

/// Port for student storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student. Fails with
    /// [`StudentRepositoryError::DuplicateRollNo`] when the roll number is
    /// taken.
    async fn create(&self, student: NewStudent) -> Result<Student, StudentRepositoryError>;

    /// All students, ordered by roll number.
    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError>;

    /// Fetch one student by id.
    async fn find_by_id(&self, id: StudentId)
        -> Result<Option<Student>, StudentRepositoryError>;

    /// Students enrolled in one class, ordered by roll number.
    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<Student>, StudentRepositoryError>;

    /// Apply a partial update. Returns `None` when the student does not
    /// exist.
    async fn update(
        &self,
        id: StudentId,
        update: StudentUpdate,
    ) -> Result<Option<Student>, StudentRepositoryError>;

    /// Delete a student. Returns `false` when the student does not exist.
    /// Attendance records are left in place (no cascade).
    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError>;
}
