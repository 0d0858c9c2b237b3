//! Port for teacher persistence and the teacher↔class / teacher↔subject
//! relationship links.
//!
//! A link row represents both directions of the relationship, so the
//! add/remove operations here replace the original's paired array updates.

use async_trait::async_trait;

use crate::domain::entities::{Teacher, TeacherRole};
use crate::domain::ids::{ClassId, SubjectId, TeacherId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by teacher repository adapters.
    pub enum TeacherRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "teacher repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "teacher repository query failed: {message}",
        /// A teacher with this email already exists.
        DuplicateEmail { email: String } =>
            "teacher {email} already exists",
    }
}

/// New teacher draft; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    /// Pre-generated identifier.
    pub id: TeacherId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Opaque credential hash issued externally, when provisioned with one.
    pub password_hash: Option<String>,
    /// Stored role label.
    pub role: TeacherRole,
}

/// Partial profile update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// Replacement credential hash.
    pub password_hash: Option<String>,
}

/// Port for teacher storage, retrieval, and relationship management.
/// Returned teachers always carry their link sets populated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Insert a new teacher. Fails with
    /// [`TeacherRepositoryError::DuplicateEmail`] when the email is taken.
    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, TeacherRepositoryError>;

    /// Fetch one teacher by id.
    async fn find_by_id(&self, id: TeacherId)
        -> Result<Option<Teacher>, TeacherRepositoryError>;

    /// Apply a partial profile update. Returns `None` when the teacher does
    /// not exist.
    async fn update(
        &self,
        id: TeacherId,
        update: TeacherUpdate,
    ) -> Result<Option<Teacher>, TeacherRepositoryError>;

    /// Delete a teacher and their links. Returns `false` when the teacher
    /// does not exist.
    async fn delete(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError>;

    /// Link a class to a teacher; linking twice is a no-op.
    async fn add_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError>;

    /// Remove a class↔teacher link; removing an absent link is a no-op.
    async fn remove_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError>;

    /// Link a subject to a teacher; linking twice is a no-op.
    async fn add_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError>;

    /// Remove a subject↔teacher link; removing an absent link is a no-op.
    async fn remove_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError>;
}
