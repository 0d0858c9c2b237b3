//! Port for subject persistence, including teacher/class link sets.

use async_trait::async_trait;

use crate::domain::entities::Subject;
use crate::domain::ids::{ClassId, SubjectId, TeacherId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subject repository adapters.
    pub enum SubjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subject repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subject repository query failed: {message}",
        /// A subject with this code already exists.
        DuplicateCode { code: String } =>
            "subject code {code} already exists",
    }
}

/// New subject draft; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    /// Pre-generated identifier.
    pub id: SubjectId,
    /// Display name.
    pub name: String,
    /// Unique course code.
    pub code: String,
    /// Initial teacher link set.
    pub teacher_ids: Vec<TeacherId>,
    /// Initial class link set.
    pub class_ids: Vec<ClassId>,
}

/// Partial update; absent fields keep their stored values. Supplying a
/// teacher or class id replaces the whole link set with that single link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New course code.
    pub code: Option<String>,
    /// Replacement teacher link.
    pub teacher_id: Option<TeacherId>,
    /// Replacement class link.
    pub class_id: Option<ClassId>,
}

/// Port for subject storage and retrieval. Returned subjects always carry
/// their link sets populated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Insert a new subject with its initial links. Fails with
    /// [`SubjectRepositoryError::DuplicateCode`] when the code is taken.
    async fn create(&self, subject: NewSubject) -> Result<Subject, SubjectRepositoryError>;

    /// All subjects, ordered by code.
    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError>;

    /// Fetch one subject by id.
    async fn find_by_id(&self, id: SubjectId)
        -> Result<Option<Subject>, SubjectRepositoryError>;

    /// Apply a partial update. Returns `None` when the subject does not
    /// exist.
    async fn update(
        &self,
        id: SubjectId,
        update: SubjectUpdate,
    ) -> Result<Option<Subject>, SubjectRepositoryError>;

    /// Delete a subject and its links. Returns `false` when the subject does
    /// not exist.
    async fn delete(&self, id: SubjectId) -> Result<bool, SubjectRepositoryError>;
}
