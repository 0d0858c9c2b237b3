//! Port for class persistence.

use async_trait::async_trait;

use crate::domain::entities::Class;
use crate::domain::ids::ClassId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by class repository adapters.
    pub enum ClassRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "class repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "class repository query failed: {message}",
        /// A class with this name already exists.
        DuplicateName { name: String } =>
            "class {name} already exists",
    }
}

/// New class draft; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    /// Pre-generated identifier.
    pub id: ClassId,
    /// Unique display name.
    pub name: String,
}

/// Port for class storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Insert a new class. Fails with
    /// [`ClassRepositoryError::DuplicateName`] when the name is taken.
    async fn create(&self, class: NewClass) -> Result<Class, ClassRepositoryError>;

    /// All classes, ordered by name.
    async fn list(&self) -> Result<Vec<Class>, ClassRepositoryError>;

    /// Fetch one class by id.
    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, ClassRepositoryError>;

    /// Rename a class. Returns `None` when the class does not exist.
    async fn rename(
        &self,
        id: ClassId,
        name: String,
    ) -> Result<Option<Class>, ClassRepositoryError>;

    /// Delete a class. Returns `false` when the class does not exist.
    async fn delete(&self, id: ClassId) -> Result<bool, ClassRepositoryError>;
}
