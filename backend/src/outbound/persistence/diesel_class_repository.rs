//! PostgreSQL-backed [`ClassRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::entities::Class;
use crate::domain::ids::ClassId;
use crate::domain::ports::{ClassRepository, ClassRepositoryError, NewClass};

use super::models::{ClassRow, NewClassRow};
use super::pool::{DbPool, PoolError};
use super::schema::classes;

/// Diesel-backed implementation of the [`ClassRepository`] port.
#[derive(Clone)]
pub struct DieselClassRepository {
    pool: DbPool,
}

impl DieselClassRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClassRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ClassRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(name: &str, error: diesel::result::Error) -> ClassRepositoryError {
    if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return ClassRepositoryError::duplicate_name(name);
    }
    debug!(error = %error, "class repository operation failed");
    ClassRepositoryError::query(error.to_string())
}

fn row_to_class(row: ClassRow) -> Class {
    Class {
        id: ClassId::new(row.id),
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl ClassRepository for DieselClassRepository {
    async fn create(&self, class: NewClass) -> Result<Class, ClassRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewClassRow {
            id: class.id.into_uuid(),
            name: class.name.clone(),
        };
        let inserted: ClassRow = diesel::insert_into(classes::table)
            .values(&row)
            .returning(ClassRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(&class.name, error))?;
        Ok(row_to_class(inserted))
    }

    async fn list(&self) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ClassRow> = classes::table
            .select(ClassRow::as_select())
            .order_by(classes::name)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(rows.into_iter().map(row_to_class).collect())
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, ClassRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClassRow> = classes::table
            .find(*id.as_uuid())
            .select(ClassRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error("", error))?;
        Ok(row.map(row_to_class))
    }

    async fn rename(
        &self,
        id: ClassId,
        name: String,
    ) -> Result<Option<Class>, ClassRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClassRow> = diesel::update(classes::table.find(*id.as_uuid()))
            .set((
                classes::name.eq(&name),
                classes::updated_at.eq(diesel::dsl::now),
            ))
            .returning(ClassRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(&name, error))?;
        Ok(row.map(row_to_class))
    }

    async fn delete(&self, id: ClassId) -> Result<bool, ClassRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(classes::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(deleted > 0)
    }
}
