//! PostgreSQL-backed [`StudentRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::entities::Student;
use crate::domain::ids::{ClassId, StudentId};
use crate::domain::ports::{
    NewStudent, StudentRepository, StudentRepositoryError, StudentUpdate,
};

use super::models::{NewStudentRow, StudentChangeset, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::students;

/// Diesel-backed implementation of the [`StudentRepository`] port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StudentRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StudentRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(roll_no: &str, error: diesel::result::Error) -> StudentRepositoryError {
    if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return StudentRepositoryError::duplicate_roll_no(roll_no);
    }
    debug!(error = %error, "student repository operation failed");
    StudentRepositoryError::query(error.to_string())
}

fn row_to_student(row: StudentRow) -> Student {
    Student {
        id: StudentId::new(row.id),
        name: row.name,
        roll_no: row.roll_no,
        class_id: ClassId::new(row.class_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn create(&self, student: NewStudent) -> Result<Student, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStudentRow {
            id: student.id.into_uuid(),
            name: student.name,
            roll_no: student.roll_no.clone(),
            class_id: student.class_id.into_uuid(),
        };
        let inserted: StudentRow = diesel::insert_into(students::table)
            .values(&row)
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(&student.roll_no, error))?;
        Ok(row_to_student(inserted))
    }

    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StudentRow> = students::table
            .select(StudentRow::as_select())
            .order_by(students::roll_no)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(rows.into_iter().map(row_to_student).collect())
    }

    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudentRow> = students::table
            .find(*id.as_uuid())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error("", error))?;
        Ok(row.map(row_to_student))
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StudentRow> = students::table
            .filter(students::class_id.eq(*class_id.as_uuid()))
            .select(StudentRow::as_select())
            .order_by(students::roll_no)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(rows.into_iter().map(row_to_student).collect())
    }

    async fn update(
        &self,
        id: StudentId,
        update: StudentUpdate,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let roll_no = update.roll_no.clone().unwrap_or_default();
        let changes = StudentChangeset {
            name: update.name,
            roll_no: update.roll_no,
            class_id: update.class_id.map(ClassId::into_uuid),
        };
        let row: Option<StudentRow> = diesel::update(students::table.find(*id.as_uuid()))
            .set((changes, students::updated_at.eq(diesel::dsl::now)))
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(&roll_no, error))?;
        Ok(row.map(row_to_student))
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Attendance records are left in place; there is no cascade.
        let deleted = diesel::delete(students::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn unique_violations_map_to_duplicate_roll_no() {
        let error = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(
            map_diesel_error("R-01", error),
            StudentRepositoryError::duplicate_roll_no("R-01")
        );
    }

    #[rstest]
    fn rows_convert_to_domain_students() {
        let now: DateTime<Utc> = Utc::now();
        let row = StudentRow {
            id: Uuid::new_v4(),
            name: "Asha".to_owned(),
            roll_no: "R-01".to_owned(),
            class_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let student = row_to_student(row);
        assert_eq!(student.roll_no, "R-01");
        assert_eq!(student.name, "Asha");
    }
}
