//! PostgreSQL-backed [`TeacherRepository`] implementation using Diesel.
//!
//! Relationship links live in the `teacher_classes` and `subject_teachers`
//! join tables; a single row covers both directions of each link, and
//! linking uses `ON CONFLICT DO NOTHING` for add-to-set semantics.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{Teacher, TeacherRole};
use crate::domain::ids::{ClassId, SubjectId, TeacherId};
use crate::domain::ports::{
    NewTeacher, TeacherRepository, TeacherRepositoryError, TeacherUpdate,
};

use super::models::{NewTeacherRow, TeacherChangeset, TeacherClassRow, TeacherRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subject_teachers, teacher_classes, teachers};

/// Diesel-backed implementation of the [`TeacherRepository`] port.
#[derive(Clone)]
pub struct DieselTeacherRepository {
    pool: DbPool,
}

impl DieselTeacherRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TeacherRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TeacherRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(email: &str, error: diesel::result::Error) -> TeacherRepositoryError {
    if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return TeacherRepositoryError::duplicate_email(email);
    }
    debug!(error = %error, "teacher repository operation failed");
    TeacherRepositoryError::query(error.to_string())
}

/// Read a stored role label, repairing unknown values to `teacher`.
fn parse_stored_role(teacher_id: Uuid, label: &str) -> TeacherRole {
    label.parse().unwrap_or_else(|_| {
        warn!(
            teacher = %teacher_id,
            role = label,
            "stored role outside the enum, reading as teacher"
        );
        TeacherRole::Teacher
    })
}

fn assemble_teacher(row: TeacherRow, class_ids: Vec<Uuid>, subject_ids: Vec<Uuid>) -> Teacher {
    Teacher {
        id: TeacherId::new(row.id),
        role: parse_stored_role(row.id, &row.role),
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        class_ids: class_ids.into_iter().map(ClassId::new).collect(),
        subject_ids: subject_ids.into_iter().map(SubjectId::new).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

async fn load_links(
    conn: &mut AsyncPgConnection,
    teacher_id: Uuid,
) -> Result<(Vec<Uuid>, Vec<Uuid>), diesel::result::Error> {
    let class_ids = teacher_classes::table
        .filter(teacher_classes::teacher_id.eq(teacher_id))
        .select(teacher_classes::class_id)
        .load(conn)
        .await?;
    let subject_ids = subject_teachers::table
        .filter(subject_teachers::teacher_id.eq(teacher_id))
        .select(subject_teachers::subject_id)
        .load(conn)
        .await?;
    Ok((class_ids, subject_ids))
}

#[async_trait]
impl TeacherRepository for DieselTeacherRepository {
    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTeacherRow {
            id: teacher.id.into_uuid(),
            name: teacher.name,
            email: teacher.email.clone(),
            password_hash: teacher.password_hash,
            role: teacher.role.as_str().to_owned(),
        };
        let inserted: TeacherRow = diesel::insert_into(teachers::table)
            .values(&row)
            .returning(TeacherRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(&teacher.email, error))?;
        Ok(assemble_teacher(inserted, Vec::new(), Vec::new()))
    }

    async fn find_by_id(
        &self,
        id: TeacherId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TeacherRow> = teachers::table
            .find(*id.as_uuid())
            .select(TeacherRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error("", error))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let (class_ids, subject_ids) = load_links(&mut conn, row.id)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(Some(assemble_teacher(row, class_ids, subject_ids)))
    }

    async fn update(
        &self,
        id: TeacherId,
        update: TeacherUpdate,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email = update.email.clone().unwrap_or_default();
        let row: Option<TeacherRow> = diesel::update(teachers::table.find(*id.as_uuid()))
            .set((
                TeacherChangeset {
                    name: update.name,
                    email: update.email,
                    password_hash: update.password_hash,
                },
                teachers::updated_at.eq(diesel::dsl::now),
            ))
            .returning(TeacherRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(&email, error))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let (class_ids, subject_ids) = load_links(&mut conn, row.id)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(Some(assemble_teacher(row, class_ids, subject_ids)))
    }

    async fn delete(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Link rows cascade via their foreign keys.
        let deleted = diesel::delete(teachers::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(deleted > 0)
    }

    async fn add_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(teacher_classes::table)
            .values(&TeacherClassRow {
                teacher_id: teacher_id.into_uuid(),
                class_id: class_id.into_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(())
    }

    async fn remove_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            teacher_classes::table
                .filter(teacher_classes::teacher_id.eq(teacher_id.into_uuid()))
                .filter(teacher_classes::class_id.eq(class_id.into_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|error| map_diesel_error("", error))?;
        Ok(())
    }

    async fn add_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subject_teachers::table)
            .values((
                subject_teachers::subject_id.eq(subject_id.into_uuid()),
                subject_teachers::teacher_id.eq(teacher_id.into_uuid()),
            ))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(())
    }

    async fn remove_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            subject_teachers::table
                .filter(subject_teachers::subject_id.eq(subject_id.into_uuid()))
                .filter(subject_teachers::teacher_id.eq(teacher_id.into_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|error| map_diesel_error("", error))?;
        Ok(())
    }
}
