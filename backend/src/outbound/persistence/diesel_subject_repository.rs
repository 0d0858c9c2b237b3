//! PostgreSQL-backed [`SubjectRepository`] implementation using Diesel.
//!
//! Link sets live in the `subject_teachers` and `subject_classes` join
//! tables; mutations touch the subject row and its links inside one
//! transaction. The adapter also implements [`SubjectDirectory`] for the
//! report aggregator's name lookups.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::Subject;
use crate::domain::ids::{ClassId, SubjectId, TeacherId};
use crate::domain::ports::{
    NewSubject, SubjectDirectory, SubjectDirectoryError, SubjectRepository,
    SubjectRepositoryError, SubjectUpdate,
};

use super::models::{
    NewSubjectRow, SubjectChangeset, SubjectClassRow, SubjectRow, SubjectTeacherRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{subject_classes, subject_teachers, subjects};

/// Diesel-backed implementation of the [`SubjectRepository`] port.
#[derive(Clone)]
pub struct DieselSubjectRepository {
    pool: DbPool,
}

impl DieselSubjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubjectRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SubjectRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(code: &str, error: diesel::result::Error) -> SubjectRepositoryError {
    if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return SubjectRepositoryError::duplicate_code(code);
    }
    debug!(error = %error, "subject repository operation failed");
    SubjectRepositoryError::query(error.to_string())
}

fn assemble_subject(
    row: SubjectRow,
    teacher_ids: Vec<Uuid>,
    class_ids: Vec<Uuid>,
) -> Subject {
    Subject {
        id: SubjectId::new(row.id),
        name: row.name,
        code: row.code,
        teacher_ids: teacher_ids.into_iter().map(TeacherId::new).collect(),
        class_ids: class_ids.into_iter().map(ClassId::new).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

async fn load_links(
    conn: &mut AsyncPgConnection,
    subject_id: Uuid,
) -> Result<(Vec<Uuid>, Vec<Uuid>), diesel::result::Error> {
    let teacher_ids = subject_teachers::table
        .filter(subject_teachers::subject_id.eq(subject_id))
        .select(subject_teachers::teacher_id)
        .load(conn)
        .await?;
    let class_ids = subject_classes::table
        .filter(subject_classes::subject_id.eq(subject_id))
        .select(subject_classes::class_id)
        .load(conn)
        .await?;
    Ok((teacher_ids, class_ids))
}

#[async_trait]
impl SubjectRepository for DieselSubjectRepository {
    async fn create(&self, subject: NewSubject) -> Result<Subject, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let code = subject.code.clone();

        let (row, teacher_ids, class_ids) = conn
            .transaction(|conn| {
                async move {
                    let row: SubjectRow = diesel::insert_into(subjects::table)
                        .values(&NewSubjectRow {
                            id: subject.id.into_uuid(),
                            name: subject.name,
                            code: subject.code,
                        })
                        .returning(SubjectRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let teacher_rows: Vec<SubjectTeacherRow> = subject
                        .teacher_ids
                        .iter()
                        .map(|teacher| SubjectTeacherRow {
                            subject_id: row.id,
                            teacher_id: teacher.into_uuid(),
                        })
                        .collect();
                    diesel::insert_into(subject_teachers::table)
                        .values(&teacher_rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    let class_rows: Vec<SubjectClassRow> = subject
                        .class_ids
                        .iter()
                        .map(|class| SubjectClassRow {
                            subject_id: row.id,
                            class_id: class.into_uuid(),
                        })
                        .collect();
                    diesel::insert_into(subject_classes::table)
                        .values(&class_rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    let (teacher_ids, class_ids) = load_links(conn, row.id).await?;
                    Ok::<_, diesel::result::Error>((row, teacher_ids, class_ids))
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(&code, error))?;

        Ok(assemble_subject(row, teacher_ids, class_ids))
    }

    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SubjectRow> = subjects::table
            .select(SubjectRow::as_select())
            .order_by(subjects::code)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        let teacher_links: Vec<SubjectTeacherRow> = subject_teachers::table
            .select((subject_teachers::subject_id, subject_teachers::teacher_id))
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        let class_links: Vec<SubjectClassRow> = subject_classes::table
            .select((subject_classes::subject_id, subject_classes::class_id))
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;

        let mut teachers_by_subject: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in teacher_links {
            teachers_by_subject
                .entry(link.subject_id)
                .or_default()
                .push(link.teacher_id);
        }
        let mut classes_by_subject: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in class_links {
            classes_by_subject
                .entry(link.subject_id)
                .or_default()
                .push(link.class_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let teacher_ids = teachers_by_subject.remove(&row.id).unwrap_or_default();
                let class_ids = classes_by_subject.remove(&row.id).unwrap_or_default();
                assemble_subject(row, teacher_ids, class_ids)
            })
            .collect())
    }

    async fn find_by_id(
        &self,
        id: SubjectId,
    ) -> Result<Option<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SubjectRow> = subjects::table
            .find(*id.as_uuid())
            .select(SubjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error("", error))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let (teacher_ids, class_ids) = load_links(&mut conn, row.id)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(Some(assemble_subject(row, teacher_ids, class_ids)))
    }

    async fn update(
        &self,
        id: SubjectId,
        update: SubjectUpdate,
    ) -> Result<Option<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let code = update.code.clone().unwrap_or_default();
        let subject_uuid = *id.as_uuid();

        let result = conn
            .transaction(|conn| {
                async move {
                    let row: Option<SubjectRow> =
                        diesel::update(subjects::table.find(subject_uuid))
                            .set((
                                SubjectChangeset {
                                    name: update.name,
                                    code: update.code,
                                },
                                subjects::updated_at.eq(diesel::dsl::now),
                            ))
                            .returning(SubjectRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };

                    // A supplied link replaces the whole set, mirroring the
                    // singleton-array behaviour of the original API.
                    if let Some(teacher) = update.teacher_id {
                        diesel::delete(
                            subject_teachers::table
                                .filter(subject_teachers::subject_id.eq(subject_uuid)),
                        )
                        .execute(conn)
                        .await?;
                        diesel::insert_into(subject_teachers::table)
                            .values(&SubjectTeacherRow {
                                subject_id: subject_uuid,
                                teacher_id: teacher.into_uuid(),
                            })
                            .execute(conn)
                            .await?;
                    }
                    if let Some(class) = update.class_id {
                        diesel::delete(
                            subject_classes::table
                                .filter(subject_classes::subject_id.eq(subject_uuid)),
                        )
                        .execute(conn)
                        .await?;
                        diesel::insert_into(subject_classes::table)
                            .values(&SubjectClassRow {
                                subject_id: subject_uuid,
                                class_id: class.into_uuid(),
                            })
                            .execute(conn)
                            .await?;
                    }

                    let (teacher_ids, class_ids) = load_links(conn, subject_uuid).await?;
                    Ok::<_, diesel::result::Error>(Some((row, teacher_ids, class_ids)))
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(&code, error))?;

        Ok(result.map(|(row, teacher_ids, class_ids)| {
            assemble_subject(row, teacher_ids, class_ids)
        }))
    }

    async fn delete(&self, id: SubjectId) -> Result<bool, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Link rows cascade via their foreign keys.
        let deleted = diesel::delete(subjects::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error("", error))?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl SubjectDirectory for DieselSubjectRepository {
    async fn subject_names(
        &self,
        ids: Vec<SubjectId>,
    ) -> Result<HashMap<SubjectId, String>, SubjectDirectoryError> {
        let mut conn = self.pool.get().await.map_err(|error| match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                SubjectDirectoryError::connection(message)
            }
        })?;

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<(Uuid, String)> = subjects::table
            .filter(subjects::id.eq_any(uuids))
            .select((subjects::id, subjects::name))
            .load(&mut conn)
            .await
            .map_err(|error| SubjectDirectoryError::query(error.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| (SubjectId::new(id), name))
            .collect())
    }
}
