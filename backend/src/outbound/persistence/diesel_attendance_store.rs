//! PostgreSQL-backed [`AttendanceStore`] implementation using Diesel.
//!
//! Writes go through `INSERT ... ON CONFLICT DO UPDATE` against the
//! composite unique index, so a colliding key overwrites the stored status
//! instead of creating a duplicate. Aggregations run as `GROUP BY` queries;
//! day buckets group on `date(recorded_on)` so legacy rows written off
//! midnight still land in the right bucket.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::attendance::{AttendanceStatus, DayWindow, ReportRange};
use crate::domain::ids::{ClassId, StudentId, SubjectId};
use crate::domain::ports::{
    AttendanceStore, AttendanceStoreError, AttendanceUpsert, DayCount, DayTally, RecordFilter,
    StoredAttendance, StudentTally,
};

use super::models::{AttendanceRow, NewAttendanceRow};
use super::pool::{DbPool, PoolError};
use super::schema::attendance_records;

diesel::define_sql_function! {
    /// Day bucket for a `timestamptz` column. Evaluates under the session
    /// time zone, which the deployment keeps at UTC.
    #[sql_name = "date"]
    fn record_day(ts: diesel::sql_types::Timestamptz) -> diesel::sql_types::Date;
}

// Teach Diesel that grouping on `date(recorded_on)` covers the `recorded_on`
// column, so selecting the same day bucket is a valid grouping. This mirrors
// what `allow_columns_to_appear_in_same_group_by_clause!` emits between two
// columns; it affects only compile-time grouping validation, not the SQL.
impl diesel::expression::IsContainedInGroupBy<attendance_records::recorded_on>
    for record_day<attendance_records::recorded_on>
{
    type Output = diesel::expression::is_contained_in_group_by::Yes;
}

/// Diesel-backed implementation of the [`AttendanceStore`] port.
#[derive(Clone)]
pub struct DieselAttendanceStore {
    pool: DbPool,
}

impl DieselAttendanceStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AttendanceStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AttendanceStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AttendanceStoreError {
    debug!(error = %error, "attendance store operation failed");
    AttendanceStoreError::query(error.to_string())
}

/// Read a stored status label, repairing out-of-enum values to `Absent`.
fn parse_stored_status(record_id: Uuid, label: &str) -> AttendanceStatus {
    label.parse().unwrap_or_else(|_| {
        warn!(
            record = %record_id,
            status = label,
            "stored status outside the enum, reading as Absent"
        );
        AttendanceStatus::Absent
    })
}

fn row_to_stored(row: AttendanceRow) -> StoredAttendance {
    StoredAttendance {
        id: row.id,
        class_id: ClassId::new(row.class_id),
        student_id: StudentId::new(row.student_id),
        subject_id: SubjectId::new(row.subject_id),
        recorded_on: row.recorded_on,
        session: row.session,
        status: parse_stored_status(row.id, &row.status),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn student_uuids(student_ids: &[StudentId]) -> Vec<Uuid> {
    student_ids.iter().map(|id| *id.as_uuid()).collect()
}

async fn grouped_by_student(
    conn: &mut AsyncPgConnection,
    students: &[Uuid],
    range: ReportRange,
    subject_id: Option<SubjectId>,
    present_only: bool,
) -> Result<Vec<(Uuid, i64)>, diesel::result::Error> {
    let mut query = attendance_records::table
        .group_by(attendance_records::student_id)
        .select((attendance_records::student_id, count_star()))
        .filter(attendance_records::student_id.eq_any(students.to_vec()))
        .filter(attendance_records::recorded_on.ge(range.from))
        .filter(attendance_records::recorded_on.le(range.to))
        .into_boxed();
    if let Some(subject) = subject_id {
        query = query.filter(attendance_records::subject_id.eq(*subject.as_uuid()));
    }
    if present_only {
        query =
            query.filter(attendance_records::status.eq(AttendanceStatus::Present.as_str()));
    }
    query.load(conn).await
}

async fn grouped_by_day(
    conn: &mut AsyncPgConnection,
    students: &[Uuid],
    range: ReportRange,
    subject_id: Option<SubjectId>,
    present_only: bool,
) -> Result<Vec<(NaiveDate, i64)>, diesel::result::Error> {
    let mut query = attendance_records::table
        .group_by(record_day(attendance_records::recorded_on))
        .select((record_day(attendance_records::recorded_on), count_star()))
        .filter(attendance_records::student_id.eq_any(students.to_vec()))
        .filter(attendance_records::recorded_on.ge(range.from))
        .filter(attendance_records::recorded_on.le(range.to))
        .into_boxed();
    if let Some(subject) = subject_id {
        query = query.filter(attendance_records::subject_id.eq(*subject.as_uuid()));
    }
    if present_only {
        query =
            query.filter(attendance_records::status.eq(AttendanceStatus::Present.as_str()));
    }
    query.load(conn).await
}

#[async_trait]
impl AttendanceStore for DieselAttendanceStore {
    async fn upsert_batch(
        &self,
        records: Vec<AttendanceUpsert>,
    ) -> Result<(), AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Unordered batch: every upsert is attempted, the first failure is
        // reported after the batch completes.
        let total = records.len();
        let mut failed = 0_usize;
        let mut first_error: Option<diesel::result::Error> = None;
        for record in records {
            let row = NewAttendanceRow {
                id: Uuid::new_v4(),
                class_id: record.class_id.into_uuid(),
                student_id: record.student_id.into_uuid(),
                subject_id: record.subject_id.into_uuid(),
                recorded_on: record.recorded_on,
                session: record.session,
                status: record.status.as_str().to_owned(),
            };
            let result = diesel::insert_into(attendance_records::table)
                .values(&row)
                .on_conflict((
                    attendance_records::class_id,
                    attendance_records::student_id,
                    attendance_records::subject_id,
                    attendance_records::recorded_on,
                    attendance_records::session,
                ))
                .do_update()
                .set((
                    attendance_records::status.eq(excluded(attendance_records::status)),
                    attendance_records::updated_at.eq(diesel::dsl::now),
                ))
                .execute(&mut conn)
                .await;
            if let Err(error) = result {
                debug!(error = %error, "attendance upsert failed");
                failed += 1;
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            None => Ok(()),
            Some(error) => Err(AttendanceStoreError::write(format!(
                "{failed} of {total} upserts failed: {error}"
            ))),
        }
    }

    async fn find_for_students_in_window(
        &self,
        student_ids: Vec<StudentId>,
        window: DayWindow,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = attendance_records::table
            .select(AttendanceRow::as_select())
            .filter(attendance_records::student_id.eq_any(student_uuids(&student_ids)))
            .filter(attendance_records::recorded_on.ge(window.start))
            .filter(attendance_records::recorded_on.le(window.end))
            .order_by(attendance_records::updated_at)
            .into_boxed();
        if let Some(subject) = subject_id {
            query = query.filter(attendance_records::subject_id.eq(*subject.as_uuid()));
        }

        let rows: Vec<AttendanceRow> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_stored).collect())
    }

    async fn per_student_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StudentTally>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let students = student_uuids(&student_ids);

        // Run both grouped counts in one transaction so they observe the
        // same snapshot.
        let (totals, presents) = conn
            .transaction(|conn| {
                async move {
                    let totals =
                        grouped_by_student(conn, &students, range, subject_id, false).await?;
                    let presents =
                        grouped_by_student(conn, &students, range, subject_id, true).await?;
                    Ok::<_, diesel::result::Error>((totals, presents))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let presents: std::collections::HashMap<Uuid, i64> = presents.into_iter().collect();
        Ok(totals
            .into_iter()
            .map(|(student, total)| StudentTally {
                student_id: StudentId::new(student),
                present: presents.get(&student).copied().unwrap_or(0),
                total,
            })
            .collect())
    }

    async fn daily_present_counts(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayCount>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let students = student_uuids(&student_ids);

        let rows = grouped_by_day(&mut conn, &students, range, subject_id, true)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(day, present)| DayCount { day, present })
            .collect())
    }

    async fn daily_marked_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayTally>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let students = student_uuids(&student_ids);

        let (marked, presents) = conn
            .transaction(|conn| {
                async move {
                    let marked =
                        grouped_by_day(conn, &students, range, subject_id, false).await?;
                    let presents =
                        grouped_by_day(conn, &students, range, subject_id, true).await?;
                    Ok::<_, diesel::result::Error>((marked, presents))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let presents: std::collections::HashMap<NaiveDate, i64> =
            presents.into_iter().collect();
        Ok(marked
            .into_iter()
            .map(|(day, total)| DayTally {
                day,
                present: presents.get(&day).copied().unwrap_or(0),
                marked: total,
            })
            .collect())
    }

    async fn find_filtered(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = attendance_records::table
            .select(AttendanceRow::as_select())
            .order_by(attendance_records::recorded_on)
            .into_boxed();
        if let Some(class) = filter.class_id {
            query = query.filter(attendance_records::class_id.eq(*class.as_uuid()));
        }
        if let Some(subject) = filter.subject_id {
            query = query.filter(attendance_records::subject_id.eq(*subject.as_uuid()));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendance_records::recorded_on.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendance_records::recorded_on.le(to));
        }

        let rows: Vec<AttendanceRow> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_stored).collect())
    }

    async fn find_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AttendanceRow> = attendance_records::table
            .select(AttendanceRow::as_select())
            .filter(attendance_records::student_id.eq(*student_id.as_uuid()))
            .order_by(attendance_records::recorded_on)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_stored).collect())
    }
}
