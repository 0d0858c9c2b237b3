//! Port for the persistent attendance record store.
//!
//! The store owns the composite uniqueness key
//! `(class, student, subject, day, session)` and the grouped aggregations
//! the reports are built from; services never scan rows to count.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::attendance::{AttendanceStatus, DayWindow, ReportRange};
use crate::domain::ids::{ClassId, StudentId, SubjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance store adapters.
    pub enum AttendanceStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "attendance store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "attendance query failed: {message}",
        /// One or more writes in a batch failed after every entry was
        /// attempted.
        Write { message: String } =>
            "attendance write failed: {message}",
    }
}

/// One idempotent write keyed by the composite attendance key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceUpsert {
    /// Class the record is denormalised onto.
    pub class_id: ClassId,
    /// Student being marked.
    pub student_id: StudentId,
    /// Subject the session belongs to.
    pub subject_id: SubjectId,
    /// Day of the session, truncated to UTC midnight.
    pub recorded_on: DateTime<Utc>,
    /// Session label distinguishing repeat sittings on one day.
    pub session: String,
    /// Status to write; overwrites any previous status for the same key.
    pub status: AttendanceStatus,
}

/// A stored attendance record as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttendance {
    /// Row identifier.
    pub id: uuid::Uuid,
    /// Denormalised class reference.
    pub class_id: ClassId,
    /// Student the record belongs to.
    pub student_id: StudentId,
    /// Subject the session belongs to.
    pub subject_id: SubjectId,
    /// Day of the session.
    pub recorded_on: DateTime<Utc>,
    /// Session label.
    pub session: String,
    /// Recorded status. Adapters map out-of-enum stored labels to
    /// [`AttendanceStatus::Absent`] and log the repair.
    pub status: AttendanceStatus,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Row update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Optional filters for the raw record dump.
///
/// Every field may be absent; a lone `from` or `to` degrades the date filter
/// to an open-ended bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Restrict to one class.
    pub class_id: Option<ClassId>,
    /// Restrict to one subject.
    pub subject_id: Option<SubjectId>,
    /// Lower timestamp bound, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Upper timestamp bound, inclusive.
    pub to: Option<DateTime<Utc>>,
}

/// Present/total tally for one student over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentTally {
    /// Student the tally belongs to.
    pub student_id: StudentId,
    /// Number of `Present` records.
    pub present: i64,
    /// Number of records of any status.
    pub total: i64,
}

/// Per-day count of `Present` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    /// Calendar day the bucket covers.
    pub day: NaiveDate,
    /// Number of `Present` records on that day.
    pub present: i64,
}

/// Per-day tally of all marked records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTally {
    /// Calendar day the bucket covers.
    pub day: NaiveDate,
    /// Number of `Present` records on that day.
    pub present: i64,
    /// Number of records of any status actually taken on that day.
    pub marked: i64,
}

/// Port for attendance record storage, lookups, and grouped aggregation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Apply a batch of upserts as an unordered set.
    ///
    /// Every entry must be attempted even when an earlier one fails; the
    /// first failure is reported after the batch completes. Partial
    /// application is acceptable.
    async fn upsert_batch(
        &self,
        records: Vec<AttendanceUpsert>,
    ) -> Result<(), AttendanceStoreError>;

    /// Records for the given students inside one day window, optionally
    /// restricted to a subject.
    async fn find_for_students_in_window(
        &self,
        student_ids: Vec<StudentId>,
        window: DayWindow,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError>;

    /// Present/total tallies grouped by student over a range.
    ///
    /// Students without records in range are omitted; callers zero-fill from
    /// the roster.
    async fn per_student_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StudentTally>, AttendanceStoreError>;

    /// `Present` record counts grouped by calendar day over a range.
    ///
    /// Days without matches are omitted; callers zero-fill along the dense
    /// date axis.
    async fn daily_present_counts(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayCount>, AttendanceStoreError>;

    /// Present and total-marked counts grouped by calendar day over a range.
    async fn daily_marked_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayTally>, AttendanceStoreError>;

    /// Raw records matching an arbitrary subset of filters.
    async fn find_filtered(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError>;

    /// Every record ever stored for one student, across all classes and
    /// subjects.
    async fn find_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError>;
}
