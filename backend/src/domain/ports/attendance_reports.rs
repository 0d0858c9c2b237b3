//! Driving port for the attendance report aggregations.
//!
//! Two day-bucketed reports deliberately normalise differently: the trend
//! report divides nothing (it pairs present counts with the roster size),
//! while the daily report divides present counts by the records actually
//! taken that day. Both are kept; see DESIGN.md.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::attendance::ReportRange;
use crate::domain::ids::{ClassId, StudentId, SubjectId};
use crate::domain::Error;

use super::attendance_store::{RecordFilter, StoredAttendance};

/// Scope shared by the class-wide reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassReportRequest {
    /// Class whose roster anchors the report.
    pub class_id: ClassId,
    /// Optional subject restriction.
    pub subject_id: Option<SubjectId>,
    /// Inclusive day range.
    pub range: ReportRange,
}

/// Per-student summary row.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    /// Student identifier.
    pub student_id: StudentId,
    /// Display name.
    pub name: String,
    /// Number of `Present` records in range.
    pub present: i64,
    /// Number of records of any status in range.
    pub total: i64,
    /// `present / total × 100`, `0` when no records exist.
    pub percentage: f64,
}

/// One day of the present-count trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    /// Calendar day.
    pub day: NaiveDate,
    /// `Present` records on that day (zero-filled on gap days).
    pub present_count: i64,
    /// Roster size, constant across the series.
    pub total: i64,
}

/// One day of the daily percentage report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReportRow {
    /// Calendar day.
    pub day: NaiveDate,
    /// Day of month, a charting convenience.
    pub day_of_month: u32,
    /// `Present` records on that day.
    pub present_count: i64,
    /// Records of any status actually taken that day.
    pub total_marked: i64,
    /// Roster size, constant across the series.
    pub class_strength: i64,
    /// `present_count / total_marked × 100`, `0` when nothing was taken.
    pub percentage: f64,
}

/// Per-subject bucket of the student report.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectShare {
    /// Resolved subject name, or `"Unknown"`.
    pub name: String,
    /// `Present` records for that subject.
    pub present: i64,
    /// All records for that subject.
    pub total: i64,
    /// `present / total × 100`.
    pub percentage: f64,
}

/// A student's attendance across all their records.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    /// Overall percentage across every record.
    pub overall: f64,
    /// Per-subject breakdown, ordered by subject name.
    pub by_subject: Vec<SubjectShare>,
}

/// Driving port implemented by the report aggregator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceReports: Send + Sync {
    /// Present/total/percentage per roster student over the range.
    async fn class_summary(
        &self,
        request: ClassReportRequest,
    ) -> Result<Vec<StudentSummary>, Error>;

    /// Dense daily series of present counts paired with the roster size.
    async fn daily_trends(&self, request: ClassReportRequest)
        -> Result<Vec<TrendPoint>, Error>;

    /// Dense daily series normalised against records actually taken.
    async fn daily_report(
        &self,
        request: ClassReportRequest,
    ) -> Result<Vec<DailyReportRow>, Error>;

    /// Raw stored records for operational inspection.
    async fn debug_dump(&self, filter: RecordFilter)
        -> Result<Vec<StoredAttendance>, Error>;

    /// One student's overall and per-subject percentages across all their
    /// records.
    async fn student_report(&self, student_id: StudentId) -> Result<StudentReport, Error>;
}
