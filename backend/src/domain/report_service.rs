//! Report aggregator over the attendance store.
//!
//! Implements the [`AttendanceReports`] driving port. Counting happens in
//! the store as grouped aggregation; this service builds the dense calendar
//! axis, zero-fills gap days, and computes percentages. Percentages are
//! plain `f64`, never rounded here, and a zero denominator always yields
//! `0` rather than an error or NaN.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;

use crate::domain::attendance::AttendanceStatus;
use crate::domain::attendance_service::{map_roster_error, map_store_error};
use crate::domain::ids::{StudentId, SubjectId};
use crate::domain::ports::{
    AttendanceReports, AttendanceStore, ClassReportRequest, DailyReportRow, RecordFilter,
    RosterProvider, StoredAttendance, StudentReport, StudentSummary, SubjectDirectory,
    SubjectDirectoryError, SubjectShare, TrendPoint,
};
use crate::domain::Error;

/// Bucket label for records whose subject reference cannot be resolved.
const UNKNOWN_SUBJECT: &str = "Unknown";

/// Report aggregator over a roster provider, an attendance store, and the
/// subject directory.
#[derive(Clone)]
pub struct ReportService<R, S, D> {
    roster: Arc<R>,
    store: Arc<S>,
    subjects: Arc<D>,
}

impl<R, S, D> ReportService<R, S, D> {
    /// Create a new service with the given collaborators.
    pub fn new(roster: Arc<R>, store: Arc<S>, subjects: Arc<D>) -> Self {
        Self {
            roster,
            store,
            subjects,
        }
    }
}

fn map_directory_error(error: SubjectDirectoryError) -> Error {
    Error::internal(format!("subject directory failed: {error}"))
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[async_trait]
impl<R, S, D> AttendanceReports for ReportService<R, S, D>
where
    R: RosterProvider,
    S: AttendanceStore,
    D: SubjectDirectory,
{
    async fn class_summary(
        &self,
        request: ClassReportRequest,
    ) -> Result<Vec<StudentSummary>, Error> {
        let roster = self
            .roster
            .roster_for_class(request.class_id)
            .await
            .map_err(map_roster_error)?;
        if roster.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<StudentId> = roster.iter().map(|entry| entry.student_id).collect();
        let tallies = self
            .store
            .per_student_tallies(student_ids, request.range, request.subject_id)
            .await
            .map_err(map_store_error)?;
        let by_student: HashMap<_, _> = tallies
            .into_iter()
            .map(|tally| (tally.student_id, (tally.present, tally.total)))
            .collect();

        Ok(roster
            .into_iter()
            .map(|entry| {
                let (present, total) = by_student
                    .get(&entry.student_id)
                    .copied()
                    .unwrap_or((0, 0));
                StudentSummary {
                    student_id: entry.student_id,
                    name: entry.name,
                    present,
                    total,
                    percentage: percentage(present, total),
                }
            })
            .collect())
    }

    async fn daily_trends(
        &self,
        request: ClassReportRequest,
    ) -> Result<Vec<TrendPoint>, Error> {
        let roster = self
            .roster
            .roster_for_class(request.class_id)
            .await
            .map_err(map_roster_error)?;
        let total = roster.len() as i64;

        let counts = if roster.is_empty() {
            Vec::new()
        } else {
            let student_ids = roster.iter().map(|entry| entry.student_id).collect();
            self.store
                .daily_present_counts(student_ids, request.range, request.subject_id)
                .await
                .map_err(map_store_error)?
        };
        let by_day: HashMap<_, _> = counts
            .into_iter()
            .map(|count| (count.day, count.present))
            .collect();

        Ok(request
            .range
            .date_axis()
            .into_iter()
            .map(|day| TrendPoint {
                day,
                present_count: by_day.get(&day).copied().unwrap_or(0),
                total,
            })
            .collect())
    }

    async fn daily_report(
        &self,
        request: ClassReportRequest,
    ) -> Result<Vec<DailyReportRow>, Error> {
        let roster = self
            .roster
            .roster_for_class(request.class_id)
            .await
            .map_err(map_roster_error)?;
        let class_strength = roster.len() as i64;

        let tallies = if roster.is_empty() {
            Vec::new()
        } else {
            let student_ids = roster.iter().map(|entry| entry.student_id).collect();
            self.store
                .daily_marked_tallies(student_ids, request.range, request.subject_id)
                .await
                .map_err(map_store_error)?
        };
        let by_day: HashMap<_, _> = tallies
            .into_iter()
            .map(|tally| (tally.day, (tally.present, tally.marked)))
            .collect();

        Ok(request
            .range
            .date_axis()
            .into_iter()
            .map(|day| {
                let (present_count, total_marked) =
                    by_day.get(&day).copied().unwrap_or((0, 0));
                DailyReportRow {
                    day,
                    day_of_month: day.day(),
                    present_count,
                    total_marked,
                    class_strength,
                    // Normalised against records actually taken, not roster
                    // size; attendance-taking may be incomplete for a day.
                    percentage: percentage(present_count, total_marked),
                }
            })
            .collect())
    }

    async fn debug_dump(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<StoredAttendance>, Error> {
        self.store
            .find_filtered(filter)
            .await
            .map_err(map_store_error)
    }

    async fn student_report(&self, student_id: StudentId) -> Result<StudentReport, Error> {
        let records = self
            .store
            .find_for_student(student_id)
            .await
            .map_err(map_store_error)?;

        let total = records.len() as i64;
        let present = records
            .iter()
            .filter(|record| record.status == AttendanceStatus::Present)
            .count() as i64;

        let mut subject_ids: Vec<SubjectId> =
            records.iter().map(|record| record.subject_id).collect();
        subject_ids.sort_unstable();
        subject_ids.dedup();

        let names = if subject_ids.is_empty() {
            HashMap::new()
        } else {
            self.subjects
                .subject_names(subject_ids)
                .await
                .map_err(map_directory_error)?
        };

        let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for record in &records {
            let name = names
                .get(&record.subject_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_SUBJECT.to_owned());
            let bucket = buckets.entry(name).or_insert((0, 0));
            bucket.1 += 1;
            if record.status == AttendanceStatus::Present {
                bucket.0 += 1;
            }
        }

        Ok(StudentReport {
            overall: percentage(present, total),
            by_subject: buckets
                .into_iter()
                .map(|(name, (subject_present, subject_total))| SubjectShare {
                    name,
                    present: subject_present,
                    total: subject_total,
                    percentage: percentage(subject_present, subject_total),
                })
                .collect(),
        })
    }
}
