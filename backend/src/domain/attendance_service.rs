//! Attendance recorder and day-sheet query engine.
//!
//! Implements the [`AttendanceCommand`] and [`AttendanceQuery`] driving
//! ports on top of the roster provider and the attendance store. All
//! consistency is delegated to the store's composite uniqueness key; the
//! service only normalises input and joins rosters against records.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::attendance::{normalize_session, start_of_day, AttendanceStatus, DayWindow};
use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceStore, AttendanceStoreError, AttendanceUpsert,
    DaySheetEntry, DaySheetRequest, MarkAttendanceRequest, RosterProvider, RosterProviderError,
};
use crate::domain::Error;

/// Recorder and query engine over a roster provider and an attendance store.
#[derive(Clone)]
pub struct AttendanceService<R, S> {
    roster: Arc<R>,
    store: Arc<S>,
}

impl<R, S> AttendanceService<R, S> {
    /// Create a new service with the given collaborators.
    pub fn new(roster: Arc<R>, store: Arc<S>) -> Self {
        Self { roster, store }
    }
}

pub(crate) fn map_roster_error(error: RosterProviderError) -> Error {
    Error::internal(format!("roster provider failed: {error}"))
}

pub(crate) fn map_store_error(error: AttendanceStoreError) -> Error {
    Error::internal(format!("attendance store failed: {error}"))
}

#[async_trait]
impl<R, S> AttendanceCommand for AttendanceService<R, S>
where
    R: RosterProvider,
    S: AttendanceStore,
{
    async fn mark_attendance(&self, request: MarkAttendanceRequest) -> Result<(), Error> {
        if request.entries.is_empty() {
            return Err(Error::invalid_request("records must not be empty"));
        }

        let recorded_on = start_of_day(request.date);
        let session = normalize_session(request.session.as_deref());

        let upserts: Vec<AttendanceUpsert> = request
            .entries
            .iter()
            .map(|entry| AttendanceUpsert {
                class_id: request.class_id,
                student_id: entry.student_id,
                subject_id: request.subject_id,
                recorded_on,
                session: session.clone(),
                status: entry.status,
            })
            .collect();

        self.store
            .upsert_batch(upserts)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl<R, S> AttendanceQuery for AttendanceService<R, S>
where
    R: RosterProvider,
    S: AttendanceStore,
{
    async fn attendance_for_day(
        &self,
        request: DaySheetRequest,
    ) -> Result<Vec<DaySheetEntry>, Error> {
        let roster = self
            .roster
            .roster_for_class(request.class_id)
            .await
            .map_err(map_roster_error)?;
        if roster.is_empty() {
            return Ok(Vec::new());
        }

        let window = DayWindow::containing(request.date);
        let student_ids = roster.iter().map(|entry| entry.student_id).collect();
        let records = self
            .store
            .find_for_students_in_window(student_ids, window, request.subject_id)
            .await
            .map_err(map_store_error)?;

        // Last write wins when several sessions match; no session tie-break
        // is defined.
        let mut statuses: HashMap<_, _> = HashMap::with_capacity(records.len());
        for record in records {
            statuses.insert(record.student_id, record.status);
        }

        Ok(roster
            .into_iter()
            .map(|entry| DaySheetEntry {
                status: statuses
                    .get(&entry.student_id)
                    .copied()
                    .unwrap_or(AttendanceStatus::Absent),
                student_id: entry.student_id,
                name: entry.name,
                roll_no: entry.roll_no,
            })
            .collect())
    }
}
