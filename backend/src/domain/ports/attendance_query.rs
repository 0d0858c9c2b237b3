//! Driving port for the day attendance sheet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::attendance::AttendanceStatus;
use crate::domain::ids::{ClassId, StudentId, SubjectId};
use crate::domain::Error;

/// Query for one class's sheet on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySheetRequest {
    /// Any moment inside the requested day.
    pub date: DateTime<Utc>,
    /// Class whose roster anchors the sheet.
    pub class_id: ClassId,
    /// Optional subject restriction.
    pub subject_id: Option<SubjectId>,
}

/// One roster student with their resolved status for the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySheetEntry {
    /// Student identifier.
    pub student_id: StudentId,
    /// Display name.
    pub name: String,
    /// Roll number.
    pub roll_no: String,
    /// Recorded status, or `Absent` when no record exists for the day.
    pub status: AttendanceStatus,
}

/// Driving port implemented by the attendance query engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// The full sheet for a class on a day: exactly one entry per enrolled
    /// student, in roster order, defaulting unmarked students to `Absent`.
    async fn attendance_for_day(
        &self,
        request: DaySheetRequest,
    ) -> Result<Vec<DaySheetEntry>, Error>;
}
