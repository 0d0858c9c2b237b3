//! Driving port for recording attendance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::attendance::AttendanceStatus;
use crate::domain::ids::{ClassId, StudentId, SubjectId};
use crate::domain::Error;

/// One student's mark inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkEntry {
    /// Student being marked.
    pub student_id: StudentId,
    /// Status to record.
    pub status: AttendanceStatus,
}

/// A validated batch of marks for one class/subject/date/session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkAttendanceRequest {
    /// Day of the session; truncated to UTC midnight by the recorder.
    pub date: DateTime<Utc>,
    /// Class the marks belong to.
    pub class_id: ClassId,
    /// Subject the session covers.
    pub subject_id: SubjectId,
    /// Session label; `None` or blank resolves to the default label.
    pub session: Option<String>,
    /// Per-student marks; must be non-empty.
    pub entries: Vec<MarkEntry>,
}

/// Driving port implemented by the attendance recorder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Upsert every entry of the batch under the composite day key.
    ///
    /// The batch is unordered; success confirms acceptance without
    /// per-record outcomes.
    async fn mark_attendance(&self, request: MarkAttendanceRequest) -> Result<(), Error>;
}
