//! Attendance value types and calendar helpers.
//!
//! Attendance records are keyed at day granularity: the recorded timestamp is
//! truncated to UTC midnight before it participates in the uniqueness key,
//! and queries address whole-day windows so legacy rows written with a
//! non-midnight timestamp still match.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::StudentId;

/// Session label applied when a request does not name one.
pub const DEFAULT_SESSION: &str = "Default";

/// Attendance status of one student for one session.
///
/// The label set is closed: anything else in the store is a data-integrity
/// violation and is read back as [`AttendanceStatus::Absent`] (the repair
/// utility rewrites such rows offline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    /// The student attended the session.
    Present,
    /// The student did not attend, or no mark was recorded.
    Absent,
}

impl AttendanceStatus {
    /// Canonical label stored and serialised for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a status label outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attendance status must be Present or Absent, got {value}")]
pub struct StatusParseError {
    /// The rejected label.
    pub value: String,
}

impl std::str::FromStr for AttendanceStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            other => Err(StatusParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// One enrolled student as reported by the roster provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Student identifier.
    pub student_id: StudentId,
    /// Display name.
    pub name: String,
    /// Roll number, unique across the school.
    pub roll_no: String,
}

/// Inclusive timestamp window covering a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Midnight at the start of the day.
    pub start: DateTime<Utc>,
    /// Last representable millisecond of the day.
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Build the window for the calendar day containing `moment`.
    pub fn containing(moment: DateTime<Utc>) -> Self {
        let start = start_of_day(moment);
        Self {
            start,
            end: start + Duration::days(1) - Duration::milliseconds(1),
        }
    }
}

/// Inclusive date range for report aggregation, normalised to whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    /// Midnight at the start of the first day.
    pub from: DateTime<Utc>,
    /// Last millisecond of the final day.
    pub to: DateTime<Utc>,
}

impl ReportRange {
    /// Normalise an arbitrary `[from, to]` pair onto whole-day bounds.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: start_of_day(from),
            to: DayWindow::containing(to).end,
        }
    }

    /// The dense calendar axis covered by this range, one entry per day.
    pub fn date_axis(&self) -> Vec<NaiveDate> {
        date_axis(self.from.date_naive(), self.to.date_naive())
    }
}

/// Truncate a timestamp to UTC midnight.
pub fn start_of_day(moment: DateTime<Utc>) -> DateTime<Utc> {
    moment.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Resolve the effective session label: trimmed input, or the default when
/// the request omitted it or sent only whitespace.
pub fn normalize_session(session: Option<&str>) -> String {
    match session.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => DEFAULT_SESSION.to_owned(),
    }
}

/// Every calendar day between `from` and `to` inclusive, in order.
///
/// Returns an empty axis when `from` is after `to`. Reports use this so a
/// charted series stays contiguous regardless of how sparse the stored data
/// is.
pub fn date_axis(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = from;
    while current <= to {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}
