//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_command;
mod attendance_query;
mod attendance_reports;
mod attendance_store;
mod class_repository;
mod roster_provider;
mod student_repository;
mod subject_directory;
mod subject_repository;
mod teacher_repository;

#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{AttendanceCommand, MarkAttendanceRequest, MarkEntry};
#[cfg(test)]
pub use attendance_query::MockAttendanceQuery;
pub use attendance_query::{AttendanceQuery, DaySheetEntry, DaySheetRequest};
#[cfg(test)]
pub use attendance_reports::MockAttendanceReports;
pub use attendance_reports::{
    AttendanceReports, ClassReportRequest, DailyReportRow, StudentReport, StudentSummary,
    SubjectShare, TrendPoint,
};
#[cfg(test)]
pub use attendance_store::MockAttendanceStore;
pub use attendance_store::{
    AttendanceStore, AttendanceStoreError, AttendanceUpsert, DayCount, DayTally, RecordFilter,
    StoredAttendance, StudentTally,
};
#[cfg(test)]
pub use class_repository::MockClassRepository;
pub use class_repository::{ClassRepository, ClassRepositoryError, NewClass};
#[cfg(test)]
pub use roster_provider::MockRosterProvider;
pub use roster_provider::{RosterProvider, RosterProviderError};
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{
    NewStudent, StudentRepository, StudentRepositoryError, StudentUpdate,
};
#[cfg(test)]
pub use subject_directory::MockSubjectDirectory;
pub use subject_directory::{SubjectDirectory, SubjectDirectoryError};
#[cfg(test)]
pub use subject_repository::MockSubjectRepository;
pub use subject_repository::{
    NewSubject, SubjectRepository, SubjectRepositoryError, SubjectUpdate,
};
#[cfg(test)]
pub use teacher_repository::MockTeacherRepository;
pub use teacher_repository::{
    NewTeacher, TeacherRepository, TeacherRepositoryError, TeacherUpdate,
};
