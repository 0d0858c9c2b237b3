//! Domain layer: entities, value types, ports, and the attendance services.
//!
//! Everything in here is transport and storage agnostic. The inbound HTTP
//! adapter drives the services through the driving ports; the Diesel
//! adapters implement the driven ports.

pub mod attendance;
pub mod attendance_service;
pub mod entities;
pub mod error;
pub mod ids;
pub mod ports;
pub mod report_service;

pub use self::attendance::{
    date_axis, normalize_session, start_of_day, AttendanceStatus, DayWindow, ReportRange,
    RosterEntry, StatusParseError, DEFAULT_SESSION,
};
pub use self::attendance_service::AttendanceService;
pub use self::entities::{Class, RoleParseError, Student, Subject, Teacher, TeacherRole};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{ClassId, StudentId, SubjectId, TeacherId};
pub use self::report_service::ReportService;
