//! Diesel persistence adapters implementing the driven ports.

mod diesel_attendance_store;
mod diesel_class_repository;
mod diesel_roster_provider;
mod diesel_student_repository;
mod diesel_subject_repository;
mod diesel_teacher_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_attendance_store::DieselAttendanceStore;
pub use diesel_class_repository::DieselClassRepository;
pub use diesel_roster_provider::DieselRosterProvider;
pub use diesel_student_repository::DieselStudentRepository;
pub use diesel_subject_repository::DieselSubjectRepository;
pub use diesel_teacher_repository::DieselTeacherRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
