//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O. The composition root
//! (main) decides which adapters sit behind each port.

use std::sync::Arc;

use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceReports, ClassRepository, StudentRepository,
    SubjectRepository, TeacherRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Attendance write path.
    pub attendance: Arc<dyn AttendanceCommand>,
    /// Day-sheet read path.
    pub attendance_query: Arc<dyn AttendanceQuery>,
    /// Report aggregations.
    pub reports: Arc<dyn AttendanceReports>,
    /// Class CRUD.
    pub classes: Arc<dyn ClassRepository>,
    /// Student CRUD and per-class listings.
    pub students: Arc<dyn StudentRepository>,
    /// Subject CRUD.
    pub subjects: Arc<dyn SubjectRepository>,
    /// Teacher CRUD and relationship links.
    pub teachers: Arc<dyn TeacherRepository>,
}
