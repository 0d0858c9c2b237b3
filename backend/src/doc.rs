//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "School administration API",
        description = "Teachers, classes, subjects, students, and per-session attendance \
                       with reporting aggregations."
    ),
    paths(
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
        crate::inbound::http::attendance::mark_attendance,
        crate::inbound::http::attendance::get_attendance,
        crate::inbound::http::attendance::get_attendance_report,
        crate::inbound::http::attendance::get_attendance_trends,
        crate::inbound::http::attendance::get_daily_attendance_report,
        crate::inbound::http::attendance::debug_attendance,
        crate::inbound::http::attendance::get_student_attendance_report,
        crate::inbound::http::classes::add_class,
        crate::inbound::http::classes::get_classes,
        crate::inbound::http::classes::get_class_by_id,
        crate::inbound::http::classes::update_class,
        crate::inbound::http::classes::delete_class,
        crate::inbound::http::students::add_student,
        crate::inbound::http::students::get_students,
        crate::inbound::http::students::get_student_by_id,
        crate::inbound::http::students::get_students_by_class,
        crate::inbound::http::students::update_student,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::subjects::create_subject,
        crate::inbound::http::subjects::get_all_subjects,
        crate::inbound::http::subjects::get_subject_by_id,
        crate::inbound::http::subjects::update_subject,
        crate::inbound::http::subjects::delete_subject,
        crate::inbound::http::teachers::register_teacher,
        crate::inbound::http::teachers::get_teacher_profile,
        crate::inbound::http::teachers::update_teacher_profile,
        crate::inbound::http::teachers::delete_teacher,
        crate::inbound::http::relationships::add_class_to_teacher,
        crate::inbound::http::relationships::remove_class_from_teacher,
        crate::inbound::http::relationships::add_subject_to_teacher,
        crate::inbound::http::relationships::remove_subject_from_teacher,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::inbound::http::schemas::MessageResponse,
        crate::inbound::http::attendance::MarkAttendanceBody,
        crate::inbound::http::attendance::MarkRecordBody,
        crate::inbound::http::attendance::DaySheetRow,
        crate::inbound::http::attendance::SummaryRow,
        crate::inbound::http::attendance::TrendRow,
        crate::inbound::http::attendance::DailyReportRowBody,
        crate::inbound::http::attendance::DebugRecordBody,
        crate::inbound::http::attendance::SubjectShareBody,
        crate::inbound::http::attendance::StudentReportBody,
        crate::inbound::http::classes::ClassBody,
        crate::inbound::http::classes::ClassPayload,
        crate::inbound::http::classes::ClassEnvelope,
        crate::inbound::http::students::StudentBody,
        crate::inbound::http::students::CreateStudentBody,
        crate::inbound::http::students::UpdateStudentBody,
        crate::inbound::http::subjects::SubjectBody,
        crate::inbound::http::subjects::CreateSubjectBody,
        crate::inbound::http::subjects::UpdateSubjectBody,
        crate::inbound::http::subjects::SubjectEnvelope,
        crate::inbound::http::teachers::TeacherBody,
        crate::inbound::http::teachers::CreateTeacherBody,
        crate::inbound::http::teachers::UpdateTeacherBody,
        crate::inbound::http::relationships::TeacherClassLinkBody,
        crate::inbound::http::relationships::TeacherSubjectLinkBody,
    )),
    tags(
        (name = "attendance", description = "Recording, day sheets, and reports"),
        (name = "classes", description = "Class CRUD"),
        (name = "students", description = "Student CRUD"),
        (name = "subjects", description = "Subject CRUD"),
        (name = "teachers", description = "Teacher CRUD"),
        (name = "admin", description = "Relationship management"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_attendance_surface() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/attendance/mark"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/api/attendance/report/daily"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/api/attendance/student/{studentId}/report"));
    }
}
