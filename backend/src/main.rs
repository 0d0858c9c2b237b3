//! Backend entry-point: wires REST endpoints, persistence adapters, and
//! OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::domain::{AttendanceService, ReportService};
use backend::inbound::http::attendance::{
    debug_attendance, get_attendance, get_attendance_report, get_attendance_trends,
    get_daily_attendance_report, get_student_attendance_report, mark_attendance,
};
use backend::inbound::http::classes::{
    add_class, delete_class, get_class_by_id, get_classes, update_class,
};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::relationships::{
    add_class_to_teacher, add_subject_to_teacher, remove_class_from_teacher,
    remove_subject_from_teacher,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::students::{
    add_student, delete_student, get_student_by_id, get_students, get_students_by_class,
    update_student,
};
use backend::inbound::http::subjects::{
    create_subject, delete_subject, get_all_subjects, get_subject_by_id, update_subject,
};
use backend::inbound::http::teachers::{
    delete_teacher, get_teacher_profile, register_teacher, update_teacher_profile,
};
use backend::outbound::persistence::{
    DbPool, DieselAttendanceStore, DieselClassRepository, DieselRosterProvider,
    DieselStudentRepository, DieselSubjectRepository, DieselTeacherRepository, PoolConfig,
};
use backend::RequestId;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let pool_max = env::var("DB_POOL_MAX")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10);

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(pool_max))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = web::Data::new(build_http_state(&pool));
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api")
            .service(mark_attendance)
            .service(get_attendance)
            .service(get_attendance_report)
            .service(get_attendance_trends)
            .service(get_daily_attendance_report)
            .service(debug_attendance)
            .service(get_student_attendance_report)
            .service(add_class)
            .service(get_classes)
            .service(get_class_by_id)
            .service(update_class)
            .service(delete_class)
            .service(add_student)
            .service(get_students)
            .service(get_student_by_id)
            .service(get_students_by_class)
            .service(update_student)
            .service(delete_student)
            .service(create_subject)
            .service(get_all_subjects)
            .service(get_subject_by_id)
            .service(update_subject)
            .service(delete_subject)
            .service(register_teacher)
            .service(get_teacher_profile)
            .service(update_teacher_profile)
            .service(delete_teacher)
            .service(add_class_to_teacher)
            .service(remove_class_from_teacher)
            .service(add_subject_to_teacher)
            .service(remove_subject_from_teacher);

        let mut app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(RequestId)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Build the handler state on top of the Diesel adapters.
fn build_http_state(pool: &DbPool) -> HttpState {
    let roster = Arc::new(DieselRosterProvider::new(pool.clone()));
    let store = Arc::new(DieselAttendanceStore::new(pool.clone()));
    let subjects = Arc::new(DieselSubjectRepository::new(pool.clone()));

    let attendance = Arc::new(AttendanceService::new(
        Arc::clone(&roster),
        Arc::clone(&store),
    ));
    let reports = Arc::new(ReportService::new(roster, store, Arc::clone(&subjects)));

    HttpState {
        attendance: attendance.clone(),
        attendance_query: attendance,
        reports,
        classes: Arc::new(DieselClassRepository::new(pool.clone())),
        students: Arc::new(DieselStudentRepository::new(pool.clone())),
        subjects,
        teachers: Arc::new(DieselTeacherRepository::new(pool.clone())),
    }
}
