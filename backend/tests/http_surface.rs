//! HTTP surface tests: routing, validation, and JSON shapes over the full
//! actix app with in-memory adapters behind every port.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use backend::domain::{AttendanceService, ReportService};
use backend::inbound::http::attendance::{
    debug_attendance, get_attendance, get_attendance_report, get_attendance_trends,
    get_daily_attendance_report, get_student_attendance_report, mark_attendance,
};
use backend::inbound::http::classes::{
    add_class, delete_class, get_class_by_id, get_classes, update_class,
};
use backend::inbound::http::relationships::{add_class_to_teacher, remove_class_from_teacher};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::students::{add_student, get_students_by_class};
use backend::inbound::http::teachers::register_teacher;
use backend::RequestId;

mod support;

use support::{
    roster_entry, FixedRoster, FixedSubjectDirectory, InMemoryAttendanceStore,
    InMemoryClassRepository, InMemoryStudentRepository, InMemorySubjectRepository,
    InMemoryTeacherRepository,
};

use backend::domain::StudentId;

const CLASS: &str = "11111111-1111-1111-1111-111111111111";
const SUBJECT: &str = "22222222-2222-2222-2222-222222222222";
const S1: &str = "33333333-3333-3333-3333-333333333333";
const S2: &str = "44444444-4444-4444-4444-444444444444";

fn test_state() -> HttpState {
    let s1 = StudentId::new(S1.parse().expect("valid uuid"));
    let s2 = StudentId::new(S2.parse().expect("valid uuid"));
    let roster = Arc::new(FixedRoster::new(vec![
        roster_entry(s1, "Asha", "R-01"),
        roster_entry(s2, "Benoit", "R-02"),
    ]));
    let store = Arc::new(InMemoryAttendanceStore::new());
    let directory = Arc::new(FixedSubjectDirectory::empty());
    let attendance = Arc::new(AttendanceService::new(
        Arc::clone(&roster),
        Arc::clone(&store),
    ));
    let reports = Arc::new(ReportService::new(roster, store, directory));

    HttpState {
        attendance: attendance.clone(),
        attendance_query: attendance,
        reports,
        classes: Arc::new(InMemoryClassRepository::new()),
        students: Arc::new(InMemoryStudentRepository::new()),
        subjects: Arc::new(InMemorySubjectRepository::new()),
        teachers: Arc::new(InMemoryTeacherRepository::new()),
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(RequestId)
                .service(
                    web::scope("/api")
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
                        .service(get_students_by_class)
                        .service(register_teacher)
                        .service(add_class_to_teacher)
                        .service(remove_class_from_teacher),
                ),
        )
        .await
    };
}

fn mark_body() -> Value {
    json!({
        "date": "2024-02-01",
        "subjectId": SUBJECT,
        "classId": CLASS,
        "records": [
            { "studentId": S1, "status": "Present" }
        ]
    })
}

#[actix_rt::test]
async fn mark_then_day_sheet_round_trips_in_roster_order() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/mark")
            .set_json(mark_body())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Attendance marked successfully");

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance?date=2024-02-01&classId={CLASS}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let sheet: Value = test::read_body_json(response).await;
    assert_eq!(
        sheet,
        json!([
            { "studentId": S1, "name": "Asha", "rollNo": "R-01", "status": "Present" },
            { "studentId": S2, "name": "Benoit", "rollNo": "R-02", "status": "Absent" }
        ])
    );
}

#[actix_rt::test]
async fn day_sheet_requires_date_and_class() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/attendance?date=2024-02-01")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "classId");
}

#[actix_rt::test]
async fn mark_rejects_malformed_ids_before_any_write() {
    let app = test_app!(test_state());

    let mut body = mark_body();
    body["classId"] = json!("not-an-id");
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/mark")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/attendance/debug")
            .to_request(),
    )
    .await;
    let records: Value = test::read_body_json(response).await;
    assert_eq!(records, json!([]));
}

#[actix_rt::test]
async fn reports_stay_dense_and_camel_cased() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/mark")
            .set_json(mark_body())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/attendance/trends?classId={CLASS}&from=2024-01-29&to=2024-02-02"
            ))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let trend: Value = test::read_body_json(response).await;
    let days = trend.as_array().expect("array body");
    assert_eq!(days.len(), 5);
    assert_eq!(days[3]["date"], "2024-02-01");
    assert_eq!(days[3]["presentCount"], 1);
    assert_eq!(days[3]["total"], 2);
    assert_eq!(days[0]["presentCount"], 0);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/attendance/report/daily?classId={CLASS}&from=2024-01-29&to=2024-02-02"
            ))
            .to_request(),
    )
    .await;
    let daily: Value = test::read_body_json(response).await;
    let rows = daily.as_array().expect("array body");
    assert_eq!(rows.len(), 5);
    // Only one student was marked: percentage normalises against records
    // taken, not roster size.
    assert_eq!(rows[3]["presentCount"], 1);
    assert_eq!(rows[3]["classStrength"], 2);
    assert_eq!(rows[3]["percentage"], 100.0);
    assert_eq!(rows[3]["day"], 1);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/attendance/report?classId={CLASS}&from=2024-01-29&to=2024-02-02"
            ))
            .to_request(),
    )
    .await;
    let summary: Value = test::read_body_json(response).await;
    assert_eq!(
        summary,
        json!([
            { "name": "Asha", "present": 1, "total": 1, "percentage": 100.0 },
            { "name": "Benoit", "present": 0, "total": 0, "percentage": 0.0 }
        ])
    );
}

#[actix_rt::test]
async fn student_report_shape_matches_the_contract() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/mark")
            .set_json(mark_body())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/student/{S1}/report"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = test::read_body_json(response).await;
    assert_eq!(report["overall"], 100.0);
    // The fixture directory resolves nothing, so the bucket is Unknown.
    assert_eq!(report["bySubject"], json!([{ "name": "Unknown", "percentage": 100.0 }]));
}

#[actix_rt::test]
async fn class_crud_round_trips_with_the_original_messages() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/class")
            .set_json(json!({ "name": "10A" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(response).await;
    assert_eq!(created["message"], "Class created successfully");
    let class_id = created["class"]["id"].as_str().expect("id string").to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/class")
            .set_json(json!({ "name": "10A" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let duplicate: Value = test::read_body_json(response).await;
    assert_eq!(duplicate["message"], "Class already exists");

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/class/{class_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/class/{class_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/class/{class_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let missing: Value = test::read_body_json(response).await;
    assert_eq!(missing["message"], "Class not found");
}

#[actix_rt::test]
async fn student_creation_requires_an_existing_class() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/student")
            .set_json(json!({ "name": "Asha", "rollNo": "R-01", "classId": CLASS }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/class")
            .set_json(json!({ "name": "10A" }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(response).await;
    let class_id = created["class"]["id"].as_str().expect("id string").to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/student")
            .set_json(json!({ "name": "Asha", "rollNo": "R-01", "classId": class_id }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let student: Value = test::read_body_json(response).await;
    assert_eq!(student["rollNo"], "R-01");

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/student/class/{class_id}"))
            .to_request(),
    )
    .await;
    let students: Value = test::read_body_json(response).await;
    assert_eq!(students.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn teacher_links_are_add_to_set() {
    let app = test_app!(test_state());

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/teacher")
            .set_json(json!({ "name": "Maria", "email": "maria@school.test" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let teacher: Value = test::read_body_json(response).await;
    assert_eq!(teacher["role"], "teacher");
    let teacher_id = teacher["id"].as_str().expect("id string").to_owned();

    for _ in 0..2 {
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/teacher/add-class")
                .set_json(json!({ "teacherId": teacher_id, "classId": CLASS }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/teacher/remove-class")
            .set_json(json!({ "teacherId": teacher_id, "classId": CLASS }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Class and Teacher unlinked successfully.");
}
