//! Behavioural tests driving the attendance services end-to-end over
//! in-memory adapters that honour the store's composite-key semantics.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::rstest;

use backend::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceReports, ClassReportRequest, DaySheetRequest,
    MarkAttendanceRequest, MarkEntry,
};
use backend::domain::{
    AttendanceService, AttendanceStatus, ClassId, ErrorCode, ReportRange, ReportService,
    StudentId, SubjectId,
};

mod support;

use support::{roster_entry, FixedRoster, FixedSubjectDirectory, InMemoryAttendanceStore};

fn utc(value: &str) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(&Utc);
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .expect("valid timestamp")
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight")
        .and_utc()
}

struct Fixture {
    class_id: ClassId,
    subject_id: SubjectId,
    s1: StudentId,
    s2: StudentId,
    store: Arc<InMemoryAttendanceStore>,
    service: AttendanceService<FixedRoster, InMemoryAttendanceStore>,
    reports: ReportService<FixedRoster, InMemoryAttendanceStore, FixedSubjectDirectory>,
}

fn fixture_with_store(store: InMemoryAttendanceStore) -> Fixture {
    let class_id = ClassId::random();
    let subject_id = SubjectId::random();
    let s1 = StudentId::random();
    let s2 = StudentId::random();
    let roster = Arc::new(FixedRoster::new(vec![
        roster_entry(s1, "Asha", "R-01"),
        roster_entry(s2, "Benoit", "R-02"),
    ]));
    let store = Arc::new(store);
    let directory = Arc::new(FixedSubjectDirectory::empty());
    Fixture {
        class_id,
        subject_id,
        s1,
        s2,
        store: Arc::clone(&store),
        service: AttendanceService::new(Arc::clone(&roster), Arc::clone(&store)),
        reports: ReportService::new(roster, store, directory),
    }
}

fn fixture() -> Fixture {
    fixture_with_store(InMemoryAttendanceStore::new())
}

fn mark(
    fixture: &Fixture,
    date: &str,
    session: Option<&str>,
    entries: Vec<(StudentId, AttendanceStatus)>,
) -> MarkAttendanceRequest {
    MarkAttendanceRequest {
        date: utc(date),
        class_id: fixture.class_id,
        subject_id: fixture.subject_id,
        session: session.map(str::to_owned),
        entries: entries
            .into_iter()
            .map(|(student_id, status)| MarkEntry { student_id, status })
            .collect(),
    }
}

#[tokio::test]
async fn marking_the_same_key_twice_keeps_one_record_with_the_latest_status() {
    let fx = fixture();

    fx.service
        .mark_attendance(mark(
            &fx,
            "2024-02-01T08:00:00Z",
            None,
            vec![(fx.s1, AttendanceStatus::Present)],
        ))
        .await
        .expect("first mark accepted");
    fx.service
        .mark_attendance(mark(
            &fx,
            "2024-02-01T15:30:00Z",
            None,
            vec![(fx.s1, AttendanceStatus::Absent)],
        ))
        .await
        .expect("second mark accepted");

    assert_eq!(fx.store.record_count(), 1);
    let record = &fx.store.snapshot()[0];
    assert_eq!(record.status, AttendanceStatus::Absent);
    assert_eq!(record.recorded_on, utc("2024-02-01T00:00:00Z"));
    assert_eq!(record.session, "Default");
}

#[tokio::test]
async fn distinct_sessions_on_one_day_keep_distinct_records() {
    let fx = fixture();

    for session in ["Period 1", "Period 2"] {
        fx.service
            .mark_attendance(mark(
                &fx,
                "2024-02-01T08:00:00Z",
                Some(session),
                vec![(fx.s1, AttendanceStatus::Present)],
            ))
            .await
            .expect("mark accepted");
    }

    assert_eq!(fx.store.record_count(), 2);
}

#[tokio::test]
async fn day_sheet_matches_the_worked_example() {
    let fx = fixture();

    fx.service
        .mark_attendance(mark(
            &fx,
            "2024-02-01",
            None,
            vec![(fx.s1, AttendanceStatus::Present)],
        ))
        .await
        .expect("mark accepted");

    let sheet = fx
        .service
        .attendance_for_day(DaySheetRequest {
            date: utc("2024-02-01T00:00:00Z"),
            class_id: fx.class_id,
            subject_id: None,
        })
        .await
        .expect("sheet resolves");

    // roster = [S1, S2], records = {S1: Present} → [Present, Absent]
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet[0].student_id, fx.s1);
    assert_eq!(sheet[0].status, AttendanceStatus::Present);
    assert_eq!(sheet[1].student_id, fx.s2);
    assert_eq!(sheet[1].status, AttendanceStatus::Absent);
}

#[tokio::test]
async fn a_failing_entry_does_not_block_the_rest_of_the_batch() {
    let poisoned = StudentId::random();
    let fx = fixture_with_store(InMemoryAttendanceStore::poisoned_for(poisoned));

    let error = fx
        .service
        .mark_attendance(mark(
            &fx,
            "2024-02-01",
            None,
            vec![
                (fx.s1, AttendanceStatus::Present),
                (poisoned, AttendanceStatus::Present),
            ],
        ))
        .await
        .expect_err("batch reports the failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    // The healthy entry still applied.
    assert_eq!(fx.store.record_count(), 1);
}

fn january_request(fx: &Fixture) -> ClassReportRequest {
    ClassReportRequest {
        class_id: fx.class_id,
        subject_id: None,
        range: ReportRange::new(utc("2024-01-01T00:00:00Z"), utc("2024-01-05T00:00:00Z")),
    }
}

#[tokio::test]
async fn trend_and_daily_reports_stay_dense_over_an_empty_store() {
    let fx = fixture();

    let trend = fx
        .reports
        .daily_trends(january_request(&fx))
        .await
        .expect("trend resolves");
    assert_eq!(trend.len(), 5);
    assert!(trend.iter().all(|point| point.present_count == 0));
    assert!(trend.iter().all(|point| point.total == 2));

    let daily = fx
        .reports
        .daily_report(january_request(&fx))
        .await
        .expect("daily resolves");
    assert_eq!(daily.len(), 5);
    assert!(daily.iter().all(|row| row.percentage == 0.0));
    assert!(daily.iter().all(|row| row.class_strength == 2));
}

#[tokio::test]
async fn class_summary_matches_the_worked_percentage_example() {
    let fx = fixture();

    let days = ["2024-01-01", "2024-01-02", "2024-01-03"];
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
    ];
    for (day, status) in days.into_iter().zip(statuses) {
        fx.service
            .mark_attendance(mark(&fx, day, None, vec![(fx.s1, status)]))
            .await
            .expect("mark accepted");
    }

    let summary = fx
        .reports
        .class_summary(january_request(&fx))
        .await
        .expect("summary resolves");

    let asha = summary
        .iter()
        .find(|row| row.name == "Asha")
        .expect("asha present");
    assert_eq!(asha.present, 2);
    assert_eq!(asha.total, 3);
    assert!((asha.percentage - 200.0 / 3.0).abs() < 1e-9);

    let benoit = summary
        .iter()
        .find(|row| row.name == "Benoit")
        .expect("benoit present");
    assert_eq!(benoit.total, 0);
    assert_eq!(benoit.percentage, 0.0);
}

#[tokio::test]
async fn daily_report_normalises_by_marks_taken_not_roster_size() {
    let fx = fixture();

    // Only S1 was marked on the 2nd; S2's attendance was never taken.
    fx.service
        .mark_attendance(mark(
            &fx,
            "2024-01-02",
            None,
            vec![(fx.s1, AttendanceStatus::Present)],
        ))
        .await
        .expect("mark accepted");

    let daily = fx
        .reports
        .daily_report(january_request(&fx))
        .await
        .expect("daily resolves");
    let row = daily
        .iter()
        .find(|row| row.day.to_string() == "2024-01-02")
        .expect("row for the 2nd");
    assert_eq!(row.present_count, 1);
    assert_eq!(row.total_marked, 1);
    assert_eq!(row.class_strength, 2);
    assert!((row.percentage - 100.0).abs() < 1e-9);

    let trend = fx
        .reports
        .daily_trends(january_request(&fx))
        .await
        .expect("trend resolves");
    let point = trend
        .iter()
        .find(|point| point.day.to_string() == "2024-01-02")
        .expect("point for the 2nd");
    // The trend pairs the same day with roster size instead.
    assert_eq!(point.present_count, 1);
    assert_eq!(point.total, 2);
}

#[rstest]
#[tokio::test]
async fn student_report_spans_all_records_and_buckets_unresolved_subjects() {
    let class_id = ClassId::random();
    let maths = SubjectId::random();
    let orphan = SubjectId::random();
    let s1 = StudentId::random();
    let roster = Arc::new(FixedRoster::new(vec![roster_entry(s1, "Asha", "R-01")]));
    let store = Arc::new(InMemoryAttendanceStore::new());
    let directory = Arc::new(FixedSubjectDirectory::new(HashMap::from([(
        maths,
        "Mathematics".to_owned(),
    )])));
    let service = AttendanceService::new(Arc::clone(&roster), Arc::clone(&store));
    let reports = ReportService::new(roster, Arc::clone(&store), directory);

    for (day, subject, status) in [
        ("2024-01-01", maths, AttendanceStatus::Present),
        ("2024-03-01", maths, AttendanceStatus::Absent),
        ("2024-05-01", orphan, AttendanceStatus::Present),
    ] {
        service
            .mark_attendance(MarkAttendanceRequest {
                date: utc(&format!("{day}T08:00:00Z")),
                class_id,
                subject_id: subject,
                session: None,
                entries: vec![MarkEntry {
                    student_id: s1,
                    status,
                }],
            })
            .await
            .expect("mark accepted");
    }

    let report = reports.student_report(s1).await.expect("report resolves");
    assert!((report.overall - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.by_subject.len(), 2);
    assert_eq!(report.by_subject[0].name, "Mathematics");
    assert!((report.by_subject[0].percentage - 50.0).abs() < 1e-9);
    assert_eq!(report.by_subject[1].name, "Unknown");
    assert!((report.by_subject[1].percentage - 100.0).abs() < 1e-9);
}
