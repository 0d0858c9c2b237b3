//! Attendance HTTP handlers.
//!
//! ```text
//! POST /api/attendance/mark
//! GET  /api/attendance
//! GET  /api/attendance/report
//! GET  /api/attendance/trends
//! GET  /api/attendance/report/daily
//! GET  /api/attendance/debug
//! GET  /api/attendance/student/{studentId}/report
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    ClassReportRequest, DaySheetEntry, DaySheetRequest, MarkAttendanceRequest, MarkEntry,
    RecordFilter, StoredAttendance,
};
use crate::domain::{ClassId, Error, ReportRange, StudentId, SubjectId};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_date, parse_optional_date, parse_optional_uuid, parse_status,
    parse_uuid, require_field, FieldName,
};
use crate::inbound::http::ApiResult;

const DATE: FieldName = FieldName::new("date");
const CLASS_ID: FieldName = FieldName::new("classId");
const SUBJECT_ID: FieldName = FieldName::new("subjectId");
const STUDENT_ID: FieldName = FieldName::new("studentId");
const STATUS: FieldName = FieldName::new("status");
const RECORDS: FieldName = FieldName::new("records");
const FROM: FieldName = FieldName::new("from");
const TO: FieldName = FieldName::new("to");

/// One student's mark inside the batch body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecordBody {
    /// Student being marked.
    pub student_id: Option<String>,
    /// `Present` or `Absent`.
    pub status: Option<String>,
}

/// Request payload for marking attendance.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceBody {
    /// Day of the session.
    pub date: Option<String>,
    /// Subject the session covers.
    pub subject_id: Option<String>,
    /// Class the marks belong to.
    pub class_id: Option<String>,
    /// Session label; defaults to `Default` when omitted.
    pub session: Option<String>,
    /// Per-student marks.
    pub records: Option<Vec<MarkRecordBody>>,
}

fn parse_mark_body(body: MarkAttendanceBody) -> Result<MarkAttendanceRequest, Error> {
    let date = parse_date(&require_field(body.date, DATE)?, DATE)?;
    let subject_id = SubjectId::new(parse_uuid(
        &require_field(body.subject_id, SUBJECT_ID)?,
        SUBJECT_ID,
    )?);
    let class_id = ClassId::new(parse_uuid(
        &require_field(body.class_id, CLASS_ID)?,
        CLASS_ID,
    )?);

    let records = body
        .records
        .ok_or_else(|| missing_field_error(RECORDS))?;
    if records.is_empty() {
        return Err(missing_field_error(RECORDS));
    }

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let student_id = StudentId::new(parse_uuid(
            &require_field(record.student_id, STUDENT_ID)?,
            STUDENT_ID,
        )?);
        let status = parse_status(&require_field(record.status, STATUS)?, STATUS)?;
        entries.push(MarkEntry { student_id, status });
    }

    Ok(MarkAttendanceRequest {
        date,
        class_id,
        subject_id,
        session: body.session,
        entries,
    })
}

/// Mark or update attendance for multiple students in one batch.
#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    request_body = MarkAttendanceBody,
    responses(
        (status = 201, description = "Batch accepted", body = MessageResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "markAttendance"
)]
#[post("/attendance/mark")]
pub async fn mark_attendance(
    state: web::Data<HttpState>,
    payload: web::Json<MarkAttendanceBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_mark_body(payload.into_inner())?;
    state.attendance.mark_attendance(request).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Attendance marked successfully")))
}

/// Query parameters for the day sheet.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DaySheetParams {
    /// Day to resolve, `YYYY-MM-DD` or RFC 3339.
    pub date: Option<String>,
    /// Class whose roster anchors the sheet.
    pub class_id: Option<String>,
    /// Optional subject restriction.
    pub subject_id: Option<String>,
}

/// One roster student with their resolved status.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySheetRow {
    /// Student identifier.
    pub student_id: String,
    /// Display name.
    pub name: String,
    /// Roll number.
    pub roll_no: String,
    /// `Present` or `Absent` (default when unmarked).
    pub status: String,
}

impl From<DaySheetEntry> for DaySheetRow {
    fn from(entry: DaySheetEntry) -> Self {
        Self {
            student_id: entry.student_id.to_string(),
            name: entry.name,
            roll_no: entry.roll_no,
            status: entry.status.as_str().to_owned(),
        }
    }
}

fn parse_day_sheet_params(params: DaySheetParams) -> Result<DaySheetRequest, Error> {
    let date = parse_date(&require_field(params.date, DATE)?, DATE)?;
    let class_id = ClassId::new(parse_uuid(
        &require_field(params.class_id, CLASS_ID)?,
        CLASS_ID,
    )?);
    let subject_id = parse_optional_uuid(params.subject_id, SUBJECT_ID)?.map(SubjectId::new);
    Ok(DaySheetRequest {
        date,
        class_id,
        subject_id,
    })
}

/// Get attendance for a class on a given date, one row per enrolled student.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(DaySheetParams),
    responses(
        (status = 200, description = "Day sheet in roster order", body = [DaySheetRow]),
        (status = 400, description = "Missing date or classId", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getAttendance"
)]
#[get("/attendance")]
pub async fn get_attendance(
    state: web::Data<HttpState>,
    params: web::Query<DaySheetParams>,
) -> ApiResult<web::Json<Vec<DaySheetRow>>> {
    let request = parse_day_sheet_params(params.into_inner())?;
    let sheet = state.attendance_query.attendance_for_day(request).await?;
    Ok(web::Json(sheet.into_iter().map(DaySheetRow::from).collect()))
}

/// Query parameters shared by the class-wide reports.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClassReportParams {
    /// Class whose roster anchors the report.
    pub class_id: Option<String>,
    /// Optional subject restriction.
    pub subject_id: Option<String>,
    /// First day of the range.
    pub from: Option<String>,
    /// Last day of the range.
    pub to: Option<String>,
}

fn parse_class_report_params(params: ClassReportParams) -> Result<ClassReportRequest, Error> {
    let class_id = ClassId::new(parse_uuid(
        &require_field(params.class_id, CLASS_ID)?,
        CLASS_ID,
    )?);
    let subject_id = parse_optional_uuid(params.subject_id, SUBJECT_ID)?.map(SubjectId::new);
    let from = parse_date(&require_field(params.from, FROM)?, FROM)?;
    let to = parse_date(&require_field(params.to, TO)?, TO)?;
    Ok(ClassReportRequest {
        class_id,
        subject_id,
        range: ReportRange::new(from, to),
    })
}

/// Per-student summary row.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    /// Student display name.
    pub name: String,
    /// `Present` records in range.
    pub present: i64,
    /// All records in range.
    pub total: i64,
    /// `present / total × 100`, `0` when no records exist.
    pub percentage: f64,
}

/// Generate the per-student attendance report for a class over a range.
#[utoipa::path(
    get,
    path = "/api/attendance/report",
    params(ClassReportParams),
    responses(
        (status = 200, description = "Per-student summary", body = [SummaryRow]),
        (status = 400, description = "Missing classId or date range", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getAttendanceReport"
)]
#[get("/attendance/report")]
pub async fn get_attendance_report(
    state: web::Data<HttpState>,
    params: web::Query<ClassReportParams>,
) -> ApiResult<web::Json<Vec<SummaryRow>>> {
    let request = parse_class_report_params(params.into_inner())?;
    let summary = state.reports.class_summary(request).await?;
    Ok(web::Json(
        summary
            .into_iter()
            .map(|row| SummaryRow {
                name: row.name,
                present: row.present,
                total: row.total,
                percentage: row.percentage,
            })
            .collect(),
    ))
}

/// One day of the present-count trend.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// `Present` records on that day.
    pub present_count: i64,
    /// Roster size, constant across the series.
    pub total: i64,
}

/// Daily present counts for a class over a range, dense along the calendar.
#[utoipa::path(
    get,
    path = "/api/attendance/trends",
    params(ClassReportParams),
    responses(
        (status = 200, description = "Dense daily present counts", body = [TrendRow]),
        (status = 400, description = "Missing classId or date range", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getAttendanceTrends"
)]
#[get("/attendance/trends")]
pub async fn get_attendance_trends(
    state: web::Data<HttpState>,
    params: web::Query<ClassReportParams>,
) -> ApiResult<web::Json<Vec<TrendRow>>> {
    let request = parse_class_report_params(params.into_inner())?;
    let trend = state.reports.daily_trends(request).await?;
    Ok(web::Json(
        trend
            .into_iter()
            .map(|point| TrendRow {
                date: point.day.format("%Y-%m-%d").to_string(),
                present_count: point.present_count,
                total: point.total,
            })
            .collect(),
    ))
}

/// One day of the daily percentage report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportRowBody {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Day of month.
    pub day: u32,
    /// `Present` records on that day.
    pub present_count: i64,
    /// Roster size.
    pub class_strength: i64,
    /// `presentCount / records taken × 100`, `0` when nothing was taken.
    pub percentage: f64,
}

/// Daily attendance percentage for a class over a range.
///
/// Percentages are normalised against the records actually taken each day,
/// not the roster size; attendance-taking may be incomplete for a day.
#[utoipa::path(
    get,
    path = "/api/attendance/report/daily",
    params(ClassReportParams),
    responses(
        (status = 200, description = "Dense daily percentages", body = [DailyReportRowBody]),
        (status = 400, description = "Missing classId or date range", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getDailyAttendanceReport"
)]
#[get("/attendance/report/daily")]
pub async fn get_daily_attendance_report(
    state: web::Data<HttpState>,
    params: web::Query<ClassReportParams>,
) -> ApiResult<web::Json<Vec<DailyReportRowBody>>> {
    let request = parse_class_report_params(params.into_inner())?;
    let report = state.reports.daily_report(request).await?;
    Ok(web::Json(
        report
            .into_iter()
            .map(|row| DailyReportRowBody {
                date: row.day.format("%Y-%m-%d").to_string(),
                day: row.day_of_month,
                present_count: row.present_count,
                class_strength: row.class_strength,
                percentage: row.percentage,
            })
            .collect(),
    ))
}

/// Query parameters for the raw record dump; every filter is optional.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DebugParams {
    /// Restrict to one class.
    pub class_id: Option<String>,
    /// Restrict to one subject.
    pub subject_id: Option<String>,
    /// Lower date bound.
    pub from: Option<String>,
    /// Upper date bound.
    pub to: Option<String>,
}

fn parse_debug_params(params: DebugParams) -> Result<RecordFilter, Error> {
    Ok(RecordFilter {
        class_id: parse_optional_uuid(params.class_id, CLASS_ID)?.map(ClassId::new),
        subject_id: parse_optional_uuid(params.subject_id, SUBJECT_ID)?.map(SubjectId::new),
        from: parse_optional_date(params.from, FROM)?,
        to: parse_optional_date(params.to, TO)?.map(|moment| {
            crate::domain::DayWindow::containing(moment).end
        }),
    })
}

/// A stored record as returned by the debug dump.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugRecordBody {
    /// Row identifier.
    pub id: String,
    /// Denormalised class reference.
    pub class_id: String,
    /// Student the record belongs to.
    pub student_id: String,
    /// Subject the session belongs to.
    pub subject_id: String,
    /// Day of the session, RFC 3339.
    pub date: String,
    /// Session label.
    pub session: String,
    /// Recorded status.
    pub status: String,
    /// Row creation timestamp.
    pub created_at: String,
    /// Row update timestamp.
    pub updated_at: String,
}

impl From<StoredAttendance> for DebugRecordBody {
    fn from(record: StoredAttendance) -> Self {
        Self {
            id: record.id.to_string(),
            class_id: record.class_id.to_string(),
            student_id: record.student_id.to_string(),
            subject_id: record.subject_id.to_string(),
            date: record.recorded_on.to_rfc3339(),
            session: record.session,
            status: record.status.as_str().to_owned(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Raw attendance documents for operational inspection.
#[utoipa::path(
    get,
    path = "/api/attendance/debug",
    params(DebugParams),
    responses(
        (status = 200, description = "Matching records", body = [DebugRecordBody]),
        (status = 400, description = "Malformed filter value", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "debugAttendance"
)]
#[get("/attendance/debug")]
pub async fn debug_attendance(
    state: web::Data<HttpState>,
    params: web::Query<DebugParams>,
) -> ApiResult<web::Json<Vec<DebugRecordBody>>> {
    let filter = parse_debug_params(params.into_inner())?;
    let records = state.reports.debug_dump(filter).await?;
    Ok(web::Json(
        records.into_iter().map(DebugRecordBody::from).collect(),
    ))
}

/// Per-subject bucket of the student report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectShareBody {
    /// Resolved subject name, or `Unknown`.
    pub name: String,
    /// Percentage of `Present` records for that subject.
    pub percentage: f64,
}

/// A student's attendance across all their records.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportBody {
    /// Overall percentage across every record.
    pub overall: f64,
    /// Per-subject breakdown, ordered by subject name.
    pub by_subject: Vec<SubjectShareBody>,
}

/// Overall and per-subject percentages for one student.
#[utoipa::path(
    get,
    path = "/api/attendance/student/{studentId}/report",
    params(("studentId" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student report", body = StudentReportBody),
        (status = 400, description = "Malformed student id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getStudentAttendanceReport"
)]
#[get("/attendance/student/{studentId}/report")]
pub async fn get_student_attendance_report(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StudentReportBody>> {
    let student_id = StudentId::new(parse_uuid(&path.into_inner(), STUDENT_ID)?);
    let report = state.reports.student_report(student_id).await?;
    Ok(web::Json(StudentReportBody {
        overall: report.overall,
        by_subject: report
            .by_subject
            .into_iter()
            .map(|share| SubjectShareBody {
                name: share.name,
                percentage: share.percentage,
            })
            .collect(),
    }))
}
