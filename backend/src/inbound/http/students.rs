//! Student CRUD handlers.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    ClassRepositoryError, NewStudent, StudentRepositoryError, StudentUpdate,
};
use crate::domain::{ClassId, Error, Student, StudentId};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_optional_uuid, parse_uuid, require_field, FieldName,
};
use crate::inbound::http::ApiResult;

const NAME: FieldName = FieldName::new("name");
const ROLL_NO: FieldName = FieldName::new("rollNo");
const CLASS_ID: FieldName = FieldName::new("classId");
const ID: FieldName = FieldName::new("id");

fn map_repo_error(error: StudentRepositoryError) -> Error {
    match error {
        StudentRepositoryError::DuplicateRollNo { .. } => {
            Error::invalid_request("Roll number already exists")
        }
        other => Error::internal(format!("student repository failed: {other}")),
    }
}

fn map_class_repo_error(error: ClassRepositoryError) -> Error {
    Error::internal(format!("class repository failed: {error}"))
}

fn student_not_found() -> Error {
    Error::not_found("Student not found")
}

/// Ensure the referenced class exists before enrolling into it.
async fn require_class_exists(state: &HttpState, class_id: ClassId) -> Result<(), Error> {
    let found = state
        .classes
        .find_by_id(class_id)
        .await
        .map_err(map_class_repo_error)?;
    if found.is_none() {
        return Err(Error::not_found("Class not found"));
    }
    Ok(())
}

/// Student representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Roll number.
    pub roll_no: String,
    /// Enrolment class.
    pub class_id: String,
    /// Record creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl From<Student> for StudentBody {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.name,
            roll_no: student.roll_no,
            class_id: student.class_id.to_string(),
            created_at: student.created_at.to_rfc3339(),
            updated_at: student.updated_at.to_rfc3339(),
        }
    }
}

/// Create payload; every field is required.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentBody {
    /// Display name.
    pub name: Option<String>,
    /// Unique roll number.
    pub roll_no: Option<String>,
    /// Class to enrol into.
    pub class_id: Option<String>,
}

/// Update payload; absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentBody {
    /// New display name.
    pub name: Option<String>,
    /// New roll number.
    pub roll_no: Option<String>,
    /// New enrolment class.
    pub class_id: Option<String>,
}

/// Add a new student.
#[utoipa::path(
    post,
    path = "/api/student",
    request_body = CreateStudentBody,
    responses(
        (status = 201, description = "Student created", body = StudentBody),
        (status = 400, description = "Missing fields or duplicate roll number", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "addStudent"
)]
#[post("/student")]
pub async fn add_student(
    state: web::Data<HttpState>,
    payload: web::Json<CreateStudentBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let name = require_field(body.name, NAME)?;
    let roll_no = require_field(body.roll_no, ROLL_NO)?;
    let class_id = ClassId::new(parse_uuid(&require_field(body.class_id, CLASS_ID)?, CLASS_ID)?);

    require_class_exists(&state, class_id).await?;

    let student = state
        .students
        .create(NewStudent {
            id: StudentId::random(),
            name,
            roll_no,
            class_id,
        })
        .await
        .map_err(map_repo_error)?;
    Ok(HttpResponse::Created().json(StudentBody::from(student)))
}

/// Get all students.
#[utoipa::path(
    get,
    path = "/api/student",
    responses(
        (status = 200, description = "All students", body = [StudentBody]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudents"
)]
#[get("/student")]
pub async fn get_students(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<StudentBody>>> {
    let students = state.students.list().await.map_err(map_repo_error)?;
    Ok(web::Json(
        students.into_iter().map(StudentBody::from).collect(),
    ))
}

/// Get a single student by id.
#[utoipa::path(
    get,
    path = "/api/student/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "The student", body = StudentBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudentById"
)]
#[get("/student/{id}")]
pub async fn get_student_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StudentBody>> {
    let id = StudentId::new(parse_uuid(&path.into_inner(), ID)?);
    let student = state
        .students
        .find_by_id(id)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(student_not_found)?;
    Ok(web::Json(StudentBody::from(student)))
}

/// Get the students enrolled in one class.
#[utoipa::path(
    get,
    path = "/api/student/class/{classId}",
    params(("classId" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "Students in roster order", body = [StudentBody]),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudentsByClass"
)]
#[get("/student/class/{classId}")]
pub async fn get_students_by_class(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<StudentBody>>> {
    let class_id = ClassId::new(parse_uuid(&path.into_inner(), CLASS_ID)?);
    let students = state
        .students
        .list_by_class(class_id)
        .await
        .map_err(map_repo_error)?;
    Ok(web::Json(
        students.into_iter().map(StudentBody::from).collect(),
    ))
}

/// Update a student.
#[utoipa::path(
    put,
    path = "/api/student/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    request_body = UpdateStudentBody,
    responses(
        (status = 200, description = "Student updated", body = StudentBody),
        (status = 400, description = "Malformed field", body = ErrorSchema),
        (status = 404, description = "Student or class not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "updateStudent"
)]
#[put("/student/{id}")]
pub async fn update_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStudentBody>,
) -> ApiResult<web::Json<StudentBody>> {
    let id = StudentId::new(parse_uuid(&path.into_inner(), ID)?);
    let body = payload.into_inner();
    let class_id = parse_optional_uuid(body.class_id, CLASS_ID)?.map(ClassId::new);
    if let Some(class_id) = class_id {
        require_class_exists(&state, class_id).await?;
    }

    let student = state
        .students
        .update(
            id,
            StudentUpdate {
                name: body.name,
                roll_no: body.roll_no,
                class_id,
            },
        )
        .await
        .map_err(map_repo_error)?
        .ok_or_else(student_not_found)?;
    Ok(web::Json(StudentBody::from(student)))
}

/// Delete a student.
#[utoipa::path(
    delete,
    path = "/api/student/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/student/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = StudentId::new(parse_uuid(&path.into_inner(), ID)?);
    let deleted = state.students.delete(id).await.map_err(map_repo_error)?;
    if !deleted {
        return Err(student_not_found());
    }
    Ok(web::Json(MessageResponse::new(
        "Student deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_roll_numbers_map_to_a_validation_error() {
        let error = map_repo_error(StudentRepositoryError::duplicate_roll_no("R-01"));
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Roll number already exists");
    }

    #[rstest]
    fn query_failures_stay_internal() {
        let error = map_repo_error(StudentRepositoryError::query("boom"));
        assert_eq!(error.code(), crate::domain::ErrorCode::InternalError);
    }
}
