//! Teacher CRUD handlers.
//!
//! Credential issuance is out of scope: the optional `passwordHash` field is
//! stored opaquely for the external identity layer, and no login or token
//! endpoint exists here.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewTeacher, TeacherRepositoryError, TeacherUpdate};
use crate::domain::{Error, Teacher, TeacherId, TeacherRole};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_role_error, parse_uuid, require_field, FieldName,
};
use crate::inbound::http::ApiResult;

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const ROLE: FieldName = FieldName::new("role");
const ID: FieldName = FieldName::new("id");

pub(crate) fn map_repo_error(error: TeacherRepositoryError) -> Error {
    match error {
        TeacherRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request("Teacher already exists")
        }
        other => Error::internal(format!("teacher repository failed: {other}")),
    }
}

fn teacher_not_found() -> Error {
    Error::not_found("Teacher not found")
}

/// Teacher profile returned by the API; the credential hash never leaves
/// the store.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherBody {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Stored role label.
    pub role: String,
    /// Classes taught by this teacher.
    pub class_ids: Vec<String>,
    /// Subjects handled by this teacher.
    pub subject_ids: Vec<String>,
    /// Record creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl From<Teacher> for TeacherBody {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id.to_string(),
            name: teacher.name,
            email: teacher.email,
            role: teacher.role.as_str().to_owned(),
            class_ids: teacher
                .class_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            subject_ids: teacher
                .subject_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            created_at: teacher.created_at.to_rfc3339(),
            updated_at: teacher.updated_at.to_rfc3339(),
        }
    }
}

/// Create payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherBody {
    /// Display name.
    pub name: Option<String>,
    /// Unique email address.
    pub email: Option<String>,
    /// Role label; defaults to `teacher`.
    pub role: Option<String>,
    /// Opaque credential hash issued by the external identity layer.
    pub password_hash: Option<String>,
}

/// Profile update payload; absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherBody {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// Replacement credential hash.
    pub password_hash: Option<String>,
}

fn parse_role(role: Option<String>) -> Result<TeacherRole, Error> {
    match role {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<TeacherRole>()
            .map_err(|_| invalid_role_error(ROLE, &raw)),
        _ => Ok(TeacherRole::default()),
    }
}

/// Register a new teacher.
#[utoipa::path(
    post,
    path = "/api/teacher",
    request_body = CreateTeacherBody,
    responses(
        (status = 201, description = "Teacher created", body = TeacherBody),
        (status = 400, description = "Missing fields or duplicate email", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["teachers"],
    operation_id = "registerTeacher"
)]
#[post("/teacher")]
pub async fn register_teacher(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTeacherBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let name = require_field(body.name, NAME)?;
    let email = require_field(body.email, EMAIL)?;
    let role = parse_role(body.role)?;

    let teacher = state
        .teachers
        .create(NewTeacher {
            id: TeacherId::random(),
            name,
            email,
            password_hash: body.password_hash,
            role,
        })
        .await
        .map_err(map_repo_error)?;
    Ok(HttpResponse::Created().json(TeacherBody::from(teacher)))
}

/// Get a teacher profile with subject and class links.
#[utoipa::path(
    get,
    path = "/api/teacher/{id}",
    params(("id" = String, Path, description = "Teacher identifier")),
    responses(
        (status = 200, description = "The teacher", body = TeacherBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Teacher not found", body = ErrorSchema)
    ),
    tags = ["teachers"],
    operation_id = "getTeacherProfile"
)]
#[get("/teacher/{id}")]
pub async fn get_teacher_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TeacherBody>> {
    let id = TeacherId::new(parse_uuid(&path.into_inner(), ID)?);
    let teacher = state
        .teachers
        .find_by_id(id)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(teacher_not_found)?;
    Ok(web::Json(TeacherBody::from(teacher)))
}

/// Update a teacher profile.
#[utoipa::path(
    put,
    path = "/api/teacher/{id}",
    params(("id" = String, Path, description = "Teacher identifier")),
    request_body = UpdateTeacherBody,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherBody),
        (status = 400, description = "Malformed field or duplicate email", body = ErrorSchema),
        (status = 404, description = "Teacher not found", body = ErrorSchema)
    ),
    tags = ["teachers"],
    operation_id = "updateTeacherProfile"
)]
#[put("/teacher/{id}")]
pub async fn update_teacher_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateTeacherBody>,
) -> ApiResult<web::Json<TeacherBody>> {
    let id = TeacherId::new(parse_uuid(&path.into_inner(), ID)?);
    let body = payload.into_inner();
    let teacher = state
        .teachers
        .update(
            id,
            TeacherUpdate {
                name: body.name,
                email: body.email,
                password_hash: body.password_hash,
            },
        )
        .await
        .map_err(map_repo_error)?
        .ok_or_else(teacher_not_found)?;
    Ok(web::Json(TeacherBody::from(teacher)))
}

/// Delete a teacher.
#[utoipa::path(
    delete,
    path = "/api/teacher/{id}",
    params(("id" = String, Path, description = "Teacher identifier")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Teacher not found", body = ErrorSchema)
    ),
    tags = ["teachers"],
    operation_id = "deleteTeacher"
)]
#[delete("/teacher/{id}")]
pub async fn delete_teacher(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = TeacherId::new(parse_uuid(&path.into_inner(), ID)?);
    let deleted = state.teachers.delete(id).await.map_err(map_repo_error)?;
    if !deleted {
        return Err(teacher_not_found());
    }
    Ok(web::Json(MessageResponse::new(
        "Teacher deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_emails_map_to_the_original_message() {
        let error = map_repo_error(TeacherRepositoryError::duplicate_email("a@school.test"));
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Teacher already exists");
    }

    #[rstest]
    #[case(None, TeacherRole::Teacher)]
    #[case(Some(String::new()), TeacherRole::Teacher)]
    #[case(Some("admin".to_owned()), TeacherRole::Admin)]
    fn parse_role_defaults_and_accepts_known_labels(
        #[case] input: Option<String>,
        #[case] expected: TeacherRole,
    ) {
        assert_eq!(parse_role(input).expect("role parses"), expected);
    }

    #[rstest]
    fn parse_role_rejects_unknown_labels() {
        let error = parse_role(Some("principal".to_owned())).expect_err("role rejected");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
