//! Subject CRUD handlers.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewSubject, SubjectRepositoryError, SubjectUpdate};
use crate::domain::{ClassId, Error, Subject, SubjectId, TeacherId};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_optional_uuid, parse_uuid, require_field, FieldName,
};
use crate::inbound::http::ApiResult;

const NAME: FieldName = FieldName::new("name");
const CODE: FieldName = FieldName::new("code");
const TEACHER_ID: FieldName = FieldName::new("teacherId");
const CLASS_ID: FieldName = FieldName::new("classId");
const ID: FieldName = FieldName::new("id");

fn map_repo_error(error: SubjectRepositoryError) -> Error {
    match error {
        SubjectRepositoryError::DuplicateCode { .. } => {
            Error::invalid_request("Subject code already exists")
        }
        other => Error::internal(format!("subject repository failed: {other}")),
    }
}

fn subject_not_found() -> Error {
    Error::not_found("Subject not found")
}

/// Subject representation returned by the API, links populated.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBody {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique course code.
    pub code: String,
    /// Teachers delivering this subject.
    pub teacher_ids: Vec<String>,
    /// Classes this subject is taught to.
    pub class_ids: Vec<String>,
    /// Record creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl From<Subject> for SubjectBody {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id.to_string(),
            name: subject.name,
            code: subject.code,
            teacher_ids: subject
                .teacher_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            class_ids: subject
                .class_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            created_at: subject.created_at.to_rfc3339(),
            updated_at: subject.updated_at.to_rfc3339(),
        }
    }
}

/// Create payload; every field is required.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectBody {
    /// Display name.
    pub name: Option<String>,
    /// Unique course code.
    pub code: Option<String>,
    /// Initial teacher link.
    pub teacher_id: Option<String>,
    /// Initial class link.
    pub class_id: Option<String>,
}

/// Update payload; a supplied teacher or class id replaces the whole link
/// set with that single link.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectBody {
    /// New display name.
    pub name: Option<String>,
    /// New course code.
    pub code: Option<String>,
    /// Replacement teacher link.
    pub teacher_id: Option<String>,
    /// Replacement class link.
    pub class_id: Option<String>,
}

/// Envelope confirming a subject mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEnvelope {
    /// Human-readable confirmation.
    pub message: String,
    /// The affected subject.
    pub subject: SubjectBody,
}

/// Create a new subject linked to one teacher and one class.
#[utoipa::path(
    post,
    path = "/api/subject",
    request_body = CreateSubjectBody,
    responses(
        (status = 201, description = "Subject created", body = SubjectEnvelope),
        (status = 400, description = "Missing fields or duplicate code", body = ErrorSchema),
        (status = 404, description = "Teacher or class not found", body = ErrorSchema)
    ),
    tags = ["subjects"],
    operation_id = "createSubject"
)]
#[post("/subject")]
pub async fn create_subject(
    state: web::Data<HttpState>,
    payload: web::Json<CreateSubjectBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let name = require_field(body.name, NAME)?;
    let code = require_field(body.code, CODE)?;
    let teacher_id =
        TeacherId::new(parse_uuid(&require_field(body.teacher_id, TEACHER_ID)?, TEACHER_ID)?);
    let class_id = ClassId::new(parse_uuid(&require_field(body.class_id, CLASS_ID)?, CLASS_ID)?);

    let teacher = state
        .teachers
        .find_by_id(teacher_id)
        .await
        .map_err(|error| Error::internal(format!("teacher repository failed: {error}")))?;
    if teacher.is_none() {
        return Err(Error::not_found("Teacher not found"));
    }
    let class = state
        .classes
        .find_by_id(class_id)
        .await
        .map_err(|error| Error::internal(format!("class repository failed: {error}")))?;
    if class.is_none() {
        return Err(Error::not_found("Class not found"));
    }

    let subject = state
        .subjects
        .create(NewSubject {
            id: SubjectId::random(),
            name,
            code,
            teacher_ids: vec![teacher_id],
            class_ids: vec![class_id],
        })
        .await
        .map_err(map_repo_error)?;
    Ok(HttpResponse::Created().json(SubjectEnvelope {
        message: "Subject created successfully".to_owned(),
        subject: SubjectBody::from(subject),
    }))
}

/// Get all subjects.
#[utoipa::path(
    get,
    path = "/api/subject",
    responses(
        (status = 200, description = "All subjects", body = [SubjectBody]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["subjects"],
    operation_id = "getAllSubjects"
)]
#[get("/subject")]
pub async fn get_all_subjects(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<SubjectBody>>> {
    let subjects = state.subjects.list().await.map_err(map_repo_error)?;
    Ok(web::Json(
        subjects.into_iter().map(SubjectBody::from).collect(),
    ))
}

/// Get a subject by id.
#[utoipa::path(
    get,
    path = "/api/subject/{id}",
    params(("id" = String, Path, description = "Subject identifier")),
    responses(
        (status = 200, description = "The subject", body = SubjectBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Subject not found", body = ErrorSchema)
    ),
    tags = ["subjects"],
    operation_id = "getSubjectById"
)]
#[get("/subject/{id}")]
pub async fn get_subject_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubjectBody>> {
    let id = SubjectId::new(parse_uuid(&path.into_inner(), ID)?);
    let subject = state
        .subjects
        .find_by_id(id)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(subject_not_found)?;
    Ok(web::Json(SubjectBody::from(subject)))
}

/// Update a subject.
#[utoipa::path(
    put,
    path = "/api/subject/{id}",
    params(("id" = String, Path, description = "Subject identifier")),
    request_body = UpdateSubjectBody,
    responses(
        (status = 200, description = "Subject updated", body = SubjectEnvelope),
        (status = 400, description = "Malformed field or duplicate code", body = ErrorSchema),
        (status = 404, description = "Subject not found", body = ErrorSchema)
    ),
    tags = ["subjects"],
    operation_id = "updateSubject"
)]
#[put("/subject/{id}")]
pub async fn update_subject(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateSubjectBody>,
) -> ApiResult<web::Json<SubjectEnvelope>> {
    let id = SubjectId::new(parse_uuid(&path.into_inner(), ID)?);
    let body = payload.into_inner();
    let update = SubjectUpdate {
        name: body.name,
        code: body.code,
        teacher_id: parse_optional_uuid(body.teacher_id, TEACHER_ID)?.map(TeacherId::new),
        class_id: parse_optional_uuid(body.class_id, CLASS_ID)?.map(ClassId::new),
    };
    let subject = state
        .subjects
        .update(id, update)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(subject_not_found)?;
    Ok(web::Json(SubjectEnvelope {
        message: "Subject updated".to_owned(),
        subject: SubjectBody::from(subject),
    }))
}

/// Delete a subject.
#[utoipa::path(
    delete,
    path = "/api/subject/{id}",
    params(("id" = String, Path, description = "Subject identifier")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Subject not found", body = ErrorSchema)
    ),
    tags = ["subjects"],
    operation_id = "deleteSubject"
)]
#[delete("/subject/{id}")]
pub async fn delete_subject(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = SubjectId::new(parse_uuid(&path.into_inner(), ID)?);
    let deleted = state.subjects.delete(id).await.map_err(map_repo_error)?;
    if !deleted {
        return Err(subject_not_found());
    }
    Ok(web::Json(MessageResponse::new(
        "Subject deleted successfully",
    )))
}
