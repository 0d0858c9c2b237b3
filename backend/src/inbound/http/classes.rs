//! Class CRUD handlers.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ClassRepositoryError, NewClass};
use crate::domain::{Class, ClassId, Error};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_uuid, require_field, FieldName};
use crate::inbound::http::ApiResult;

const NAME: FieldName = FieldName::new("name");
const ID: FieldName = FieldName::new("id");

fn map_repo_error(error: ClassRepositoryError) -> Error {
    match error {
        ClassRepositoryError::DuplicateName { .. } => {
            Error::invalid_request("Class already exists")
        }
        other => Error::internal(format!("class repository failed: {other}")),
    }
}

fn class_not_found() -> Error {
    Error::not_found("Class not found")
}

/// Class representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassBody {
    /// Identifier.
    pub id: String,
    /// Unique display name.
    pub name: String,
    /// Record creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl From<Class> for ClassBody {
    fn from(class: Class) -> Self {
        Self {
            id: class.id.to_string(),
            name: class.name,
            created_at: class.created_at.to_rfc3339(),
            updated_at: class.updated_at.to_rfc3339(),
        }
    }
}

/// Create/update payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassPayload {
    /// Display name, e.g. `10A`.
    pub name: Option<String>,
}

/// Envelope confirming a class mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassEnvelope {
    /// Human-readable confirmation.
    pub message: String,
    /// The affected class.
    pub class: ClassBody,
}

/// Add a new class.
#[utoipa::path(
    post,
    path = "/api/class",
    request_body = ClassPayload,
    responses(
        (status = 201, description = "Class created", body = ClassEnvelope),
        (status = 400, description = "Missing name or duplicate class", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "addClass"
)]
#[post("/class")]
pub async fn add_class(
    state: web::Data<HttpState>,
    payload: web::Json<ClassPayload>,
) -> ApiResult<HttpResponse> {
    let name = require_field(payload.into_inner().name, NAME)?;
    let class = state
        .classes
        .create(NewClass {
            id: ClassId::random(),
            name,
        })
        .await
        .map_err(map_repo_error)?;
    Ok(HttpResponse::Created().json(ClassEnvelope {
        message: "Class created successfully".to_owned(),
        class: ClassBody::from(class),
    }))
}

/// Get all classes.
#[utoipa::path(
    get,
    path = "/api/class",
    responses(
        (status = 200, description = "All classes", body = [ClassBody]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "getClasses"
)]
#[get("/class")]
pub async fn get_classes(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ClassBody>>> {
    let classes = state.classes.list().await.map_err(map_repo_error)?;
    Ok(web::Json(classes.into_iter().map(ClassBody::from).collect()))
}

/// Get a class by id.
#[utoipa::path(
    get,
    path = "/api/class/{id}",
    params(("id" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "The class", body = ClassBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "getClassById"
)]
#[get("/class/{id}")]
pub async fn get_class_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClassBody>> {
    let id = ClassId::new(parse_uuid(&path.into_inner(), ID)?);
    let class = state
        .classes
        .find_by_id(id)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(class_not_found)?;
    Ok(web::Json(ClassBody::from(class)))
}

/// Update a class.
#[utoipa::path(
    put,
    path = "/api/class/{id}",
    params(("id" = String, Path, description = "Class identifier")),
    request_body = ClassPayload,
    responses(
        (status = 200, description = "Class updated", body = ClassEnvelope),
        (status = 400, description = "Missing name or duplicate class", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "updateClass"
)]
#[put("/class/{id}")]
pub async fn update_class(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ClassPayload>,
) -> ApiResult<web::Json<ClassEnvelope>> {
    let id = ClassId::new(parse_uuid(&path.into_inner(), ID)?);
    let name = require_field(payload.into_inner().name, NAME)?;
    let class = state
        .classes
        .rename(id, name)
        .await
        .map_err(map_repo_error)?
        .ok_or_else(class_not_found)?;
    Ok(web::Json(ClassEnvelope {
        message: "Class updated successfully".to_owned(),
        class: ClassBody::from(class),
    }))
}

/// Delete a class.
#[utoipa::path(
    delete,
    path = "/api/class/{id}",
    params(("id" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "deleteClass"
)]
#[delete("/class/{id}")]
pub async fn delete_class(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = ClassId::new(parse_uuid(&path.into_inner(), ID)?);
    let deleted = state.classes.delete(id).await.map_err(map_repo_error)?;
    if !deleted {
        return Err(class_not_found());
    }
    Ok(web::Json(MessageResponse::new("Class deleted successfully")))
}
