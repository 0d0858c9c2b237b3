//! Teacher relationship handlers (admin surface).
//!
//! A link row represents both directions of each many-to-many relationship,
//! so one repository call replaces the original's paired array updates.
//! Linking is add-to-set: repeating a link is a no-op, as is unlinking an
//! absent pair.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClassId, SubjectId, TeacherId};
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::teachers::map_repo_error;
use crate::inbound::http::validation::{parse_uuid, require_field, FieldName};
use crate::inbound::http::ApiResult;

const TEACHER_ID: FieldName = FieldName::new("teacherId");
const CLASS_ID: FieldName = FieldName::new("classId");
const SUBJECT_ID: FieldName = FieldName::new("subjectId");

/// Class↔teacher link payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherClassLinkBody {
    /// Teacher side of the link.
    pub teacher_id: Option<String>,
    /// Class side of the link.
    pub class_id: Option<String>,
}

/// Subject↔teacher link payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSubjectLinkBody {
    /// Teacher side of the link.
    pub teacher_id: Option<String>,
    /// Subject side of the link.
    pub subject_id: Option<String>,
}

fn parse_class_link(body: TeacherClassLinkBody) -> ApiResult<(TeacherId, ClassId)> {
    let teacher_id =
        TeacherId::new(parse_uuid(&require_field(body.teacher_id, TEACHER_ID)?, TEACHER_ID)?);
    let class_id = ClassId::new(parse_uuid(&require_field(body.class_id, CLASS_ID)?, CLASS_ID)?);
    Ok((teacher_id, class_id))
}

fn parse_subject_link(body: TeacherSubjectLinkBody) -> ApiResult<(TeacherId, SubjectId)> {
    let teacher_id =
        TeacherId::new(parse_uuid(&require_field(body.teacher_id, TEACHER_ID)?, TEACHER_ID)?);
    let subject_id =
        SubjectId::new(parse_uuid(&require_field(body.subject_id, SUBJECT_ID)?, SUBJECT_ID)?);
    Ok((teacher_id, subject_id))
}

/// Link a class to a teacher.
#[utoipa::path(
    post,
    path = "/api/admin/teacher/add-class",
    request_body = TeacherClassLinkBody,
    responses(
        (status = 200, description = "Link recorded", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addClassToTeacher"
)]
#[post("/admin/teacher/add-class")]
pub async fn add_class_to_teacher(
    state: web::Data<HttpState>,
    payload: web::Json<TeacherClassLinkBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (teacher_id, class_id) = parse_class_link(payload.into_inner())?;
    state
        .teachers
        .add_class(teacher_id, class_id)
        .await
        .map_err(map_repo_error)?;
    Ok(web::Json(MessageResponse::new(
        "Class and Teacher linked successfully.",
    )))
}

/// Remove a class↔teacher link.
#[utoipa::path(
    post,
    path = "/api/admin/teacher/remove-class",
    request_body = TeacherClassLinkBody,
    responses(
        (status = 200, description = "Link removed", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "removeClassFromTeacher"
)]
#[post("/admin/teacher/remove-class")]
pub async fn remove_class_from_teacher(
    state: web::Data<HttpState>,
    payload: web::Json<TeacherClassLinkBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (teacher_id, class_id) = parse_class_link(payload.into_inner())?;
    state
        .teachers
        .remove_class(teacher_id, class_id)
        .await
        .map_err(map_repo_error)?;
    Ok(web::Json(MessageResponse::new(
        "Class and Teacher unlinked successfully.",
    )))
}

/// Link a subject to a teacher.
#[utoipa::path(
    post,
    path = "/api/admin/teacher/add-subject",
    request_body = TeacherSubjectLinkBody,
    responses(
        (status = 200, description = "Link recorded", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addSubjectToTeacher"
)]
#[post("/admin/teacher/add-subject")]
pub async fn add_subject_to_teacher(
    state: web::Data<HttpState>,
    payload: web::Json<TeacherSubjectLinkBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (teacher_id, subject_id) = parse_subject_link(payload.into_inner())?;
    state
        .teachers
        .add_subject(teacher_id, subject_id)
        .await
        .map_err(map_repo_error)?;
    Ok(web::Json(MessageResponse::new(
        "Subject and Teacher linked successfully.",
    )))
}

/// Remove a subject↔teacher link.
#[utoipa::path(
    post,
    path = "/api/admin/teacher/remove-subject",
    request_body = TeacherSubjectLinkBody,
    responses(
        (status = 200, description = "Link removed", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "removeSubjectFromTeacher"
)]
#[post("/admin/teacher/remove-subject")]
pub async fn remove_subject_from_teacher(
    state: web::Data<HttpState>,
    payload: web::Json<TeacherSubjectLinkBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (teacher_id, subject_id) = parse_subject_link(payload.into_inner())?;
    state
        .teachers
        .remove_subject(teacher_id, subject_id)
        .await
        .map_err(map_repo_error)?;
    Ok(web::Json(MessageResponse::new(
        "Subject and Teacher unlinked successfully.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn class_link_requires_both_sides() {
        let error = parse_class_link(TeacherClassLinkBody {
            teacher_id: Some("11111111-1111-1111-1111-111111111111".to_owned()),
            class_id: None,
        })
        .expect_err("classId required");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn subject_link_rejects_malformed_ids() {
        let error = parse_subject_link(TeacherSubjectLinkBody {
            teacher_id: Some("not-a-uuid".to_owned()),
            subject_id: Some("22222222-2222-2222-2222-222222222222".to_owned()),
        })
        .expect_err("teacherId rejected");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
