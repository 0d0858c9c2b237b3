//! Row structs mapping Diesel query results onto the schema tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    attendance_records, classes, students, subject_classes, subject_teachers, subjects,
    teacher_classes, teachers,
};

/// A class row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClassRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable class row; timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = classes)]
pub struct NewClassRow {
    pub id: Uuid,
    pub name: String,
}

/// A student row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub roll_no: String,
    pub class_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable student row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudentRow {
    pub id: Uuid,
    pub name: String,
    pub roll_no: String,
    pub class_id: Uuid,
}

/// Partial student update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = students)]
pub struct StudentChangeset {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub class_id: Option<Uuid>,
}

/// A subject row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubjectRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable subject row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subjects)]
pub struct NewSubjectRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

/// Partial subject update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = subjects)]
pub struct SubjectChangeset {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// A teacher row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teachers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeacherRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable teacher row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teachers)]
pub struct NewTeacherRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
}

/// Partial teacher update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = teachers)]
pub struct TeacherChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Subject↔teacher link row.
#[derive(Debug, Clone, Copy, Queryable, Insertable)]
#[diesel(table_name = subject_teachers)]
pub struct SubjectTeacherRow {
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
}

/// Subject↔class link row.
#[derive(Debug, Clone, Copy, Queryable, Insertable)]
#[diesel(table_name = subject_classes)]
pub struct SubjectClassRow {
    pub subject_id: Uuid,
    pub class_id: Uuid,
}

/// Teacher↔class link row.
#[derive(Debug, Clone, Copy, Queryable, Insertable)]
#[diesel(table_name = teacher_classes)]
pub struct TeacherClassRow {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

/// An attendance record row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendanceRow {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub recorded_on: DateTime<Utc>,
    pub session: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable attendance row used by the upsert path.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendance_records)]
pub struct NewAttendanceRow {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub recorded_on: DateTime<Utc>,
    pub session: String,
    pub status: String,
}
