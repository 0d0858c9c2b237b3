//! School entities: classes, students, subjects, and teachers.
//!
//! These are plain aggregates; invariants that need the store (unique class
//! name, roll number, subject code, teacher email) are enforced by the
//! repository adapters and surface as duplicate errors on the write ports.

use chrono::{DateTime, Utc};

use super::ids::{ClassId, StudentId, SubjectId, TeacherId};

/// A class (form group) students enrol into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    /// Identifier.
    pub id: ClassId,
    /// Unique display name, e.g. `10A`.
    pub name: String,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Roll number, unique across the school.
    pub roll_no: String,
    /// The class the student is enrolled in.
    pub class_id: ClassId,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A taught subject, linked many-to-many with teachers and classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Identifier.
    pub id: SubjectId,
    /// Display name, e.g. `Mathematics`.
    pub name: String,
    /// Unique course code, e.g. `MATH101`.
    pub code: String,
    /// Teachers delivering this subject.
    pub teacher_ids: Vec<TeacherId>,
    /// Classes this subject is taught to.
    pub class_ids: Vec<ClassId>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Role a teacher account holds.
///
/// Authorisation decisions belong to the external identity layer; the role is
/// stored and echoed back, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeacherRole {
    /// Administrative account.
    Admin,
    /// Regular teaching account.
    #[default]
    Teacher,
}

impl TeacherRole {
    /// Canonical stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
        }
    }
}

impl std::fmt::Display for TeacherRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be admin or teacher, got {value}")]
pub struct RoleParseError {
    /// The rejected label.
    pub value: String,
}

impl std::str::FromStr for TeacherRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            other => Err(RoleParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A teacher account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    /// Identifier.
    pub id: TeacherId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Opaque credential hash issued by the external identity layer.
    pub password_hash: Option<String>,
    /// Stored role label.
    pub role: TeacherRole,
    /// Classes taught by this teacher.
    pub class_ids: Vec<ClassId>,
    /// Subjects handled by this teacher.
    pub subject_ids: Vec<SubjectId>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", TeacherRole::Admin)]
    #[case("teacher", TeacherRole::Teacher)]
    fn role_parses_canonical_labels(#[case] label: &str, #[case] expected: TeacherRole) {
        assert_eq!(label.parse::<TeacherRole>(), Ok(expected));
        assert_eq!(expected.as_str(), label);
    }

    #[rstest]
    fn role_defaults_to_teacher() {
        assert_eq!(TeacherRole::default(), TeacherRole::Teacher);
    }

    #[rstest]
    #[case("Admin")]
    #[case("principal")]
    fn role_rejects_unknown_labels(#[case] label: &str) {
        assert!(label.parse::<TeacherRole>().is_err());
    }
}
