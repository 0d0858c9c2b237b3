//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `migrations/` exactly;
//! regenerate with `diesel print-schema` after a migration changes the
//! schema.

diesel::table! {
    /// Classes (form groups) students enrol into.
    classes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique display name, e.g. `10A`.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrolled students.
    students (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Roll number, unique across the school.
        roll_no -> Varchar,
        /// Enrolment class reference.
        class_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Taught subjects.
    subjects (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name, e.g. `Mathematics`.
        name -> Varchar,
        /// Unique course code, e.g. `MATH101`.
        code -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Teacher accounts.
    teachers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique email address.
        email -> Varchar,
        /// Opaque credential hash issued by the external identity layer.
        password_hash -> Nullable<Varchar>,
        /// Stored role label, `admin` or `teacher`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Subject↔teacher many-to-many links.
    subject_teachers (subject_id, teacher_id) {
        /// Subject side of the link.
        subject_id -> Uuid,
        /// Teacher side of the link.
        teacher_id -> Uuid,
    }
}

diesel::table! {
    /// Subject↔class many-to-many links.
    subject_classes (subject_id, class_id) {
        /// Subject side of the link.
        subject_id -> Uuid,
        /// Class side of the link.
        class_id -> Uuid,
    }
}

diesel::table! {
    /// Teacher↔class many-to-many links.
    teacher_classes (teacher_id, class_id) {
        /// Teacher side of the link.
        teacher_id -> Uuid,
        /// Class side of the link.
        class_id -> Uuid,
    }
}

diesel::table! {
    /// Per-session attendance records.
    ///
    /// The composite unique index over
    /// `(class_id, student_id, subject_id, recorded_on, session)` is the
    /// only schema-level invariant enforcement; writes upsert against it.
    attendance_records (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Denormalised class reference.
        class_id -> Uuid,
        /// Student reference.
        student_id -> Uuid,
        /// Subject reference.
        subject_id -> Uuid,
        /// Day of the session, truncated to UTC midnight on write.
        recorded_on -> Timestamptz,
        /// Session label, `Default` when unspecified.
        session -> Varchar,
        /// Status label, `Present` or `Absent`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    classes,
    students,
    subjects,
    teachers,
    subject_teachers,
    subject_classes,
    teacher_classes,
    attendance_records,
);
