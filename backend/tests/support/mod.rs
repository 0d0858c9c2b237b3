//! In-memory port implementations for behaviour tests.
//!
//! These adapters mirror the store semantics the Diesel implementations
//! provide: composite-key upserts, day-window lookups, and grouped
//! aggregations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use backend::domain::ports::{
    AttendanceStore, AttendanceStoreError, AttendanceUpsert, DayCount, DayTally, RecordFilter,
    RosterProvider, RosterProviderError, StoredAttendance, StudentTally, SubjectDirectory,
    SubjectDirectoryError,
};
use backend::domain::{
    AttendanceStatus, DayWindow, ReportRange, RosterEntry, StudentId, SubjectId,
};

/// Fixed roster, already in roster order.
pub struct FixedRoster {
    entries: Vec<RosterEntry>,
}

impl FixedRoster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl RosterProvider for FixedRoster {
    async fn roster_for_class(
        &self,
        _class_id: backend::domain::ClassId,
    ) -> Result<Vec<RosterEntry>, RosterProviderError> {
        Ok(self.entries.clone())
    }
}

/// Name directory backed by a plain map.
pub struct FixedSubjectDirectory {
    names: HashMap<SubjectId, String>,
}

impl FixedSubjectDirectory {
    pub fn new(names: HashMap<SubjectId, String>) -> Self {
        Self { names }
    }

    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }
}

#[async_trait]
impl SubjectDirectory for FixedSubjectDirectory {
    async fn subject_names(
        &self,
        ids: Vec<SubjectId>,
    ) -> Result<HashMap<SubjectId, String>, SubjectDirectoryError> {
        Ok(ids
            .into_iter()
            .filter_map(|id| self.names.get(&id).map(|name| (id, name.clone())))
            .collect())
    }
}

/// In-memory attendance store honouring the composite uniqueness key.
#[derive(Default)]
pub struct InMemoryAttendanceStore {
    records: Mutex<Vec<StoredAttendance>>,
    /// Upserts for this student fail, to exercise unordered-batch
    /// semantics.
    poisoned_student: Option<StudentId>,
}

impl InMemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poisoned_for(student_id: StudentId) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            poisoned_student: Some(student_id),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().expect("store poisoned").len()
    }

    pub fn snapshot(&self) -> Vec<StoredAttendance> {
        self.records.lock().expect("store poisoned").clone()
    }
}

fn same_key(record: &StoredAttendance, upsert: &AttendanceUpsert) -> bool {
    record.class_id == upsert.class_id
        && record.student_id == upsert.student_id
        && record.subject_id == upsert.subject_id
        && record.recorded_on == upsert.recorded_on
        && record.session == upsert.session
}

fn within_range(record: &StoredAttendance, range: ReportRange) -> bool {
    record.recorded_on >= range.from && record.recorded_on <= range.to
}

fn subject_matches(record: &StoredAttendance, subject_id: Option<SubjectId>) -> bool {
    subject_id.is_none_or(|subject| record.subject_id == subject)
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn upsert_batch(
        &self,
        records: Vec<AttendanceUpsert>,
    ) -> Result<(), AttendanceStoreError> {
        let mut stored = self.records.lock().expect("store poisoned");
        let total = records.len();
        let mut failed = 0_usize;
        for upsert in records {
            if self.poisoned_student == Some(upsert.student_id) {
                failed += 1;
                continue;
            }
            if let Some(existing) = stored.iter_mut().find(|record| same_key(record, &upsert)) {
                existing.status = upsert.status;
                existing.updated_at = Utc::now();
            } else {
                stored.push(StoredAttendance {
                    id: Uuid::new_v4(),
                    class_id: upsert.class_id,
                    student_id: upsert.student_id,
                    subject_id: upsert.subject_id,
                    recorded_on: upsert.recorded_on,
                    session: upsert.session,
                    status: upsert.status,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
            }
        }
        if failed > 0 {
            return Err(AttendanceStoreError::write(format!(
                "{failed} of {total} upserts failed"
            )));
        }
        Ok(())
    }

    async fn find_for_students_in_window(
        &self,
        student_ids: Vec<StudentId>,
        window: DayWindow,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        Ok(stored
            .iter()
            .filter(|record| student_ids.contains(&record.student_id))
            .filter(|record| {
                record.recorded_on >= window.start && record.recorded_on <= window.end
            })
            .filter(|record| subject_matches(record, subject_id))
            .cloned()
            .collect())
    }

    async fn per_student_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<StudentTally>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        let mut tallies: HashMap<StudentId, (i64, i64)> = HashMap::new();
        for record in stored
            .iter()
            .filter(|record| student_ids.contains(&record.student_id))
            .filter(|record| within_range(record, range))
            .filter(|record| subject_matches(record, subject_id))
        {
            let tally = tallies.entry(record.student_id).or_insert((0, 0));
            tally.1 += 1;
            if record.status == AttendanceStatus::Present {
                tally.0 += 1;
            }
        }
        Ok(tallies
            .into_iter()
            .map(|(student_id, (present, total))| StudentTally {
                student_id,
                present,
                total,
            })
            .collect())
    }

    async fn daily_present_counts(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayCount>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        let mut counts: HashMap<NaiveDate, i64> = HashMap::new();
        for record in stored
            .iter()
            .filter(|record| student_ids.contains(&record.student_id))
            .filter(|record| within_range(record, range))
            .filter(|record| subject_matches(record, subject_id))
            .filter(|record| record.status == AttendanceStatus::Present)
        {
            *counts.entry(record.recorded_on.date_naive()).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(day, present)| DayCount { day, present })
            .collect())
    }

    async fn daily_marked_tallies(
        &self,
        student_ids: Vec<StudentId>,
        range: ReportRange,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<DayTally>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        let mut tallies: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for record in stored
            .iter()
            .filter(|record| student_ids.contains(&record.student_id))
            .filter(|record| within_range(record, range))
            .filter(|record| subject_matches(record, subject_id))
        {
            let tally = tallies.entry(record.recorded_on.date_naive()).or_insert((0, 0));
            tally.1 += 1;
            if record.status == AttendanceStatus::Present {
                tally.0 += 1;
            }
        }
        Ok(tallies
            .into_iter()
            .map(|(day, (present, marked))| DayTally {
                day,
                present,
                marked,
            })
            .collect())
    }

    async fn find_filtered(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        Ok(stored
            .iter()
            .filter(|record| {
                filter
                    .class_id
                    .is_none_or(|class| record.class_id == class)
            })
            .filter(|record| subject_matches(record, filter.subject_id))
            .filter(|record| filter.from.is_none_or(|from| record.recorded_on >= from))
            .filter(|record| filter.to.is_none_or(|to| record.recorded_on <= to))
            .cloned()
            .collect())
    }

    async fn find_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<StoredAttendance>, AttendanceStoreError> {
        let stored = self.records.lock().expect("store poisoned");
        Ok(stored
            .iter()
            .filter(|record| record.student_id == student_id)
            .cloned()
            .collect())
    }
}

/// Roster entry helper.
pub fn roster_entry(student_id: StudentId, name: &str, roll_no: &str) -> RosterEntry {
    RosterEntry {
        student_id,
        name: name.to_owned(),
        roll_no: roll_no.to_owned(),
    }
}

use backend::domain::ports::{
    ClassRepository, ClassRepositoryError, NewClass, NewStudent, NewSubject, NewTeacher,
    StudentRepository, StudentRepositoryError, StudentUpdate, SubjectRepository,
    SubjectRepositoryError, SubjectUpdate, TeacherRepository, TeacherRepositoryError,
    TeacherUpdate,
};
use backend::domain::{Class, ClassId, Student, Subject, Teacher, TeacherId};

/// In-memory class repository enforcing the unique-name invariant.
#[derive(Default)]
pub struct InMemoryClassRepository {
    classes: Mutex<Vec<Class>>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn create(&self, class: NewClass) -> Result<Class, ClassRepositoryError> {
        let mut classes = self.classes.lock().expect("repo poisoned");
        if classes.iter().any(|existing| existing.name == class.name) {
            return Err(ClassRepositoryError::duplicate_name(class.name));
        }
        let created = Class {
            id: class.id,
            name: class.name,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        classes.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut classes = self.classes.lock().expect("repo poisoned").clone();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(classes)
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, ClassRepositoryError> {
        let classes = self.classes.lock().expect("repo poisoned");
        Ok(classes.iter().find(|class| class.id == id).cloned())
    }

    async fn rename(
        &self,
        id: ClassId,
        name: String,
    ) -> Result<Option<Class>, ClassRepositoryError> {
        let mut classes = self.classes.lock().expect("repo poisoned");
        let Some(class) = classes.iter_mut().find(|class| class.id == id) else {
            return Ok(None);
        };
        class.name = name;
        class.updated_at = Utc::now();
        Ok(Some(class.clone()))
    }

    async fn delete(&self, id: ClassId) -> Result<bool, ClassRepositoryError> {
        let mut classes = self.classes.lock().expect("repo poisoned");
        let before = classes.len();
        classes.retain(|class| class.id != id);
        Ok(classes.len() < before)
    }
}

/// In-memory student repository enforcing the unique-roll-number invariant.
#[derive(Default)]
pub struct InMemoryStudentRepository {
    students: Mutex<Vec<Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, student: NewStudent) -> Result<Student, StudentRepositoryError> {
        let mut students = self.students.lock().expect("repo poisoned");
        if students
            .iter()
            .any(|existing| existing.roll_no == student.roll_no)
        {
            return Err(StudentRepositoryError::duplicate_roll_no(student.roll_no));
        }
        let created = Student {
            id: student.id,
            name: student.name,
            roll_no: student.roll_no,
            class_id: student.class_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        students.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut students = self.students.lock().expect("repo poisoned").clone();
        students.sort_by(|a, b| a.roll_no.cmp(&b.roll_no));
        Ok(students)
    }

    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let students = self.students.lock().expect("repo poisoned");
        Ok(students.iter().find(|student| student.id == id).cloned())
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut students: Vec<Student> = self
            .students
            .lock()
            .expect("repo poisoned")
            .iter()
            .filter(|student| student.class_id == class_id)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.roll_no.cmp(&b.roll_no));
        Ok(students)
    }

    async fn update(
        &self,
        id: StudentId,
        update: StudentUpdate,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut students = self.students.lock().expect("repo poisoned");
        let Some(student) = students.iter_mut().find(|student| student.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            student.name = name;
        }
        if let Some(roll_no) = update.roll_no {
            student.roll_no = roll_no;
        }
        if let Some(class_id) = update.class_id {
            student.class_id = class_id;
        }
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut students = self.students.lock().expect("repo poisoned");
        let before = students.len();
        students.retain(|student| student.id != id);
        Ok(students.len() < before)
    }
}

/// In-memory subject repository enforcing the unique-code invariant.
#[derive(Default)]
pub struct InMemorySubjectRepository {
    subjects: Mutex<Vec<Subject>>,
}

impl InMemorySubjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn create(&self, subject: NewSubject) -> Result<Subject, SubjectRepositoryError> {
        let mut subjects = self.subjects.lock().expect("repo poisoned");
        if subjects.iter().any(|existing| existing.code == subject.code) {
            return Err(SubjectRepositoryError::duplicate_code(subject.code));
        }
        let created = Subject {
            id: subject.id,
            name: subject.name,
            code: subject.code,
            teacher_ids: subject.teacher_ids,
            class_ids: subject.class_ids,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        subjects.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let mut subjects = self.subjects.lock().expect("repo poisoned").clone();
        subjects.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(subjects)
    }

    async fn find_by_id(
        &self,
        id: SubjectId,
    ) -> Result<Option<Subject>, SubjectRepositoryError> {
        let subjects = self.subjects.lock().expect("repo poisoned");
        Ok(subjects.iter().find(|subject| subject.id == id).cloned())
    }

    async fn update(
        &self,
        id: SubjectId,
        update: SubjectUpdate,
    ) -> Result<Option<Subject>, SubjectRepositoryError> {
        let mut subjects = self.subjects.lock().expect("repo poisoned");
        let Some(subject) = subjects.iter_mut().find(|subject| subject.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            subject.name = name;
        }
        if let Some(code) = update.code {
            subject.code = code;
        }
        if let Some(teacher_id) = update.teacher_id {
            subject.teacher_ids = vec![teacher_id];
        }
        if let Some(class_id) = update.class_id {
            subject.class_ids = vec![class_id];
        }
        subject.updated_at = Utc::now();
        Ok(Some(subject.clone()))
    }

    async fn delete(&self, id: SubjectId) -> Result<bool, SubjectRepositoryError> {
        let mut subjects = self.subjects.lock().expect("repo poisoned");
        let before = subjects.len();
        subjects.retain(|subject| subject.id != id);
        Ok(subjects.len() < before)
    }
}

/// In-memory teacher repository enforcing the unique-email invariant.
#[derive(Default)]
pub struct InMemoryTeacherRepository {
    teachers: Mutex<Vec<Teacher>>,
}

impl InMemoryTeacherRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeacherRepository for InMemoryTeacherRepository {
    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        if teachers
            .iter()
            .any(|existing| existing.email == teacher.email)
        {
            return Err(TeacherRepositoryError::duplicate_email(teacher.email));
        }
        let created = Teacher {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            password_hash: teacher.password_hash,
            role: teacher.role,
            class_ids: Vec::new(),
            subject_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        teachers.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: TeacherId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let teachers = self.teachers.lock().expect("repo poisoned");
        Ok(teachers.iter().find(|teacher| teacher.id == id).cloned())
    }

    async fn update(
        &self,
        id: TeacherId,
        update: TeacherUpdate,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        let Some(teacher) = teachers.iter_mut().find(|teacher| teacher.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            teacher.name = name;
        }
        if let Some(email) = update.email {
            teacher.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            teacher.password_hash = Some(password_hash);
        }
        teacher.updated_at = Utc::now();
        Ok(Some(teacher.clone()))
    }

    async fn delete(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        let before = teachers.len();
        teachers.retain(|teacher| teacher.id != id);
        Ok(teachers.len() < before)
    }

    async fn add_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        if let Some(teacher) = teachers.iter_mut().find(|teacher| teacher.id == teacher_id) {
            if !teacher.class_ids.contains(&class_id) {
                teacher.class_ids.push(class_id);
            }
        }
        Ok(())
    }

    async fn remove_class(
        &self,
        teacher_id: TeacherId,
        class_id: ClassId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        if let Some(teacher) = teachers.iter_mut().find(|teacher| teacher.id == teacher_id) {
            teacher.class_ids.retain(|id| *id != class_id);
        }
        Ok(())
    }

    async fn add_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        if let Some(teacher) = teachers.iter_mut().find(|teacher| teacher.id == teacher_id) {
            if !teacher.subject_ids.contains(&subject_id) {
                teacher.subject_ids.push(subject_id);
            }
        }
        Ok(())
    }

    async fn remove_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
    ) -> Result<(), TeacherRepositoryError> {
        let mut teachers = self.teachers.lock().expect("repo poisoned");
        if let Some(teacher) = teachers.iter_mut().find(|teacher| teacher.id == teacher_id) {
            teacher.subject_ids.retain(|id| *id != subject_id);
        }
        Ok(())
    }
}
