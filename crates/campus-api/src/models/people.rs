use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, ParentId, StudentId, SubjectId, TeacherId};
use crate::models::UserRef;

// ── Classes & catalog ───────────────────────────────────────────────

/// A class (grade + section) from `/classes` or `/teacher/classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    /// Present on `GET /classes/{id}`.
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

impl SchoolClass {
    pub fn label(&self) -> String {
        match self.section.as_deref() {
            Some(section) if !section.is_empty() => format!("{} {section}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Class relation nested in student and assignment records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    #[serde(default)]
    pub id: Option<ClassId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
}

/// Flat subject catalog entry from `GET /subjects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSubject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Teachers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub subject: Option<CatalogSubject>,
    #[serde(default)]
    pub school_class: Option<ClassRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: TeacherId,
    #[serde(default)]
    pub user: UserRef,
    #[serde(default)]
    pub assignments: Vec<TeacherAssignment>,
}

impl TeacherRecord {
    /// Distinct subject names across all assignments, in first-seen order.
    pub fn subject_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self
            .assignments
            .iter()
            .filter_map(|a| a.subject.as_ref().map(|s| s.name.as_str()))
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Distinct `"<grade> <section>"` labels across all assignments.
    pub fn class_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for class in self.assignments.iter().filter_map(|a| a.school_class.as_ref()) {
            let label = match class.section.as_deref() {
                Some(section) => format!("{} {section}", class.name),
                None => class.name.clone(),
            };
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPayload {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
}

/// Body of `POST /teachers` and `PUT /teachers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub assignments: Vec<AssignmentPayload>,
}

// ── Students ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    #[serde(default)]
    pub user: UserRef,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default)]
    pub school_class: Option<ClassRef>,
    #[serde(default)]
    pub grades_avg_score: Option<f64>,
}

impl StudentRecord {
    pub fn class_name(&self) -> Option<&str> {
        self.school_class.as_ref().map(|c| c.name.as_str())
    }

    pub fn average(&self) -> f64 {
        self.grades_avg_score.unwrap_or(0.0)
    }
}

/// Body of `POST /students` and `PUT /students/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub class_id: Option<ClassId>,
}

// ── Parents ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    pub id: ParentId,
    #[serde(default)]
    pub user: UserRef,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

/// Body of `POST /parents` and `PUT /parents/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub student_ids: Vec<StudentId>,
}
