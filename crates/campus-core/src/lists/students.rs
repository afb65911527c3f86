use std::convert::Infallible;
use std::str::FromStr;

use campus_api::models::{StudentPayload, StudentRecord};
use campus_api::{CampusClient, ClassId, StudentId};

use super::page::{Crud, ListItem, optional_password, require_field};
use crate::error::CoreError;

impl ListItem for StudentRecord {
    type Id = StudentId;

    fn id(&self) -> StudentId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user.name.as_str(), self.user.email.as_str()]
    }
}

impl Crud for StudentRecord {
    type Payload = StudentPayload;

    async fn list(client: &CampusClient) -> Result<Vec<Self>, campus_api::Error> {
        client.list_students().await
    }

    async fn create(client: &CampusClient, payload: &StudentPayload) -> Result<(), campus_api::Error> {
        client.create_student(payload).await
    }

    async fn update(
        client: &CampusClient,
        id: StudentId,
        payload: &StudentPayload,
    ) -> Result<(), campus_api::Error> {
        client.update_student(id, payload).await
    }

    async fn delete(client: &CampusClient, id: StudentId) -> Result<(), campus_api::Error> {
        client.delete_student(id).await
    }
}

// ── Grade filter ─────────────────────────────────────────────────────

/// Class filter tab: `All` or one class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GradeFilter {
    #[default]
    All,
    Named(String),
}

impl GradeFilter {
    pub fn accepts(&self, student: &StudentRecord) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => student.class_name() == Some(name.as_str()),
        }
    }
}

impl FromStr for GradeFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Named(s.to_owned()))
        }
    }
}

/// Students matching both the search string and the class filter.
pub fn filter_students<'a>(
    students: &'a [StudentRecord],
    search: &str,
    grade: &GradeFilter,
) -> Vec<&'a StudentRecord> {
    students
        .iter()
        .filter(|s| s.matches(search) && grade.accepts(s))
        .collect()
}

/// Distinct class names in first-seen order, for the filter tabs.
pub fn class_names(students: &[StudentRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in students.iter().filter_map(StudentRecord::class_name) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    names
}

/// Highest average first; a missing score counts as 0.
pub fn top_performers(students: &[StudentRecord], limit: usize) -> Vec<&StudentRecord> {
    let mut ranked: Vec<&StudentRecord> = students.iter().collect();
    ranked.sort_by(|a, b| b.average().total_cmp(&a.average()));
    ranked.truncate(limit);
    ranked
}

// ── Form ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub class_id: Option<ClassId>,
}

impl StudentForm {
    pub fn from_record(student: &StudentRecord) -> Self {
        Self {
            name: student.user.name.clone(),
            email: student.user.email.clone(),
            password: String::new(),
            class_id: student
                .class_id
                .or_else(|| student.school_class.as_ref().and_then(|c| c.id)),
        }
    }

    pub fn payload(&self, creating: bool) -> Result<StudentPayload, CoreError> {
        let name = require_field(&self.name, "Name")?;
        let email = require_field(&self.email, "Email")?;
        if creating && self.password.is_empty() {
            return Err(CoreError::invalid("Password is required"));
        }
        Ok(StudentPayload {
            name,
            email,
            password: optional_password(&self.password),
            class_id: self.class_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_api::models::{ClassRef, UserRef};
    use pretty_assertions::assert_eq;

    use super::*;

    fn student(id: u64, name: &str, class: Option<&str>, score: Option<f64>) -> StudentRecord {
        StudentRecord {
            id: StudentId(id),
            user: UserRef {
                id: None,
                name: name.into(),
                email: format!("{}@school.test", name.to_lowercase()),
            },
            class_id: None,
            school_class: class.map(|c| ClassRef {
                id: Some(ClassId::from(id + 100)),
                name: c.into(),
                section: None,
            }),
            grades_avg_score: score,
        }
    }

    fn roster() -> Vec<StudentRecord> {
        vec![
            student(1, "Ada", Some("9th"), Some(88.5)),
            student(2, "Alan", Some("10th"), None),
            student(3, "Grace", Some("9th"), Some(93.0)),
            student(4, "Linus", None, Some(71.0)),
        ]
    }

    #[test]
    fn grade_filter_and_search_combine() {
        let students = roster();
        let ninth: GradeFilter = "9th".parse().unwrap();
        let names: Vec<&str> = filter_students(&students, "", &ninth)
            .iter()
            .map(|s| s.user.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);

        let all: GradeFilter = "All".parse().unwrap();
        assert_eq!(all, GradeFilter::All);
        assert_eq!(filter_students(&students, "AL", &all).len(), 1);
    }

    #[test]
    fn ranking_treats_missing_scores_as_zero() {
        let students = roster();
        let ids: Vec<u64> = top_performers(&students, 10)
            .iter()
            .map(|s| s.id.get())
            .collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
        assert_eq!(top_performers(&students, 2).len(), 2);
    }

    #[test]
    fn class_names_are_distinct() {
        assert_eq!(class_names(&roster()), vec!["9th", "10th"]);
    }

    #[test]
    fn form_prefers_class_id_then_nested_class() {
        let form = StudentForm::from_record(&student(1, "Ada", Some("9th"), None));
        assert_eq!(form.class_id, Some(ClassId::from(101)));
        let payload = form.payload(false).unwrap();
        assert_eq!(payload.password, None);
    }
}
