use campus_api::models::{
    AssignmentPayload, CatalogSubject, SchoolClass, TeacherPayload, TeacherRecord,
};
use campus_api::{CampusClient, ClassId, SubjectId, TeacherId};

use super::page::{Crud, ListItem, optional_password, require_field};
use crate::error::CoreError;

impl ListItem for TeacherRecord {
    type Id = TeacherId;

    fn id(&self) -> TeacherId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user.name.as_str(), self.user.email.as_str()]
    }
}

impl Crud for TeacherRecord {
    type Payload = TeacherPayload;

    async fn list(client: &CampusClient) -> Result<Vec<Self>, campus_api::Error> {
        client.list_teachers().await
    }

    async fn create(client: &CampusClient, payload: &TeacherPayload) -> Result<(), campus_api::Error> {
        client.create_teacher(payload).await
    }

    async fn update(
        client: &CampusClient,
        id: TeacherId,
        payload: &TeacherPayload,
    ) -> Result<(), campus_api::Error> {
        client.update_teacher(id, payload).await
    }

    async fn delete(client: &CampusClient, id: TeacherId) -> Result<(), campus_api::Error> {
        client.delete_teacher(id).await
    }
}

/// One class/subject pair on the teacher form. Either side may be unset
/// while the user is still filling it in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentRow {
    pub class_id: Option<ClassId>,
    pub subject_id: Option<SubjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub assignments: Vec<AssignmentRow>,
}

impl Default for TeacherForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            assignments: vec![AssignmentRow::default()],
        }
    }
}

impl TeacherForm {
    /// Seed the form from an existing record; password stays blank.
    pub fn from_record(teacher: &TeacherRecord) -> Self {
        let mut assignments: Vec<AssignmentRow> = teacher
            .assignments
            .iter()
            .map(|a| AssignmentRow {
                class_id: Some(a.class_id),
                subject_id: Some(a.subject_id),
            })
            .collect();
        if assignments.is_empty() {
            assignments.push(AssignmentRow::default());
        }
        Self {
            name: teacher.user.name.clone(),
            email: teacher.user.email.clone(),
            password: String::new(),
            assignments,
        }
    }

    pub fn add_row(&mut self) {
        self.assignments.push(AssignmentRow::default());
    }

    pub fn remove_row(&mut self, index: usize) {
        if index < self.assignments.len() {
            self.assignments.remove(index);
        }
    }

    /// Build the request body. Only rows with both ids set are sent.
    pub fn payload(&self, creating: bool) -> Result<TeacherPayload, CoreError> {
        let name = require_field(&self.name, "Name")?;
        let email = require_field(&self.email, "Email")?;
        if creating && self.password.is_empty() {
            return Err(CoreError::invalid("Password is required"));
        }
        let assignments = self
            .assignments
            .iter()
            .filter_map(|row| match (row.class_id, row.subject_id) {
                (Some(class_id), Some(subject_id)) => Some(AssignmentPayload {
                    class_id,
                    subject_id,
                }),
                _ => None,
            })
            .collect();
        Ok(TeacherPayload {
            name,
            email,
            password: optional_password(&self.password),
            assignments,
        })
    }
}

/// Choices for the assignment pickers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentOptions {
    pub classes: Vec<SchoolClass>,
    pub subjects: Vec<CatalogSubject>,
}

impl AssignmentOptions {
    /// Fetch classes and subjects concurrently.
    pub async fn load(client: &CampusClient) -> Result<Self, CoreError> {
        let (classes, subjects) = tokio::try_join!(client.list_classes(), client.list_subjects())?;
        Ok(Self { classes, subjects })
    }
}
