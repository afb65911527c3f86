use std::sync::Arc;

use campus_api::models::{ParentPayload, ParentRecord, StudentRecord};
use campus_api::{CampusClient, ParentId, StudentId};
use tokio_util::sync::CancellationToken;

use super::page::{Crud, ListItem, ListPage, optional_password, require_field};
use crate::error::CoreError;
use crate::fetch::{FetchOutcome, Resource};

impl ListItem for ParentRecord {
    type Id = ParentId;

    fn id(&self) -> ParentId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user.name.as_str(), self.user.email.as_str()]
    }
}

impl Crud for ParentRecord {
    type Payload = ParentPayload;

    async fn list(client: &CampusClient) -> Result<Vec<Self>, campus_api::Error> {
        client.list_parents().await
    }

    async fn create(client: &CampusClient, payload: &ParentPayload) -> Result<(), campus_api::Error> {
        client.create_parent(payload).await
    }

    async fn update(
        client: &CampusClient,
        id: ParentId,
        payload: &ParentPayload,
    ) -> Result<(), campus_api::Error> {
        client.update_parent(id, payload).await
    }

    async fn delete(client: &CampusClient, id: ParentId) -> Result<(), campus_api::Error> {
        client.delete_parent(id).await
    }
}

/// Parents list plus the student roster used by the child picker.
pub struct ParentsPage {
    list: ListPage<ParentRecord>,
    students: Resource<Vec<StudentRecord>>,
}

impl ParentsPage {
    pub fn new(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        let roster_client = Arc::clone(&client);
        let students = Resource::new(Vec::new(), owner.clone(), move || {
            let client = Arc::clone(&roster_client);
            async move { client.list_students().await.map_err(CoreError::from) }
        });
        Self {
            list: ListPage::crud(client, owner),
            students,
        }
    }

    /// Fetch parents and students concurrently.
    pub async fn refresh(&self) -> (FetchOutcome, FetchOutcome) {
        tokio::join!(self.list.refresh(), self.students.refetch())
    }

    pub fn list(&self) -> &ListPage<ParentRecord> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListPage<ParentRecord> {
        &mut self.list
    }

    pub fn students(&self) -> &Resource<Vec<StudentRecord>> {
        &self.students
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub student_ids: Vec<StudentId>,
}

impl ParentForm {
    pub fn from_record(parent: &ParentRecord) -> Self {
        Self {
            name: parent.user.name.clone(),
            email: parent.user.email.clone(),
            password: String::new(),
            student_ids: parent.students.iter().map(|s| s.id).collect(),
        }
    }

    /// Link or unlink a child.
    pub fn toggle_student(&mut self, id: StudentId) {
        if let Some(pos) = self.student_ids.iter().position(|s| *s == id) {
            self.student_ids.remove(pos);
        } else {
            self.student_ids.push(id);
        }
    }

    pub fn is_linked(&self, id: StudentId) -> bool {
        self.student_ids.contains(&id)
    }

    pub fn payload(&self, creating: bool) -> Result<ParentPayload, CoreError> {
        let name = require_field(&self.name, "Name")?;
        let email = require_field(&self.email, "Email")?;
        if creating && self.password.is_empty() {
            return Err(CoreError::invalid("Password is required"));
        }
        Ok(ParentPayload {
            name,
            email,
            password: optional_password(&self.password),
            student_ids: self.student_ids.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toggling_links_and_unlinks() {
        let mut form = ParentForm {
            name: "Pat".into(),
            email: "pat@home.test".into(),
            password: "pw".into(),
            ..ParentForm::default()
        };
        form.toggle_student(StudentId(1));
        form.toggle_student(StudentId(2));
        form.toggle_student(StudentId(1));
        assert!(!form.is_linked(StudentId(1)));
        assert_eq!(form.payload(true).unwrap().student_ids, vec![StudentId(2)]);
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = ParentForm {
            email: "pat@home.test".into(),
            ..ParentForm::default()
        };
        let err = form.payload(false).unwrap_err();
        assert_eq!(err.user_message(), "Name is required");
    }
}
