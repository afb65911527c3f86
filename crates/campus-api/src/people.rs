// Teacher, student and parent endpoints
//
// Plain REST resources: list, get, create, update, delete. Mutations
// return nothing useful; callers re-fetch the list afterwards.

use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::ids::{ParentId, StudentId, TeacherId};
use crate::models::{
    ParentPayload, ParentRecord, StudentPayload, StudentRecord, TeacherPayload, TeacherRecord,
};

impl CampusClient {
    // ── Teachers ─────────────────────────────────────────────────────

    pub async fn list_teachers(&self) -> Result<Vec<TeacherRecord>, Error> {
        self.get("teachers").await
    }

    pub async fn get_teacher(&self, id: TeacherId) -> Result<TeacherRecord, Error> {
        self.get(&format!("teachers/{id}")).await
    }

    pub async fn create_teacher(&self, body: &TeacherPayload) -> Result<(), Error> {
        debug!(email = %body.email, assignments = body.assignments.len(), "creating teacher");
        self.post_no_response("teachers", body).await
    }

    pub async fn update_teacher(&self, id: TeacherId, body: &TeacherPayload) -> Result<(), Error> {
        debug!(%id, "updating teacher");
        self.put_no_response(&format!("teachers/{id}"), body).await
    }

    pub async fn delete_teacher(&self, id: TeacherId) -> Result<(), Error> {
        debug!(%id, "deleting teacher");
        self.delete(&format!("teachers/{id}")).await
    }

    // ── Students ─────────────────────────────────────────────────────

    pub async fn list_students(&self) -> Result<Vec<StudentRecord>, Error> {
        self.get("students").await
    }

    pub async fn get_student(&self, id: StudentId) -> Result<StudentRecord, Error> {
        self.get(&format!("students/{id}")).await
    }

    pub async fn create_student(&self, body: &StudentPayload) -> Result<(), Error> {
        debug!(email = %body.email, "creating student");
        self.post_no_response("students", body).await
    }

    pub async fn update_student(&self, id: StudentId, body: &StudentPayload) -> Result<(), Error> {
        debug!(%id, "updating student");
        self.put_no_response(&format!("students/{id}"), body).await
    }

    pub async fn delete_student(&self, id: StudentId) -> Result<(), Error> {
        debug!(%id, "deleting student");
        self.delete(&format!("students/{id}")).await
    }

    // ── Parents ──────────────────────────────────────────────────────

    pub async fn list_parents(&self) -> Result<Vec<ParentRecord>, Error> {
        self.get("parents").await
    }

    pub async fn get_parent(&self, id: ParentId) -> Result<ParentRecord, Error> {
        self.get(&format!("parents/{id}")).await
    }

    pub async fn create_parent(&self, body: &ParentPayload) -> Result<(), Error> {
        debug!(email = %body.email, children = body.student_ids.len(), "creating parent");
        self.post_no_response("parents", body).await
    }

    pub async fn update_parent(&self, id: ParentId, body: &ParentPayload) -> Result<(), Error> {
        debug!(%id, "updating parent");
        self.put_no_response(&format!("parents/{id}"), body).await
    }

    pub async fn delete_parent(&self, id: ParentId) -> Result<(), Error> {
        debug!(%id, "deleting parent");
        self.delete(&format!("parents/{id}")).await
    }
}
