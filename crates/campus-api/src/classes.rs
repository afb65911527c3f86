// Class, subject catalog and attendance endpoints

use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::ids::ClassId;
use crate::models::{AttendanceSubmission, CatalogSubject, SchoolClass};

impl CampusClient {
    /// `GET /classes`
    pub async fn list_classes(&self) -> Result<Vec<SchoolClass>, Error> {
        self.get("classes").await
    }

    /// A single class with its enrolled students. `GET /classes/{id}`
    pub async fn get_class(&self, id: ClassId) -> Result<SchoolClass, Error> {
        self.get(&format!("classes/{id}")).await
    }

    /// Classes the authenticated teacher is assigned to. `GET /teacher/classes`
    pub async fn my_classes(&self) -> Result<Vec<SchoolClass>, Error> {
        self.get("teacher/classes").await
    }

    /// `GET /subjects`
    pub async fn list_subjects(&self) -> Result<Vec<CatalogSubject>, Error> {
        self.get("subjects").await
    }

    /// `POST /attendance`
    pub async fn submit_attendance(&self, body: &AttendanceSubmission) -> Result<(), Error> {
        debug!(
            class = %body.class_id,
            date = %body.date,
            records = body.records.len(),
            "submitting attendance"
        );
        self.post_no_response("attendance", body).await
    }
}
