// Academic structure endpoints
//
// Grades are addressed by name (there is no grade id), sections and
// subjects by id. Schedules are scoped to a section via `class_id`.

use serde::Serialize;
use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::ids::{GradeKey, ScheduleId, SectionId, SubjectId};
use crate::models::{Grade, NewScheduleEntry, ScheduleEntry};

impl CampusClient {
    // ── Hierarchy ────────────────────────────────────────────────────

    /// The full grade → sections/subjects → students tree.
    ///
    /// `GET /academic-hierarchy`
    pub async fn academic_hierarchy(&self) -> Result<Vec<Grade>, Error> {
        self.get("academic-hierarchy").await
    }

    // ── Grades ───────────────────────────────────────────────────────

    /// `POST /academic/grade` with `{name}`
    pub async fn create_grade(&self, name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        debug!(name, "creating grade");
        self.post_no_response("academic/grade", &Body { name }).await
    }

    /// `PUT /academic/grade` with `{old_name, new_name}`
    pub async fn rename_grade(&self, grade: &GradeKey, new_name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            old_name: &'a str,
            new_name: &'a str,
        }

        debug!(%grade, new_name, "renaming grade");
        self.put_no_response(
            "academic/grade",
            &Body {
                old_name: grade.as_str(),
                new_name,
            },
        )
        .await
    }

    /// `DELETE /academic/grade` with `{name}` in the body
    pub async fn delete_grade(&self, grade: &GradeKey) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        debug!(%grade, "deleting grade");
        self.delete_with_body(
            "academic/grade",
            &Body {
                name: grade.as_str(),
            },
        )
        .await
    }

    // ── Sections ─────────────────────────────────────────────────────

    /// `POST /academic/section` with `{grade_name, section}`
    pub async fn create_section(&self, grade: &GradeKey, section: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            grade_name: &'a str,
            section: &'a str,
        }

        debug!(%grade, section, "creating section");
        self.post_no_response(
            "academic/section",
            &Body {
                grade_name: grade.as_str(),
                section,
            },
        )
        .await
    }

    /// `PUT /academic/section/{id}` with `{name}`
    pub async fn rename_section(&self, id: SectionId, name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        debug!(%id, name, "renaming section");
        self.put_no_response(&format!("academic/section/{id}"), &Body { name })
            .await
    }

    /// `DELETE /academic/section/{id}`
    pub async fn delete_section(&self, id: SectionId) -> Result<(), Error> {
        debug!(%id, "deleting section");
        self.delete(&format!("academic/section/{id}")).await
    }

    // ── Grade subjects ───────────────────────────────────────────────

    /// `POST /academic/grade-subject` with `{grade_name, subject_name, subject_code}`
    pub async fn create_grade_subject(
        &self,
        grade: &GradeKey,
        name: &str,
        code: &str,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            grade_name: &'a str,
            subject_name: &'a str,
            subject_code: &'a str,
        }

        debug!(%grade, name, code, "adding subject to grade");
        self.post_no_response(
            "academic/grade-subject",
            &Body {
                grade_name: grade.as_str(),
                subject_name: name,
                subject_code: code,
            },
        )
        .await
    }

    /// `PUT /academic/subject/{id}` with `{name}`
    pub async fn rename_subject(&self, id: SubjectId, name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        debug!(%id, name, "renaming subject");
        self.put_no_response(&format!("academic/subject/{id}"), &Body { name })
            .await
    }

    /// Detach a subject from a grade.
    ///
    /// `DELETE /academic/grade-subject` with `{grade_name, subject_id}` in the body
    pub async fn delete_grade_subject(
        &self,
        grade: &GradeKey,
        subject: SubjectId,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            grade_name: &'a str,
            subject_id: SubjectId,
        }

        debug!(%grade, %subject, "removing subject from grade");
        self.delete_with_body(
            "academic/grade-subject",
            &Body {
                grade_name: grade.as_str(),
                subject_id: subject,
            },
        )
        .await
    }

    // ── Schedules ────────────────────────────────────────────────────

    /// `GET /schedules?class_id={section}`
    pub async fn list_schedules(&self, section: SectionId) -> Result<Vec<ScheduleEntry>, Error> {
        self.get_with_params("schedules", &[("class_id", section.to_string())])
            .await
    }

    /// `POST /schedules`
    pub async fn create_schedule(&self, entry: &NewScheduleEntry) -> Result<(), Error> {
        debug!(
            section = %entry.class_id,
            day = %entry.day_of_week,
            start = %entry.start_time,
            "creating schedule entry"
        );
        self.post_no_response("schedules", entry).await
    }

    /// `DELETE /schedules/{id}`
    pub async fn delete_schedule(&self, id: ScheduleId) -> Result<(), Error> {
        debug!(%id, "deleting schedule entry");
        self.delete(&format!("schedules/{id}")).await
    }
}
