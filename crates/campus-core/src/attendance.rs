// ── Attendance ──
//
// A teacher picks one of their classes, the roster loads, everyone starts
// as present, and the sheet is submitted in one request.

use std::sync::Arc;

use campus_api::models::{AttendanceRecord, AttendanceStatus, AttendanceSubmission, SchoolClass};
use campus_api::{CampusClient, ClassId, StudentId};
use chrono::NaiveDate;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::fetch::{FetchOutcome, Resource};

/// Marks for one class on one day, in roster order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSheet {
    class: SchoolClass,
    date: NaiveDate,
    marks: IndexMap<StudentId, AttendanceStatus>,
}

impl AttendanceSheet {
    pub fn new(class: SchoolClass, date: NaiveDate) -> Self {
        let marks = class
            .students
            .iter()
            .map(|s| (s.id, AttendanceStatus::default()))
            .collect();
        Self { class, date, marks }
    }

    pub fn class(&self) -> &SchoolClass {
        &self.class
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn status(&self, student: StudentId) -> Option<AttendanceStatus> {
        self.marks.get(&student).copied()
    }

    pub fn mark(&mut self, student: StudentId, status: AttendanceStatus) -> Result<(), CoreError> {
        let slot = self
            .marks
            .get_mut(&student)
            .ok_or_else(|| CoreError::invalid(format!("Student {student} is not in this class")))?;
        *slot = status;
        Ok(())
    }

    /// Mark every student with the same status.
    pub fn mark_all(&mut self, status: AttendanceStatus) {
        for slot in self.marks.values_mut() {
            *slot = status;
        }
    }

    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.marks.values().filter(|s| **s == status).count()
    }

    /// Roster rows with their current mark.
    pub fn rows(&self) -> impl Iterator<Item = (&str, StudentId, AttendanceStatus)> {
        self.class.students.iter().filter_map(|s| {
            self.marks
                .get(&s.id)
                .map(|status| (s.user.name.as_str(), s.id, *status))
        })
    }

    pub fn submission(&self) -> AttendanceSubmission {
        AttendanceSubmission {
            class_id: self.class.id,
            date: self.date,
            records: self
                .marks
                .iter()
                .map(|(student_id, status)| AttendanceRecord {
                    student_id: *student_id,
                    status: *status,
                })
                .collect(),
        }
    }
}

/// The teacher's classes and the sheet being filled in.
pub struct AttendanceDesk {
    client: Arc<CampusClient>,
    classes: Resource<Vec<SchoolClass>>,
    sheet: Option<AttendanceSheet>,
}

impl AttendanceDesk {
    pub fn new(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        let loader_client = Arc::clone(&client);
        let classes = Resource::new(Vec::new(), owner.clone(), move || {
            let client = Arc::clone(&loader_client);
            async move { client.my_classes().await.map_err(CoreError::from) }
        });
        Self {
            client,
            classes,
            sheet: None,
        }
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.classes.refetch().await
    }

    pub fn classes(&self) -> &Resource<Vec<SchoolClass>> {
        &self.classes
    }

    pub fn sheet(&self) -> Option<&AttendanceSheet> {
        self.sheet.as_ref()
    }

    pub fn sheet_mut(&mut self) -> Option<&mut AttendanceSheet> {
        self.sheet.as_mut()
    }

    /// Load the roster of `class` and start a fresh sheet for `date`.
    pub async fn open_class(&mut self, class: ClassId, date: NaiveDate) -> Result<(), CoreError> {
        let roster = self.client.get_class(class).await?;
        info!(class = %class, students = roster.students.len(), "attendance sheet opened");
        self.sheet = Some(AttendanceSheet::new(roster, date));
        Ok(())
    }

    pub async fn submit(&self) -> Result<(), CoreError> {
        let sheet = self
            .sheet
            .as_ref()
            .ok_or_else(|| CoreError::invalid("Please select a class"))?;
        let body = sheet.submission();
        self.client.submit_attendance(&body).await.map_err(|e| {
            let err = CoreError::from(e).in_action("Failed to save attendance");
            warn!(error = %err, "attendance submit failed");
            err
        })?;
        info!(class = %body.class_id, date = %body.date, records = body.records.len(), "attendance saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_api::models::{StudentRecord, UserRef};
    use pretty_assertions::assert_eq;

    use super::*;

    fn class() -> SchoolClass {
        let student = |id: u64, name: &str| StudentRecord {
            id: StudentId(id),
            user: UserRef {
                id: None,
                name: name.into(),
                email: String::new(),
            },
            class_id: Some(ClassId::from(3)),
            school_class: None,
            grades_avg_score: None,
        };
        SchoolClass {
            id: ClassId::from(3),
            name: "9th".into(),
            section: Some("A".into()),
            students: vec![student(11, "Ada"), student(12, "Alan")],
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    #[test]
    fn everyone_starts_present() {
        let sheet = AttendanceSheet::new(class(), day());
        assert_eq!(sheet.count(AttendanceStatus::Present), 2);
        assert_eq!(sheet.status(StudentId(12)), Some(AttendanceStatus::Present));
    }

    #[test]
    fn marks_flow_into_submission_in_roster_order() {
        let mut sheet = AttendanceSheet::new(class(), day());
        sheet.mark(StudentId(12), AttendanceStatus::Late).unwrap();
        assert!(sheet.mark(StudentId(99), AttendanceStatus::Absent).is_err());

        let body = sheet.submission();
        assert_eq!(body.class_id, ClassId::from(3));
        assert_eq!(
            body.records,
            vec![
                AttendanceRecord {
                    student_id: StudentId(11),
                    status: AttendanceStatus::Present,
                },
                AttendanceRecord {
                    student_id: StudentId(12),
                    status: AttendanceStatus::Late,
                },
            ]
        );
    }

    #[test]
    fn mark_all_overrides_everyone() {
        let mut sheet = AttendanceSheet::new(class(), day());
        sheet.mark_all(AttendanceStatus::Excused);
        assert_eq!(sheet.count(AttendanceStatus::Excused), 2);
        let names: Vec<&str> = sheet.rows().map(|(name, _, _)| name).collect();
        assert_eq!(names, vec!["Ada", "Alan"]);
    }
}
