use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ids::{AnnouncementId, ClassId, FeedbackId, StudentId};
use crate::models::UserRef;

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ── Feedback ────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FeedbackKind {
    #[default]
    Feedback,
    Bug,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: FeedbackKind,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Feedback {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    pub fn author(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.name.as_str())
    }
}

// ── Announcements ───────────────────────────────────────────────────

/// Who an announcement is broadcast to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AnnouncementAudience {
    #[default]
    All,
    Teacher,
    Student,
    Parent,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub target_role: AnnouncementAudience,
    #[serde(default)]
    pub target_class_id: Option<ClassId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Announcement {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    pub fn author(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("System Admin")
    }
}

/// Body of `POST /announcements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub message: String,
    pub target_role: AnnouncementAudience,
    pub target_class_id: Option<ClassId>,
}

// ── Attendance ──────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
}

/// Body of `POST /attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSubmission {
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn feedback_type_field_maps_to_kind() {
        let item: Feedback = serde_json::from_value(json!({
            "id": 9,
            "message": "Projector is broken",
            "type": "bug",
            "created_at": "2024-09-02T08:15:00.000000Z"
        }))
        .unwrap();
        assert_eq!(item.kind, FeedbackKind::Bug);
        assert!(!item.is_read);
        assert!(item.created_at().is_some());
    }

    #[test]
    fn announcement_author_falls_back() {
        let ann: Announcement = serde_json::from_value(json!({
            "id": 1, "title": "Exams", "message": "Start Monday"
        }))
        .unwrap();
        assert_eq!(ann.target_role, AnnouncementAudience::All);
        assert_eq!(ann.author(), "System Admin");
    }

    #[test]
    fn attendance_date_serializes_as_iso_day() {
        let body = AttendanceSubmission {
            class_id: ClassId::from(3),
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            records: vec![AttendanceRecord {
                student_id: StudentId(11),
                status: AttendanceStatus::Late,
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "class_id": 3,
                "date": "2024-09-02",
                "records": [{ "student_id": 11, "status": "late" }]
            })
        );
    }
}
