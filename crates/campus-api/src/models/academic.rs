use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ids::{GradeKey, ScheduleId, SectionId, StudentId, SubjectId};

// ── Hierarchy ───────────────────────────────────────────────────────

/// One node of `GET /academic-hierarchy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// Unique grade name; the backend's only grade identifier.
    pub name: GradeKey,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Grade {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    #[serde(default)]
    pub students_count: u32,
    #[serde(default)]
    pub students: Vec<SectionStudent>,
}

/// Student summary embedded in a hierarchy section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStudent {
    pub id: StudentId,
    #[serde(default)]
    pub name: String,
}

impl SectionStudent {
    /// Roster badge, e.g. `S007`.
    pub fn badge(&self) -> String {
        format!("S{:03}", self.id.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Schedules ───────────────────────────────────────────────────────

/// School days of the weekly timetable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub fn short(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    #[serde(default)]
    pub id: Option<SubjectId>,
    pub name: String,
}

/// A weekly recurring slot from `GET /schedules?class_id=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub subject: Option<SubjectRef>,
    pub day_of_week: Weekday,
    /// `HH:MM:SS` as stored by the backend.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub room: Option<String>,
    pub class_id: SectionId,
}

impl ScheduleEntry {
    pub fn subject_name(&self) -> &str {
        self.subject.as_ref().map_or("Unknown subject", |s| s.name.as_str())
    }

    /// `HH:MM` without seconds.
    pub fn start_hm(&self) -> &str {
        self.start_time.get(..5).unwrap_or(&self.start_time)
    }

    pub fn end_hm(&self) -> &str {
        self.end_time.get(..5).unwrap_or(&self.end_time)
    }

    pub fn room_label(&self) -> &str {
        match self.room.as_deref() {
            Some(room) if !room.is_empty() => room,
            _ => "No Room",
        }
    }
}

/// Body of `POST /schedules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub subject_id: SubjectId,
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub class_id: SectionId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn grade_without_children_deserializes() {
        let grade: Grade = serde_json::from_value(json!({ "name": "10th Grade" })).unwrap();
        assert_eq!(grade.name.as_str(), "10th Grade");
        assert!(grade.sections.is_empty());
        assert!(grade.subjects.is_empty());
    }

    #[test]
    fn schedule_entry_helpers() {
        let entry: ScheduleEntry = serde_json::from_value(json!({
            "id": 1,
            "subject_id": 3,
            "subject": { "name": "Physics" },
            "day_of_week": "Monday",
            "start_time": "08:00:00",
            "end_time": "09:30:00",
            "room": "",
            "class_id": 12
        }))
        .unwrap();

        assert_eq!(entry.day_of_week, Weekday::Monday);
        assert_eq!(entry.start_hm(), "08:00");
        assert_eq!(entry.end_hm(), "09:30");
        assert_eq!(entry.room_label(), "No Room");
        assert_eq!(entry.subject_name(), "Physics");
    }

    #[test]
    fn weekday_parses_case_insensitively() {
        assert_eq!("friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("Saturday".parse::<Weekday>().is_err());
    }

    #[test]
    fn student_badge_is_zero_padded() {
        let s = SectionStudent {
            id: StudentId(7),
            name: "Ada".into(),
        };
        assert_eq!(s.badge(), "S007");
    }
}
