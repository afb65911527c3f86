// ── Weekly schedule grid ──
//
// Five fixed slots by Monday..Friday. A cell shows the first entry whose
// weekday matches and whose start time begins with the slot start.

use campus_api::models::{NewScheduleEntry, ScheduleEntry, Weekday};
use campus_api::{SectionId, SubjectId};
use chrono::NaiveTime;
use strum::IntoEnumIterator;

use crate::error::CoreError;

pub const SELECT_SUBJECT: &str = "Please select a subject";
pub const SELECT_GRADE_AND_SECTION: &str = "Please select a grade and section";
pub const SLOT_TAKEN: &str = "That timeslot is already taken";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: &'static str,
    pub end: &'static str,
}

impl Slot {
    /// Row label, e.g. `08:00 - 09:30`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

pub const SLOTS: [Slot; 5] = [
    Slot { start: "08:00", end: "09:30" },
    Slot { start: "09:45", end: "11:15" },
    Slot { start: "11:30", end: "13:00" },
    Slot { start: "14:00", end: "15:30" },
    Slot { start: "15:45", end: "17:15" },
];

/// Background/foreground pair for a subject chip, as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectColor {
    pub background: &'static str,
    pub text: &'static str,
}

pub const PALETTE: [SubjectColor; 5] = [
    SubjectColor { background: "#EEF2FF", text: "#4F46E5" },
    SubjectColor { background: "#ECFDF5", text: "#059669" },
    SubjectColor { background: "#FFFBEB", text: "#D97706" },
    SubjectColor { background: "#FEF2F2", text: "#DC2626" },
    SubjectColor { background: "#F5F3FF", text: "#7C3AED" },
];

const PALETTE_LEN: u64 = 5;

pub fn palette_index(subject: SubjectId) -> usize {
    usize::try_from(subject.get() % PALETTE_LEN).unwrap_or(0)
}

pub fn subject_color(subject: SubjectId) -> SubjectColor {
    PALETTE[palette_index(subject)]
}

// ── Grid lookup ──────────────────────────────────────────────────────

/// Read-only view of a section's schedule laid out on [`SLOTS`].
#[derive(Debug, Clone, Copy)]
pub struct ScheduleGrid<'a> {
    entries: &'a [ScheduleEntry],
}

impl<'a> ScheduleGrid<'a> {
    pub fn new(entries: &'a [ScheduleEntry]) -> Self {
        Self { entries }
    }

    pub fn cell(&self, day: Weekday, slot: &Slot) -> Option<&'a ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.day_of_week == day && e.start_time.starts_with(slot.start))
    }

    /// One row per slot, one column per weekday.
    pub fn rows(&self) -> Vec<(Slot, Vec<Option<&'a ScheduleEntry>>)> {
        SLOTS
            .iter()
            .map(|slot| {
                let cells = Weekday::iter().map(|day| self.cell(day, slot)).collect();
                (*slot, cells)
            })
            .collect()
    }

    pub fn populated_cells(&self) -> usize {
        self.rows()
            .iter()
            .map(|(_, cells)| cells.iter().filter(|c| c.is_some()).count())
            .sum()
    }
}

/// Entries ordered by weekday, then start time.
pub fn timeslots(entries: &[ScheduleEntry]) -> Vec<&ScheduleEntry> {
    let mut sorted: Vec<&ScheduleEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    sorted
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// ── Draft ────────────────────────────────────────────────────────────

/// Form state for a new schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub subject_id: Option<SubjectId>,
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
}

impl Default for ScheduleDraft {
    fn default() -> Self {
        Self {
            subject_id: None,
            day_of_week: Weekday::Monday,
            start_time: SLOTS[0].start.to_owned(),
            end_time: SLOTS[0].end.to_owned(),
            room: String::new(),
        }
    }
}

impl ScheduleDraft {
    /// Prefill the times from one of the fixed slots.
    pub fn in_slot(day: Weekday, slot: &Slot) -> Self {
        Self {
            day_of_week: day,
            start_time: slot.start.to_owned(),
            end_time: slot.end.to_owned(),
            ..Self::default()
        }
    }

    /// Validate the draft for `section` against the section's loaded entries.
    pub fn validate(
        &self,
        section: Option<SectionId>,
        existing: &[ScheduleEntry],
    ) -> Result<NewScheduleEntry, CoreError> {
        let subject_id = self.subject_id.ok_or_else(|| CoreError::invalid(SELECT_SUBJECT))?;
        let class_id = section.ok_or_else(|| CoreError::invalid(SELECT_GRADE_AND_SECTION))?;

        let (start, end) = match (parse_time(&self.start_time), parse_time(&self.end_time)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(CoreError::invalid("Times must look like HH:MM")),
        };
        if end <= start {
            return Err(CoreError::invalid("End time must be after start time"));
        }

        if self.conflict(class_id, start, end, existing).is_some() {
            return Err(CoreError::invalid(SLOT_TAKEN));
        }

        Ok(NewScheduleEntry {
            subject_id,
            day_of_week: self.day_of_week,
            start_time: start.format("%H:%M").to_string(),
            end_time: end.format("%H:%M").to_string(),
            room: self.room.trim().to_owned(),
            class_id,
        })
    }

    /// First entry of the same section and day whose `[start, end)` overlaps.
    fn conflict<'a>(
        &self,
        class_id: SectionId,
        start: NaiveTime,
        end: NaiveTime,
        existing: &'a [ScheduleEntry],
    ) -> Option<&'a ScheduleEntry> {
        existing.iter().find(|e| {
            if e.class_id != class_id || e.day_of_week != self.day_of_week {
                return false;
            }
            match (parse_time(&e.start_time), parse_time(&e.end_time)) {
                (Some(other_start), Some(other_end)) => start < other_end && other_start < end,
                _ => false,
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_api::ScheduleId;
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(id: u64, day: Weekday, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: ScheduleId(id),
            subject_id: SubjectId(3),
            subject: None,
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            room: None,
            class_id: SectionId(12),
        }
    }

    #[test]
    fn single_entry_fills_one_cell() {
        let entries = vec![entry(1, Weekday::Monday, "08:00:00", "09:30:00")];
        let grid = ScheduleGrid::new(&entries);

        assert_eq!(grid.populated_cells(), 1);
        let rows = grid.rows();
        assert_eq!(rows[0].0.label(), "08:00 - 09:30");
        assert_eq!(rows[0].1[0].map(|e| e.id), Some(ScheduleId(1)));
        assert!(grid.cell(Weekday::Tuesday, &SLOTS[0]).is_none());
    }

    #[test]
    fn off_slot_entries_are_not_placed() {
        let entries = vec![entry(1, Weekday::Monday, "08:15:00", "09:00:00")];
        assert_eq!(ScheduleGrid::new(&entries).populated_cells(), 0);
    }

    #[test]
    fn palette_wraps_by_subject_id() {
        assert_eq!(palette_index(SubjectId(3)), 3);
        assert_eq!(palette_index(SubjectId(5)), 0);
        assert_eq!(subject_color(SubjectId(7)).text, "#D97706");
    }

    #[test]
    fn timeslots_sort_by_day_then_time() {
        let entries = vec![
            entry(1, Weekday::Wednesday, "08:00:00", "09:30:00"),
            entry(2, Weekday::Monday, "11:30:00", "13:00:00"),
            entry(3, Weekday::Monday, "08:00:00", "09:30:00"),
        ];
        let ids: Vec<u64> = timeslots(&entries).iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn draft_defaults() {
        let draft = ScheduleDraft::default();
        assert_eq!(draft.day_of_week, Weekday::Monday);
        assert_eq!(draft.start_time, "08:00");
        assert_eq!(draft.end_time, "09:30");
        assert_eq!(draft.room, "");
        assert_eq!(draft.subject_id, None);
    }

    #[test]
    fn draft_requires_subject_then_section() {
        let draft = ScheduleDraft::default();
        let err = draft.validate(Some(SectionId(12)), &[]).unwrap_err();
        assert_eq!(err.user_message(), SELECT_SUBJECT);

        let draft = ScheduleDraft {
            subject_id: Some(SubjectId(3)),
            ..ScheduleDraft::default()
        };
        let err = draft.validate(None, &[]).unwrap_err();
        assert_eq!(err.user_message(), SELECT_GRADE_AND_SECTION);
    }

    #[test]
    fn overlapping_draft_is_rejected() {
        let existing = vec![entry(1, Weekday::Monday, "08:00:00", "09:30:00")];
        let draft = ScheduleDraft {
            subject_id: Some(SubjectId(4)),
            start_time: "09:00".into(),
            end_time: "10:00".into(),
            ..ScheduleDraft::default()
        };
        let err = draft.validate(Some(SectionId(12)), &existing).unwrap_err();
        assert_eq!(err.user_message(), SLOT_TAKEN);

        // Back-to-back is fine, as is another day.
        let adjacent = ScheduleDraft {
            start_time: "09:30".into(),
            end_time: "10:00".into(),
            ..draft.clone()
        };
        assert!(adjacent.validate(Some(SectionId(12)), &existing).is_ok());
        let tuesday = ScheduleDraft {
            day_of_week: Weekday::Tuesday,
            ..draft
        };
        assert!(tuesday.validate(Some(SectionId(12)), &existing).is_ok());
    }

    #[test]
    fn inverted_times_are_rejected() {
        let draft = ScheduleDraft {
            subject_id: Some(SubjectId(3)),
            start_time: "10:00".into(),
            end_time: "09:00".into(),
            ..ScheduleDraft::default()
        };
        assert!(draft.validate(Some(SectionId(12)), &[]).is_err());
    }

    #[test]
    fn valid_draft_becomes_request() {
        let draft = ScheduleDraft {
            subject_id: Some(SubjectId(3)),
            room: " Lab 1 ".into(),
            ..ScheduleDraft::in_slot(Weekday::Friday, &SLOTS[4])
        };
        let req = draft.validate(Some(SectionId(12)), &[]).unwrap();
        assert_eq!(req.day_of_week, Weekday::Friday);
        assert_eq!(req.start_time, "15:45");
        assert_eq!(req.end_time, "17:15");
        assert_eq!(req.room, "Lab 1");
        assert_eq!(req.class_id, SectionId(12));
    }
}
