// ── Modal state machine ──
//
// Closed → Open(kind) → Submitting → Closed | Open with error.
// At most one modal exists at a time.

use campus_api::GradeKey;

use super::item::AcademicItem;
use super::schedule::ScheduleDraft;
use crate::error::CoreError;

/// What the open dialog is for, with its form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    AddGrade {
        name: String,
    },
    AddSection {
        grade: GradeKey,
        name: String,
    },
    AddSubject {
        grade: GradeKey,
        name: String,
        code: String,
    },
    Edit {
        item: AcademicItem,
        value: String,
    },
    Delete {
        item: AcademicItem,
    },
    AddSchedule {
        draft: ScheduleDraft,
    },
    Timeslots,
}

impl ModalKind {
    pub fn add_grade() -> Self {
        Self::AddGrade {
            name: String::new(),
        }
    }

    pub fn add_section(grade: GradeKey) -> Self {
        Self::AddSection {
            grade,
            name: String::new(),
        }
    }

    pub fn add_subject(grade: GradeKey) -> Self {
        Self::AddSubject {
            grade,
            name: String::new(),
            code: String::new(),
        }
    }

    /// Edit dialog prefilled with the item's current name.
    pub fn edit(item: AcademicItem) -> Self {
        let value = item.label().to_owned();
        Self::Edit { item, value }
    }

    pub fn title(&self) -> String {
        match self {
            Self::AddGrade { .. } => "Add Grade".into(),
            Self::AddSection { grade, .. } => format!("Add Section to {grade}"),
            Self::AddSubject { grade, .. } => format!("Add Subject to {grade}"),
            Self::Edit { item, .. } => format!("Edit {}", item.kind()),
            Self::Delete { item } => format!("Delete {}", item.kind()),
            Self::AddSchedule { .. } => "Add Schedule Entry".into(),
            Self::Timeslots => "Timeslots".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalPhase {
    Editing,
    Submitting,
    /// Submission failed; the dialog stays open with this message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub phase: ModalPhase,
}

/// Holder for the single open modal.
#[derive(Debug, Default)]
pub struct ModalSlot {
    current: Option<Modal>,
}

impl ModalSlot {
    /// Open a dialog. Refused while another one is open.
    pub fn open(&mut self, kind: ModalKind) -> Result<(), CoreError> {
        if self.current.is_some() {
            return Err(CoreError::ModalAlreadyOpen);
        }
        self.current = Some(Modal {
            kind,
            phase: ModalPhase::Editing,
        });
        Ok(())
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }

    /// Mutable access to the form fields of the open dialog.
    pub fn kind_mut(&mut self) -> Option<&mut ModalKind> {
        self.current.as_mut().map(|m| &mut m.kind)
    }

    /// Move to `Submitting` and hand back a copy of the form.
    pub(crate) fn begin_submit(&mut self) -> Result<ModalKind, CoreError> {
        let modal = self
            .current
            .as_mut()
            .ok_or_else(|| CoreError::invalid("No dialog is open"))?;
        if modal.phase == ModalPhase::Submitting {
            return Err(CoreError::invalid("Already submitting"));
        }
        modal.phase = ModalPhase::Submitting;
        Ok(modal.kind.clone())
    }

    pub(crate) fn fail(&mut self, message: String) {
        if let Some(modal) = self.current.as_mut() {
            modal.phase = ModalPhase::Failed(message);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn second_modal_is_refused() {
        let mut slot = ModalSlot::default();
        slot.open(ModalKind::add_grade()).unwrap();
        let err = slot.open(ModalKind::Timeslots).unwrap_err();
        assert!(matches!(err, CoreError::ModalAlreadyOpen));
        assert_eq!(slot.current().unwrap().kind, ModalKind::add_grade());
    }

    #[test]
    fn failure_keeps_modal_open() {
        let mut slot = ModalSlot::default();
        slot.open(ModalKind::add_section(GradeKey::from("9th"))).unwrap();
        slot.begin_submit().unwrap();
        assert!(slot.begin_submit().is_err());
        slot.fail("Failed to add section".into());
        assert_eq!(
            slot.current().unwrap().phase,
            ModalPhase::Failed("Failed to add section".into())
        );

        // Resubmitting from the failed state is allowed.
        assert!(slot.begin_submit().is_ok());
        slot.close();
        assert!(!slot.is_open());
    }

    #[test]
    fn edit_prefills_current_name() {
        let item = AcademicItem::Grade {
            key: GradeKey::from("9th"),
        };
        match ModalKind::edit(item) {
            ModalKind::Edit { value, .. } => assert_eq!(value, "9th"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
