//! Grade → section/subject tree editing and the weekly schedule grid.

mod editor;
mod item;
mod modal;
pub mod schedule;
mod tree;

pub use editor::{HierarchyEditor, ScheduleSelection, ViewMode};
pub use item::{AcademicItem, ItemKind};
pub use modal::{Modal, ModalKind, ModalPhase};
pub use schedule::{PALETTE, SLOTS, ScheduleDraft, ScheduleGrid, Slot, SubjectColor};
pub use tree::{TreeRow, TreeState, matches_search};
