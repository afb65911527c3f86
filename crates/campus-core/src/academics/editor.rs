// ── Academic hierarchy editor ──
//
// Owns the hierarchy and schedule resources plus all view state for the
// academics screen. Every mutation goes to the backend first; on success
// the authoritative data is fetched again, on failure prior state stays
// and the error carries the action headline shown to the user.

use std::future::Future;
use std::sync::Arc;

use campus_api::models::{Grade, ScheduleEntry, Section};
use campus_api::{CampusClient, GradeKey, ScheduleId, SectionId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::item::AcademicItem;
use super::modal::{Modal, ModalKind, ModalSlot};
use super::schedule::{SELECT_GRADE_AND_SECTION, ScheduleDraft};
use super::tree::{TreeRow, TreeState};
use crate::error::CoreError;
use crate::fetch::{FetchOutcome, Resource};

const ADD_GRADE_FAILED: &str = "Failed to add grade";
const ADD_SECTION_FAILED: &str = "Failed to add section";
const ADD_SUBJECT_FAILED: &str = "Failed to add subject";
const UPDATE_FAILED: &str = "Update failed";
const DELETE_FAILED: &str = "Deletion failed";
const ADD_ENTRY_FAILED: &str = "Failed to add schedule entry";
const DELETE_ENTRY_FAILED: &str = "Failed to delete schedule entry";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Hierarchy,
    Calendar,
}

/// Grade and section whose schedule is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSelection {
    pub grade: Option<GradeKey>,
    pub section: Option<SectionId>,
}

pub struct HierarchyEditor {
    client: Arc<CampusClient>,
    hierarchy: Resource<Vec<Grade>>,
    schedule: Resource<Vec<ScheduleEntry>>,
    tree: TreeState,
    modal: ModalSlot,
    selection: ScheduleSelection,
    view: ViewMode,
}

impl HierarchyEditor {
    pub fn new(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        let loader_client = Arc::clone(&client);
        let hierarchy = Resource::new(Vec::new(), owner.clone(), move || {
            let client = Arc::clone(&loader_client);
            async move { client.academic_hierarchy().await.map_err(CoreError::from) }
        });
        let schedule = Resource::idle(Vec::new(), owner.clone());

        Self {
            client,
            hierarchy,
            schedule,
            tree: TreeState::default(),
            modal: ModalSlot::default(),
            selection: ScheduleSelection::default(),
            view: ViewMode::default(),
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Fetch the hierarchy, then reset expansion and reconcile the selection.
    pub async fn refresh(&mut self) -> FetchOutcome {
        let outcome = self.hierarchy.refetch().await;
        if outcome == FetchOutcome::Applied {
            let grades = self.hierarchy.data();
            self.tree.reset_defaults(&grades);
            let changed = self.reconcile_selection(&grades);
            debug!(grades = grades.len(), selection_changed = changed, "hierarchy applied");
            if self.view == ViewMode::Calendar {
                self.load_schedule().await;
            }
        }
        outcome
    }

    /// Fetch the schedule of the selected section.
    pub async fn load_schedule(&self) -> FetchOutcome {
        let Some(section) = self.selection.section else {
            self.schedule.set_data(Vec::new());
            return self.schedule.refetch().await;
        };
        let client = Arc::clone(&self.client);
        self.schedule
            .load(async move {
                client
                    .list_schedules(section)
                    .await
                    .map_err(CoreError::from)
            })
            .await
    }

    /// Fall back to the first grade/section when the current ones vanished.
    fn reconcile_selection(&mut self, grades: &[Grade]) -> bool {
        let before = self.selection.clone();

        let grade = self
            .selection
            .grade
            .as_ref()
            .and_then(|key| grades.iter().find(|g| &g.name == key))
            .or_else(|| grades.first());

        self.selection = match grade {
            Some(grade) => {
                let section = self
                    .selection
                    .section
                    .and_then(|id| grade.section(id))
                    .or_else(|| grade.sections.first())
                    .map(|s| s.id);
                ScheduleSelection {
                    grade: Some(grade.name.clone()),
                    section,
                }
            }
            None => ScheduleSelection::default(),
        };

        before != self.selection
    }

    // ── Reading ──────────────────────────────────────────────────────

    pub fn hierarchy(&self) -> &Resource<Vec<Grade>> {
        &self.hierarchy
    }

    pub fn schedule(&self) -> &Resource<Vec<ScheduleEntry>> {
        &self.schedule
    }

    pub fn grades(&self) -> Arc<Vec<Grade>> {
        self.hierarchy.data()
    }

    /// Grades passing the current search.
    pub fn filtered_grades(&self) -> Vec<Grade> {
        let grades = self.hierarchy.data();
        self.tree.filter(&grades).into_iter().cloned().collect()
    }

    /// Editable item at `index` among the visible tree rows.
    pub fn item_at(&self, index: usize) -> Option<AcademicItem> {
        let grades = self.hierarchy.data();
        self.tree
            .visible_rows(&grades)
            .get(index)
            .and_then(TreeRow::item)
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeState {
        &mut self.tree
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.tree.set_search(query);
    }

    pub fn selection(&self) -> &ScheduleSelection {
        &self.selection
    }

    pub fn selected_grade(&self) -> Option<Grade> {
        let key = self.selection.grade.as_ref()?;
        self.hierarchy
            .data()
            .iter()
            .find(|g| &g.name == key)
            .cloned()
    }

    pub fn selected_section(&self) -> Option<Section> {
        let id = self.selection.section?;
        self.selected_grade()?.section(id).cloned()
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    // ── Selection & view ─────────────────────────────────────────────

    /// Select a grade and its first section.
    pub async fn select_grade(&mut self, key: &GradeKey) -> Result<(), CoreError> {
        let grades = self.hierarchy.data();
        let grade = grades
            .iter()
            .find(|g| &g.name == key)
            .ok_or_else(|| CoreError::NotFound {
                message: format!("Grade {key}"),
            })?;
        self.selection = ScheduleSelection {
            grade: Some(grade.name.clone()),
            section: grade.sections.first().map(|s| s.id),
        };
        self.after_selection_change().await;
        Ok(())
    }

    /// Select a section of the selected grade.
    pub async fn select_section(&mut self, id: SectionId) -> Result<(), CoreError> {
        let grade = self
            .selected_grade()
            .ok_or_else(|| CoreError::invalid(SELECT_GRADE_AND_SECTION))?;
        if grade.section(id).is_none() {
            return Err(CoreError::NotFound {
                message: format!("Section {id} in {}", grade.name),
            });
        }
        self.selection.section = Some(id);
        self.after_selection_change().await;
        Ok(())
    }

    /// Step through the selected grade's sections, wrapping around.
    pub async fn cycle_section(&mut self, forward: bool) -> Result<(), CoreError> {
        let grade = self
            .selected_grade()
            .ok_or_else(|| CoreError::invalid(SELECT_GRADE_AND_SECTION))?;
        let count = grade.sections.len();
        if count == 0 {
            return Err(CoreError::invalid(SELECT_GRADE_AND_SECTION));
        }
        let current = self
            .selection
            .section
            .and_then(|id| grade.sections.iter().position(|s| s.id == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.selection.section = grade.sections.get(next).map(|s| s.id);
        self.after_selection_change().await;
        Ok(())
    }

    async fn after_selection_change(&mut self) {
        debug!(selection = ?self.selection, "schedule selection changed");
        if self.view == ViewMode::Calendar {
            self.load_schedule().await;
        }
    }

    pub async fn show_calendar(&mut self) {
        self.view = ViewMode::Calendar;
        self.load_schedule().await;
    }

    pub fn show_hierarchy(&mut self) {
        self.view = ViewMode::Hierarchy;
    }

    pub async fn toggle_view(&mut self) {
        match self.view {
            ViewMode::Hierarchy => self.show_calendar().await,
            ViewMode::Calendar => self.show_hierarchy(),
        }
    }

    // ── Modal ────────────────────────────────────────────────────────

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.current()
    }

    pub fn modal_fields(&mut self) -> Option<&mut ModalKind> {
        self.modal.kind_mut()
    }

    pub fn open_modal(&mut self, kind: ModalKind) -> Result<(), CoreError> {
        self.modal.open(kind)
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// Submit the open dialog. Success closes it; failure keeps it open
    /// with the error message.
    pub async fn submit_modal(&mut self) -> Result<(), CoreError> {
        let kind = self.modal.begin_submit()?;
        let result = match kind {
            ModalKind::AddGrade { name } => self.add_grade(&name).await,
            ModalKind::AddSection { grade, name } => self.add_section(&grade, &name).await,
            ModalKind::AddSubject { grade, name, code } => {
                self.add_subject(&grade, &name, &code).await
            }
            ModalKind::Edit { item, value } => self.update(&item, &value).await,
            ModalKind::Delete { item } => self.delete(&item).await,
            ModalKind::AddSchedule { draft } => self.add_schedule_entry(&draft).await,
            ModalKind::Timeslots => Ok(()),
        };
        match &result {
            Ok(()) => self.modal.close(),
            Err(e) => self.modal.fail(e.user_message()),
        }
        result
    }

    // ── Hierarchy mutations ──────────────────────────────────────────

    pub async fn add_grade(&mut self, name: &str) -> Result<(), CoreError> {
        let name = required(name, "Grade name is required")?;
        commit(ADD_GRADE_FAILED, self.client.create_grade(name)).await?;
        info!(grade = name, "grade added");
        self.refresh().await;
        Ok(())
    }

    pub async fn add_section(&mut self, grade: &GradeKey, name: &str) -> Result<(), CoreError> {
        let name = required(name, "Section name is required")?;
        commit(ADD_SECTION_FAILED, self.client.create_section(grade, name)).await?;
        info!(%grade, section = name, "section added");
        self.refresh().await;
        Ok(())
    }

    pub async fn add_subject(
        &mut self,
        grade: &GradeKey,
        name: &str,
        code: &str,
    ) -> Result<(), CoreError> {
        let name = required(name, "Subject name is required")?;
        let code = required(code, "Subject code is required")?;
        commit(
            ADD_SUBJECT_FAILED,
            self.client.create_grade_subject(grade, name, code),
        )
        .await?;
        info!(%grade, subject = name, code, "subject added");
        self.refresh().await;
        Ok(())
    }

    /// Rename a grade, section or subject.
    pub async fn update(&mut self, item: &AcademicItem, value: &str) -> Result<(), CoreError> {
        let value = required(value, "Name cannot be empty")?;
        match item {
            AcademicItem::Grade { key } => {
                commit(UPDATE_FAILED, self.client.rename_grade(key, value)).await?;
                if self.selection.grade.as_ref() == Some(key) {
                    self.selection.grade = Some(GradeKey::new(value));
                }
            }
            AcademicItem::Section { id, .. } => {
                commit(UPDATE_FAILED, self.client.rename_section(*id, value)).await?;
            }
            AcademicItem::Subject { id, .. } => {
                commit(UPDATE_FAILED, self.client.rename_subject(*id, value)).await?;
            }
        }
        info!(%item, to = value, "renamed");
        self.refresh().await;
        Ok(())
    }

    pub async fn delete(&mut self, item: &AcademicItem) -> Result<(), CoreError> {
        match item {
            AcademicItem::Grade { key } => {
                commit(DELETE_FAILED, self.client.delete_grade(key)).await?;
            }
            AcademicItem::Section { id, .. } => {
                commit(DELETE_FAILED, self.client.delete_section(*id)).await?;
            }
            AcademicItem::Subject { grade, id, .. } => {
                commit(DELETE_FAILED, self.client.delete_grade_subject(grade, *id)).await?;
            }
        }
        info!(%item, "deleted");
        self.refresh().await;
        Ok(())
    }

    // ── Schedule mutations ───────────────────────────────────────────

    /// Add an entry to the selected section's schedule.
    pub async fn add_schedule_entry(&mut self, draft: &ScheduleDraft) -> Result<(), CoreError> {
        let section = self.selected_section().map(|s| s.id);
        let existing = self.schedule.data();
        let entry = draft.validate(section, &existing)?;

        commit(ADD_ENTRY_FAILED, self.client.create_schedule(&entry)).await?;
        info!(
            section = %entry.class_id,
            day = %entry.day_of_week,
            start = %entry.start_time,
            "schedule entry added"
        );
        self.load_schedule().await;
        Ok(())
    }

    pub async fn delete_schedule_entry(&mut self, id: ScheduleId) -> Result<(), CoreError> {
        commit(DELETE_ENTRY_FAILED, self.client.delete_schedule(id)).await?;
        info!(entry = %id, "schedule entry deleted");
        self.load_schedule().await;
        Ok(())
    }
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(message));
    }
    Ok(trimmed)
}

async fn commit<Fut>(headline: &'static str, request: Fut) -> Result<(), CoreError>
where
    Fut: Future<Output = Result<(), campus_api::Error>>,
{
    request.await.map_err(|e| {
        let err = CoreError::from(e).in_action(headline);
        warn!(error = %err, "mutation failed");
        err
    })
}
