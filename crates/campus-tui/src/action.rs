//! Actions are the only way UI state changes. Screens and the data bridge
//! both produce them; the app loop consumes them.

use std::fmt;
use std::sync::Arc;

use campus_api::models::{
    Announcement, Feedback, Grade, ParentRecord, ScheduleEntry, SchoolClass, StudentRecord,
    TeacherRecord,
};
use campus_api::{FeedbackId, GradeKey, ParentId, ScheduleId, SectionId, StudentId, TeacherId};
use campus_core::academics::{Modal, ScheduleSelection, TreeState};
use campus_core::announcements::AnnouncementForm;
use campus_core::lists::FeedbackForm;
use campus_core::{DashboardSummary, ModalKind, SessionState, ViewMode};
use secrecy::SecretString;

use crate::screen::ScreenId;

// ── Notifications ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

// ── Confirmation ──────────────────────────────────────────────────────

/// A destructive request waiting for `y`.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteTeacher { id: TeacherId, name: String },
    DeleteStudent { id: StudentId, name: String },
    DeleteParent { id: ParentId, name: String },
    DeleteFeedback { id: FeedbackId },
    DeleteScheduleEntry { id: ScheduleId, label: String },
    Logout,
}

impl ConfirmAction {
    /// The request to run once confirmed.
    pub fn into_request(self) -> Request {
        match self {
            Self::DeleteTeacher { id, .. } => Request::DeleteTeacher(id),
            Self::DeleteStudent { id, .. } => Request::DeleteStudent(id),
            Self::DeleteParent { id, .. } => Request::DeleteParent(id),
            Self::DeleteFeedback { id } => Request::DeleteFeedback(id),
            Self::DeleteScheduleEntry { id, .. } => {
                Request::Academics(AcademicsRequest::DeleteEntry(id))
            }
            Self::Logout => Request::Logout,
        }
    }
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteTeacher { name, .. } => write!(f, "Delete teacher {name}?"),
            Self::DeleteStudent { name, .. } => write!(f, "Delete student {name}?"),
            Self::DeleteParent { name, .. } => write!(f, "Delete parent {name}?"),
            Self::DeleteFeedback { id } => write!(f, "Delete feedback #{id}?"),
            Self::DeleteScheduleEntry { label, .. } => write!(f, "Remove {label} from the schedule?"),
            Self::Logout => f.write_str("Log out?"),
        }
    }
}

// ── Requests (UI → data bridge) ───────────────────────────────────────

#[derive(Debug, Clone)]
pub enum AcademicsRequest {
    Search(String),
    ToggleGrade(GradeKey),
    ToggleSection(SectionId),
    SelectGrade(GradeKey),
    CycleSection { forward: bool },
    ToggleView,
    OpenModal(ModalKind),
    /// Submit the open dialog with these field values.
    SubmitModal(ModalKind),
    CloseModal,
    DeleteEntry(ScheduleId),
}

/// Work for the data bridge. Each one ends with fresh snapshots and, for
/// writes, a notification.
#[derive(Debug, Clone)]
pub enum Request {
    Restore,
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Refresh(ScreenId),
    Search {
        screen: ScreenId,
        query: String,
    },
    Academics(AcademicsRequest),
    DeleteTeacher(TeacherId),
    DeleteStudent(StudentId),
    DeleteParent(ParentId),
    SendFeedback(FeedbackForm),
    MarkFeedbackRead(FeedbackId),
    DeleteFeedback(FeedbackId),
    PublishAnnouncement(AnnouncementForm),
}

// ── Snapshots (data bridge → UI) ──────────────────────────────────────

/// One list page as the screen should show it.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    /// Items passing the current search.
    pub items: Arc<Vec<T>>,
    pub total: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ListSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            total: 0,
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AcademicsSnapshot {
    pub grades: Arc<Vec<Grade>>,
    pub tree: TreeState,
    pub selection: ScheduleSelection,
    pub view: ViewMode,
    pub modal: Option<Modal>,
    pub schedule: Arc<Vec<ScheduleEntry>>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementsSnapshot {
    pub list: ListSnapshot<Announcement>,
    pub classes: Arc<Vec<SchoolClass>>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackSnapshot {
    pub list: ListSnapshot<Feedback>,
    pub unread: usize,
}

// ── Action ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Session ───────────────────────────────────────────────────
    Session(SessionState),

    // ── Data (from the bridge) ────────────────────────────────────
    Loading(ScreenId),
    SummaryUpdated(DashboardSummary),
    AcademicsUpdated(Box<AcademicsSnapshot>),
    TeachersUpdated(ListSnapshot<TeacherRecord>),
    StudentsUpdated(ListSnapshot<StudentRecord>),
    ParentsUpdated(ListSnapshot<ParentRecord>),
    AnnouncementsUpdated(Box<AnnouncementsSnapshot>),
    FeedbackUpdated(FeedbackSnapshot),

    // ── Requests (to the bridge) ──────────────────────────────────
    Request(Request),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Search ────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),

    ToggleHelp,

    Notify(Notification),
}
