//! Dashboard logic between `campus-api` and the front ends (CLI / TUI).
//!
//! - **[`Campus`]**: entry point. Builds the HTTP client from a
//!   [`ClientConfig`], owns the [`Session`] and the root cancellation token,
//!   and hands out one state holder per screen.
//!
//! - **[`Resource<T>`]**: `{data, loading, error, refetch}` published on a
//!   `watch` channel. Overlapping fetches are resolved by generation; the
//!   newest one wins and dropped owners cancel in-flight requests.
//!
//! - **[`HierarchyEditor`]**: grade → section/subject tree, weekly schedule
//!   grid, one-modal-at-a-time dialogs. Every mutation refetches.
//!
//! - **[`lists`]**: generic [`ListPage<T>`](lists::ListPage) with search and
//!   create/update/delete for teachers, students, parents and feedback.
//!
//! - **[`nav`]**: which role may open which view.

pub mod academics;
pub mod announcements;
pub mod attendance;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod lists;
pub mod nav;
pub mod profile;
pub mod session;

use std::sync::Arc;

use campus_api::CampusClient;
use campus_api::models::{StudentRecord, TeacherRecord};
use tokio_util::sync::CancellationToken;
use tracing::debug;

// ── Primary re-exports ──────────────────────────────────────────────
pub use academics::{AcademicItem, HierarchyEditor, ModalKind, ScheduleDraft, ViewMode};
pub use announcements::AnnouncementBoard;
pub use attendance::{AttendanceDesk, AttendanceSheet};
pub use config::{ClientConfig, TlsVerification};
pub use dashboard::DashboardSummary;
pub use error::CoreError;
pub use fetch::{FetchOutcome, FetchState, Resource};
pub use lists::{FeedbackBoard, ListPage, ParentsPage};
pub use nav::View;
pub use profile::{PreferenceKey, ProfileEditor};
pub use session::{Session, SessionState};

/// Shared handle for one backend connection.
#[derive(Debug, Clone)]
pub struct Campus {
    session: Session,
    root: CancellationToken,
}

impl Campus {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        debug!(url = %config.api_url, "campus client ready");
        Ok(Self::from_client(client))
    }

    /// Wrap an already-built client.
    pub fn from_client(client: CampusClient) -> Self {
        Self {
            session: Session::new(Arc::new(client)),
            root: CancellationToken::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &Arc<CampusClient> {
        self.session.client()
    }

    /// Cancel every in-flight fetch started through this handle.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    // ── Screens ──────────────────────────────────────────────────────

    pub fn hierarchy_editor(&self) -> HierarchyEditor {
        HierarchyEditor::new(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn teachers(&self) -> ListPage<TeacherRecord> {
        ListPage::crud(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn students(&self) -> ListPage<StudentRecord> {
        ListPage::crud(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn parents(&self) -> ParentsPage {
        ParentsPage::new(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn feedback(&self) -> FeedbackBoard {
        FeedbackBoard::new(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn announcements(&self) -> AnnouncementBoard {
        AnnouncementBoard::new(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn attendance(&self) -> AttendanceDesk {
        AttendanceDesk::new(Arc::clone(self.client()), &self.root.child_token())
    }

    pub fn profile(&self) -> ProfileEditor {
        ProfileEditor::new(self.session.clone())
    }

    pub async fn summary(&self) -> Result<DashboardSummary, CoreError> {
        let user = self.session.require_user()?;
        DashboardSummary::load(self.client(), user.role).await
    }
}
