//! Data bridge: owns every `campus-core` state holder and turns UI
//! requests into fresh snapshots.
//!
//! Runs as one background task. Requests arrive over an mpsc channel and
//! are handled in order, so the hierarchy editor and list pages never see
//! concurrent mutation. Session transitions are forwarded as they happen.

use std::sync::Arc;

use campus_api::models::{Role, StudentRecord, TeacherRecord};
use campus_config::Profile;
use campus_core::academics::ModalKind;
use campus_core::lists::ListItem;
use campus_core::{
    AnnouncementBoard, Campus, CoreError, FeedbackBoard, HierarchyEditor, ListPage, ParentsPage,
    nav,
};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::{
    AcademicsRequest, AcademicsSnapshot, Action, AnnouncementsSnapshot, FeedbackSnapshot,
    ListSnapshot, Notification, Request,
};
use crate::screen::ScreenId;

/// Run the bridge until `cancel` fires or the request channel closes.
pub async fn spawn_data_bridge(
    campus: Campus,
    profile: String,
    mut requests: mpsc::UnboundedReceiver<Request>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut session = campus.session().subscribe();
    let mut bridge = DataBridge::new(campus.clone(), profile, action_tx.clone());

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = session.changed() => {
                let state = session.borrow_and_update().clone();
                debug!(?state, "session changed");
                let _ = action_tx.send(Action::Session(state));
            }

            request = requests.recv() => {
                let Some(request) = request else { break };
                bridge.handle(request).await;
            }
        }
    }

    campus.shutdown();
    debug!("data bridge shut down");
}

struct DataBridge {
    campus: Campus,
    profile: String,
    editor: HierarchyEditor,
    teachers: ListPage<TeacherRecord>,
    students: ListPage<StudentRecord>,
    parents: ParentsPage,
    feedback: FeedbackBoard,
    announcements: AnnouncementBoard,
    tx: mpsc::UnboundedSender<Action>,
}

impl DataBridge {
    fn new(campus: Campus, profile: String, tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            editor: campus.hierarchy_editor(),
            teachers: campus.teachers(),
            students: campus.students(),
            parents: campus.parents(),
            feedback: campus.feedback(),
            announcements: campus.announcements(),
            campus,
            profile,
            tx,
        }
    }

    fn send(&self, action: Action) {
        let _ = self.tx.send(action);
    }

    fn notify(&self, notification: Notification) {
        self.send(Action::Notify(notification));
    }

    /// Success toast, or the error's user message.
    fn report(&self, result: Result<(), CoreError>, success: impl Into<String>) {
        match result {
            Ok(()) => self.notify(Notification::success(success)),
            Err(e) => {
                warn!(error = %e, "request failed");
                self.notify(Notification::error(e.user_message()));
            }
        }
    }

    async fn handle(&mut self, request: Request) {
        match request {
            Request::Restore => {
                self.campus.session().restore().await;
            }
            Request::Login { email, password } => self.login(&email, &password).await,
            Request::Logout => self.logout().await,
            Request::Refresh(screen) => self.refresh(screen).await,
            Request::Search { screen, query } => self.search(screen, query),
            Request::Academics(req) => self.academics(req).await,

            Request::DeleteTeacher(id) => {
                let result = self.teachers.delete(id).await;
                self.report(result, "Teacher deleted");
                self.publish_teachers();
            }
            Request::DeleteStudent(id) => {
                let result = self.students.delete(id).await;
                self.report(result, "Student deleted");
                self.publish_students();
            }
            Request::DeleteParent(id) => {
                let result = self.parents.list().delete(id).await;
                self.report(result, "Parent deleted");
                self.publish_parents();
            }

            Request::SendFeedback(form) => {
                let result = self.feedback.send(&form).await;
                self.report(result, "Thanks, your feedback was sent");
                self.publish_feedback();
            }
            Request::MarkFeedbackRead(id) => {
                let result = self.feedback.mark_read(id).await;
                self.report(result, "Marked as read");
                self.publish_feedback();
            }
            Request::DeleteFeedback(id) => {
                let result = self.feedback.delete(id).await;
                self.report(result, "Feedback deleted");
                self.publish_feedback();
            }

            Request::PublishAnnouncement(form) => {
                let result = self.announcements.publish(&form).await;
                self.report(result, "Announcement published");
                self.publish_announcements();
            }
        }
    }

    // ── Session ──────────────────────────────────────────────────────

    async fn login(&self, email: &str, password: &SecretString) {
        match self.campus.session().login(email, password).await {
            Ok((user, token)) => {
                self.persist_session(email, &token);
                self.notify(Notification::success(format!("Welcome, {}", user.name)));
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.notify(Notification::error(e.user_message()));
            }
        }
    }

    /// Remember the email and token for the next start. Keyring first,
    /// config file when the keyring is unavailable.
    fn persist_session(&self, email: &str, token: &SecretString) {
        let mut cfg = campus_config::load_config_or_default();
        let profile = cfg
            .profiles
            .entry(self.profile.clone())
            .or_insert_with(|| Profile {
                api_url: self.campus.client().base_url().to_string(),
                ..Profile::default()
            });
        profile.email = Some(email.trim().to_owned());

        let in_keyring = match campus_config::store_token(&self.profile, token) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "keyring unavailable; keeping token in config file");
                false
            }
        };
        profile.token = (!in_keyring).then(|| token.expose_secret().to_owned());

        if let Err(e) = campus_config::save_config(&cfg) {
            warn!(error = %e, "could not save session to config");
        }
    }

    async fn logout(&self) {
        if let Err(e) = self.campus.session().logout().await {
            warn!(error = %e, "server logout failed");
        }
        if let Err(e) = campus_config::clear_token(&self.profile) {
            warn!(error = %e, "could not clear stored token");
        }

        let mut cfg = campus_config::load_config_or_default();
        let had_plaintext = cfg
            .profiles
            .get_mut(&self.profile)
            .and_then(|p| p.token.take())
            .is_some();
        if had_plaintext {
            if let Err(e) = campus_config::save_config(&cfg) {
                warn!(error = %e, "could not save config");
            }
        }

        info!(profile = %self.profile, "logged out");
        self.notify(Notification::info("Logged out"));
    }

    // ── Fetching ─────────────────────────────────────────────────────

    async fn refresh(&mut self, screen: ScreenId) {
        let Some(role) = self.campus.session().role() else {
            return;
        };
        if let Some(view) = screen.view() {
            if nav::can_access(role, view).is_err() {
                debug!(%screen, %role, "refresh skipped; view not allowed");
                return;
            }
        }

        self.send(Action::Loading(screen));
        match screen {
            ScreenId::Dashboard => match self.campus.summary().await {
                Ok(summary) => self.send(Action::SummaryUpdated(summary)),
                Err(e) => {
                    warn!(error = %e, "summary failed");
                    self.notify(Notification::error(e.user_message()));
                }
            },
            ScreenId::Academics => {
                self.editor.refresh().await;
                self.publish_academics();
            }
            ScreenId::Teachers => {
                self.teachers.refresh().await;
                self.publish_teachers();
            }
            ScreenId::Students => {
                self.students.refresh().await;
                self.publish_students();
            }
            ScreenId::Parents => {
                self.parents.refresh().await;
                self.publish_parents();
            }
            ScreenId::Announcements => {
                self.announcements.refresh().await;
                self.publish_announcements();
            }
            ScreenId::Feedback => {
                // Only admins read the inbox; others just submit.
                if role == Role::Admin {
                    self.feedback.refresh().await;
                    self.publish_feedback();
                } else {
                    self.send(Action::FeedbackUpdated(FeedbackSnapshot::default()));
                }
            }
            ScreenId::Login => {}
        }
    }

    fn search(&mut self, screen: ScreenId, query: String) {
        match screen {
            ScreenId::Academics => {
                self.editor.set_search(query);
                self.publish_academics();
            }
            ScreenId::Teachers => {
                self.teachers.set_search(query);
                self.publish_teachers();
            }
            ScreenId::Students => {
                self.students.set_search(query);
                self.publish_students();
            }
            ScreenId::Parents => {
                self.parents.list_mut().set_search(query);
                self.publish_parents();
            }
            ScreenId::Announcements => {
                self.announcements.list_mut().set_search(query);
                self.publish_announcements();
            }
            ScreenId::Feedback => {
                self.feedback.list_mut().set_search(query);
                self.publish_feedback();
            }
            ScreenId::Dashboard | ScreenId::Login => {}
        }
    }

    // ── Academics ────────────────────────────────────────────────────

    async fn academics(&mut self, request: AcademicsRequest) {
        let result = match request {
            AcademicsRequest::Search(query) => {
                self.editor.set_search(query);
                Ok(())
            }
            AcademicsRequest::ToggleGrade(key) => {
                self.editor.tree_mut().toggle_grade(&key);
                Ok(())
            }
            AcademicsRequest::ToggleSection(id) => {
                self.editor.tree_mut().toggle_section(id);
                Ok(())
            }
            AcademicsRequest::SelectGrade(key) => self.editor.select_grade(&key).await,
            AcademicsRequest::CycleSection { forward } => self.editor.cycle_section(forward).await,
            AcademicsRequest::ToggleView => {
                self.editor.toggle_view().await;
                Ok(())
            }
            AcademicsRequest::OpenModal(kind) => self.editor.open_modal(kind),
            AcademicsRequest::CloseModal => {
                self.editor.close_modal();
                Ok(())
            }
            AcademicsRequest::SubmitModal(kind) => {
                self.submit_modal(kind).await;
                return;
            }
            AcademicsRequest::DeleteEntry(id) => {
                let result = self.editor.delete_schedule_entry(id).await;
                self.report(result, "Schedule entry deleted");
                self.publish_academics();
                return;
            }
        };

        if let Err(e) = result {
            self.notify(Notification::error(e.user_message()));
        }
        self.publish_academics();
    }

    /// Copy the screen's field values into the open dialog and submit it.
    /// The editor keeps the dialog open with the error on failure.
    async fn submit_modal(&mut self, kind: ModalKind) {
        let success = match &kind {
            ModalKind::AddGrade { .. } => "Grade added".to_owned(),
            ModalKind::AddSection { .. } => "Section added".to_owned(),
            ModalKind::AddSubject { .. } => "Subject added".to_owned(),
            ModalKind::Edit { item, .. } => format!("{} updated", item.kind()),
            ModalKind::Delete { item } => format!("{} deleted", item.kind()),
            ModalKind::AddSchedule { .. } => "Schedule entry added".to_owned(),
            ModalKind::Timeslots => String::new(),
        };

        if let Some(fields) = self.editor.modal_fields() {
            *fields = kind;
        }
        self.publish_academics();

        match self.editor.submit_modal().await {
            Ok(()) if success.is_empty() => {}
            Ok(()) => self.notify(Notification::success(success)),
            Err(e) => warn!(error = %e, "dialog submit failed"),
        }
        self.publish_academics();
    }

    // ── Snapshots ────────────────────────────────────────────────────

    fn publish_academics(&self) {
        let hierarchy = self.editor.hierarchy();
        let schedule = self.editor.schedule();
        let snapshot = AcademicsSnapshot {
            grades: self.editor.grades(),
            tree: self.editor.tree().clone(),
            selection: self.editor.selection().clone(),
            view: self.editor.view(),
            modal: self.editor.modal().cloned(),
            schedule: schedule.data(),
            loading: hierarchy.is_loading() || schedule.is_loading(),
            error: hierarchy.error().or_else(|| schedule.error()),
        };
        self.send(Action::AcademicsUpdated(Box::new(snapshot)));
    }

    fn publish_teachers(&self) {
        self.send(Action::TeachersUpdated(list_snapshot(&self.teachers)));
    }

    fn publish_students(&self) {
        self.send(Action::StudentsUpdated(list_snapshot(&self.students)));
    }

    fn publish_parents(&self) {
        self.send(Action::ParentsUpdated(list_snapshot(self.parents.list())));
    }

    fn publish_announcements(&self) {
        let snapshot = AnnouncementsSnapshot {
            list: list_snapshot(self.announcements.list()),
            classes: self.announcements.classes().data(),
        };
        self.send(Action::AnnouncementsUpdated(Box::new(snapshot)));
    }

    fn publish_feedback(&self) {
        let snapshot = FeedbackSnapshot {
            list: list_snapshot(self.feedback.list()),
            unread: self.feedback.unread_count(),
        };
        self.send(Action::FeedbackUpdated(snapshot));
    }
}

fn list_snapshot<T: ListItem>(page: &ListPage<T>) -> ListSnapshot<T> {
    let resource = page.resource();
    ListSnapshot {
        items: Arc::new(page.filtered()),
        total: page.items().len(),
        loading: resource.is_loading(),
        error: resource.error(),
    }
}
