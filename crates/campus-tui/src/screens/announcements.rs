//! Announcements screen: audience tabs, message preview, and a compose
//! form for admins.

use std::sync::Arc;

use campus_api::models::{Announcement, AnnouncementAudience, Role, SchoolClass};
use campus_core::announcements::{AnnouncementForm, filter_by_audience};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};

use super::ListView;
use crate::action::{Action, Notification, NotificationLevel, Request};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{self, form::Form, form::TextField, picker::Choice};

const AUDIENCES: [AnnouncementAudience; 5] = [
    AnnouncementAudience::All,
    AnnouncementAudience::Teacher,
    AnnouncementAudience::Student,
    AnnouncementAudience::Parent,
    AnnouncementAudience::Class,
];

const TITLE: usize = 0;
const MESSAGE: usize = 1;
const AUDIENCE: usize = 2;
const CLASS: usize = 3;

struct Compose {
    form: Form,
    /// Waiting for the publish result.
    pending: bool,
}

pub struct AnnouncementsScreen {
    view: ListView<Announcement>,
    classes: Arc<Vec<SchoolClass>>,
    /// `None` is the "All" tab.
    audience: Option<AnnouncementAudience>,
    role: Option<Role>,
    compose: Option<Compose>,
}

impl AnnouncementsScreen {
    pub fn new() -> Self {
        Self {
            view: ListView::default(),
            classes: Arc::new(Vec::new()),
            audience: None,
            role: None,
            compose: None,
        }
    }

    fn visible(&self) -> Vec<&Announcement> {
        filter_by_audience(&self.view.snapshot.items, self.audience)
    }

    fn cycle_audience(&mut self) {
        self.audience = match self.audience {
            None => AUDIENCES.first().copied(),
            Some(current) => AUDIENCES
                .iter()
                .position(|&a| a == current)
                .and_then(|i| AUDIENCES.get(i + 1))
                .copied(),
        };
        self.view.cursor.select(0, self.visible().len());
    }

    fn open_compose(&mut self) {
        let class_labels = self.classes.iter().map(SchoolClass::label).collect();
        self.compose = Some(Compose {
            form: Form::new(vec![
                TextField::new("Title").into(),
                TextField::new("Message").into(),
                Choice::new(
                    "Audience",
                    AUDIENCES.iter().map(ToString::to_string).collect(),
                )
                .into(),
                Choice::new("Class (class audience only)", class_labels).into(),
            ]),
            pending: false,
        });
    }

    fn compose_form(&self, form: &Form) -> AnnouncementForm {
        let target_role = AUDIENCES
            .get(form.choice(AUDIENCE))
            .copied()
            .unwrap_or_default();
        AnnouncementForm {
            title: form.value(TITLE).to_owned(),
            message: form.value(MESSAGE).to_owned(),
            target_role,
            target_class_id: self.classes.get(form.choice(CLASS)).map(|c| c.id),
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Option<Action> {
        let compose = self.compose.as_ref()?;
        if compose.pending {
            return None;
        }
        match key.code {
            KeyCode::Esc => {
                self.compose = None;
                None
            }
            KeyCode::Enter => {
                let form = self.compose_form(&compose.form);
                // Reject an invalid form before it reaches the bridge
                if let Err(e) = form.payload() {
                    return Some(Action::Notify(Notification::error(e.user_message())));
                }
                if let Some(compose) = self.compose.as_mut() {
                    compose.pending = true;
                }
                Some(Action::Request(Request::PublishAnnouncement(form)))
            }
            _ => {
                if let Some(compose) = self.compose.as_mut() {
                    compose.form.handle_key(key);
                }
                None
            }
        }
    }

    fn render_compose(frame: &mut Frame, area: Rect, compose: &Compose) {
        let dialog = widgets::centered(area, 64, compose.form.height() + 4);
        let inner = widgets::dialog(frame, dialog, "New Announcement", theme::border(true));
        let [fields, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        compose.form.render(frame, fields);
        let line = if compose.pending {
            Line::from(Span::styled(" Publishing…", theme::hint()))
        } else {
            widgets::hints(&[("Tab", "next"), ("←/→", "choose"), ("Enter", "publish"), ("Esc", "cancel")])
        };
        frame.render_widget(Paragraph::new(line), hints);
    }

    fn audience_tabs(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" "), Span::styled(" All ", theme::tab(self.audience.is_none()))];
        for audience in AUDIENCES {
            spans.push(Span::styled(
                format!(" {audience} "),
                theme::tab(self.audience == Some(audience)),
            ));
        }
        Line::from(spans)
    }
}

impl Component for AnnouncementsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.compose.is_some() {
            return Ok(self.handle_compose_key(key));
        }
        let len = self.visible().len();
        if self.view.navigate(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('f') => self.cycle_audience(),
            KeyCode::Char('n') if self.role == Some(Role::Admin) => self.open_compose(),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AnnouncementsUpdated(snapshot) => {
                self.view.apply(&snapshot.list);
                self.classes = Arc::clone(&snapshot.classes);
                self.view.cursor.clamp(self.visible().len());
            }
            Action::Loading(ScreenId::Announcements) => self.view.set_loading(),
            Action::SearchInput(query) => self.view.search.clone_from(query),
            Action::Session(state) => self.role = state.user().map(|u| u.role),
            Action::Notify(n) => {
                if let Some(compose) = self.compose.as_mut().filter(|c| c.pending) {
                    if n.level == NotificationLevel::Success {
                        self.compose = None;
                    } else {
                        compose.pending = false;
                    }
                }
            }
            Action::Tick => self.view.tick(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [tabs, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(self.audience_tabs()), tabs);

        let [list_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);

        let visible = self.visible();
        let header = Row::new(["Title", "Audience", "By", "Date"]).style(theme::table_header());
        let rows = visible.iter().map(|a| {
            Row::new(vec![
                Cell::from(a.title.clone()),
                Cell::from(a.target_role.to_string()),
                Cell::from(a.author().to_owned()),
                Cell::from(
                    a.created_at()
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
            ])
            .style(theme::row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(16),
                Constraint::Percentage(24),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(widgets::panel(
            self.view.title("Announcements", visible.len()),
            self.view.focused,
        ));
        frame.render_stateful_widget(table, list_area, &mut self.view.cursor.state());

        let block = widgets::panel(" Message ".into(), false);
        let inner = block.inner(preview_area);
        frame.render_widget(block, preview_area);
        if let Some(a) = visible.get(self.view.cursor.index()) {
            let mut lines = vec![
                Line::from(Span::styled(a.title.clone(), theme::title())),
                Line::from(Span::styled(format!("to {}", a.target_role), theme::hint())),
                Line::from(""),
            ];
            lines.extend(a.message.lines().map(|l| Line::from(l.to_owned())));
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }

        let mut hint_pairs = vec![("j/k", "move"), ("f", "audience"), ("/", "search")];
        if self.role == Some(Role::Admin) {
            hint_pairs.push(("n", "new"));
        }
        widgets::status_line(
            frame,
            status,
            self.view.snapshot.loading,
            self.view.error(),
            &self.view.throbber,
            &hint_pairs,
        );

        if let Some(compose) = &self.compose {
            Self::render_compose(frame, area, compose);
        }
    }

    fn captures_input(&self) -> bool {
        self.compose.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.view.focused = focused;
        if !focused {
            self.compose = None;
        }
    }
}
