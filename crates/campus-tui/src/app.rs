//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use campus_api::models::User;
use campus_core::{Campus, SessionState};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel, Request};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets;

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Tabs the signed-in role may open.
    tabs: Vec<ScreenId>,
    user: Option<User>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    last_sync: Option<Instant>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    request_tx: mpsc::UnboundedSender<Request>,
    /// Handed to the data bridge when the loop starts.
    request_rx: Option<mpsc::UnboundedReceiver<Request>>,
    campus: Campus,
    profile: String,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(campus: Campus, profile: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        Self {
            active_screen: ScreenId::Login,
            previous_screen: None,
            screens: create_screens().into_iter().collect(),
            tabs: Vec::new(),
            user: None,
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            pending_confirm: None,
            notification: None,
            last_sync: None,
            action_tx,
            action_rx,
            request_tx,
            request_rx: Some(request_rx),
            campus,
            profile,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        if let Some(requests) = self.request_rx.take() {
            tokio::spawn(crate::data_bridge::spawn_data_bridge(
                self.campus.clone(),
                self.profile.clone(),
                requests,
                self.action_tx.clone(),
                self.data_cancel.clone(),
            ));
        }
        self.request(Request::Restore);
        self.focus(self.active_screen, true);

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(profile = %self.profile, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn request(&self, request: Request) {
        if self.request_tx.send(request).is_err() {
            debug!("data bridge gone; request dropped");
        }
    }

    fn focus(&mut self, screen: ScreenId, focused: bool) {
        if let Some(s) = self.screens.get_mut(&screen) {
            s.set_focused(focused);
        }
    }

    fn screen_captures_input(&self) -> bool {
        self.screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input())
    }

    // ── Keys ─────────────────────────────────────────────────────────

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.search_active {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.search_query.clear();
                    self.action_tx
                        .send(Action::SearchInput(String::new()))?;
                    Some(Action::CloseSearch)
                }
                KeyCode::Enter => Some(Action::CloseSearch),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // Forms and the sign-in screen get every key
        if self.screen_captures_input() {
            return self.delegate_key(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) if self.searchable() => {
                return Ok(Some(Action::OpenSearch));
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                return Ok(Some(Action::Request(Request::Refresh(self.active_screen))));
            }
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| usize::try_from(d).ok()).unwrap_or(0);
                if let Some(screen) = ScreenId::from_number(n, &self.tabs) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) if !self.tabs.is_empty() => {
                return Ok(Some(Action::SwitchScreen(
                    self.active_screen.next_in(&self.tabs),
                )));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) if !self.tabs.is_empty() => {
                return Ok(Some(Action::SwitchScreen(
                    self.active_screen.prev_in(&self.tabs),
                )));
            }
            _ => {}
        }

        if let Some(action) = self.delegate_key(key)? {
            return Ok(Some(action));
        }

        // Esc the screen did not use goes back
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::GoBack));
        }
        Ok(None)
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn searchable(&self) -> bool {
        !matches!(self.active_screen, ScreenId::Dashboard | ScreenId::Login)
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                self.broadcast(action)?;
            }

            Action::SwitchScreen(target) => self.switch_to(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.switch_to(prev);
                }
            }

            Action::Session(state) => {
                self.on_session(state);
                self.broadcast(action)?;
            }

            Action::SummaryUpdated(_)
            | Action::AcademicsUpdated(_)
            | Action::TeachersUpdated(_)
            | Action::StudentsUpdated(_)
            | Action::ParentsUpdated(_)
            | Action::AnnouncementsUpdated(_)
            | Action::FeedbackUpdated(_) => {
                self.last_sync = Some(Instant::now());
                self.broadcast(action)?;
            }

            Action::Loading(_) => self.broadcast(action)?,

            Action::Request(request) => self.request(request.clone()),

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.request(confirm.into_request());
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::OpenSearch => {
                self.search_active = true;
                self.search_query.clear();
            }
            Action::CloseSearch => self.search_active = false,
            Action::SearchInput(query) => {
                self.request(Request::Search {
                    screen: self.active_screen,
                    query: query.clone(),
                });
                self.forward(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // Screens with a pending form close it on success
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
                self.broadcast(action)?;
            }
        }
        Ok(())
    }

    /// Data and session actions go to every screen so they stay in sync.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        self.focus(self.active_screen, false);
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        self.focus(target, true);
        self.search_active = false;
        self.search_query.clear();
        self.request(Request::Refresh(target));
    }

    fn on_session(&mut self, state: &SessionState) {
        match state {
            SessionState::Authenticated(user) => {
                let first_login = self.user.is_none();
                self.tabs = ScreenId::tabs(user.role);
                self.user = Some(user.clone());
                if first_login || self.active_screen == ScreenId::Login {
                    self.previous_screen = None;
                    self.switch_to(ScreenId::Dashboard);
                }
            }
            SessionState::Anonymous => {
                self.user = None;
                self.tabs.clear();
                self.last_sync = None;
                self.previous_screen = None;
                self.switch_to(ScreenId::Login);
            }
            SessionState::Uninitialized | SessionState::Loading => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays, last is topmost
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        if self.tabs.is_empty() {
            return;
        }
        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|&id| {
                Line::from(Span::styled(
                    format!(" {} {} ", id.number_in(&self.tabs), id.label()),
                    theme::tab(id == self.active_screen),
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::hint()))
            .select(self.active_screen.number_in(&self.tabs).checked_sub(1));
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::INDIGO)),
                Span::styled(self.search_query.clone(), Style::default().fg(theme::SKY)),
                Span::styled("█", Style::default().fg(theme::SKY)),
                Span::styled("  Esc clear  Enter keep", theme::hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        match &self.user {
            Some(user) => {
                spans.push(Span::styled(
                    format!("● {}", user.name),
                    Style::default().fg(theme::EMERALD),
                ));
                spans.push(Span::styled(format!(" ({})", user.role), theme::hint()));
            }
            None => spans.push(Span::styled("○ signed out", theme::error())),
        }
        if let Some(synced) = self.last_sync {
            spans.push(Span::styled(
                format!("  synced {} ago", ago(synced.elapsed())),
                theme::hint(),
            ));
        }
        spans.push(Span::styled(
            format!("  [{}]", self.profile),
            theme::hint(),
        ));
        spans.push(Span::styled(" │ ? help  / search  r refresh  q quit", theme::hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Whole seconds, humanised: `4s`, `2m 5s`.
fn ago(elapsed: Duration) -> String {
    humantime::format_duration(Duration::from_secs(elapsed.as_secs())).to_string()
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let inner = widgets::dialog(
        frame,
        widgets::centered(area, 60, 22),
        "Keyboard Shortcuts",
        theme::border(true),
    );

    let row = |key: &str, label: &str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::hint_key()),
            Span::styled(label.to_owned(), theme::hint()),
        ])
    };
    let heading = |text: &str| Line::from(Span::styled(format!("  {text}"), theme::title()));

    let help_text = vec![
        heading("Navigation"),
        row("1-9", "Jump to tab"),
        row("Tab", "Next tab"),
        row("j/k ↑/↓", "Move up/down"),
        row("g/G", "Top / bottom"),
        row("Ctrl+d/u", "Page down / up"),
        row("Esc", "Back / close"),
        Line::from(""),
        heading("Global"),
        row("/", "Search"),
        row("r", "Refresh"),
        row("?", "This help"),
        row("q", "Quit"),
        Line::from(""),
        heading("Screens"),
        row("n a s u", "New item"),
        row("e", "Edit"),
        row("d", "Delete"),
        row("c", "Calendar (academics)"),
        row("x", "Log out (dashboard)"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::hint())),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let inner = widgets::dialog(
        frame,
        widgets::centered(area, 50, 5),
        "Confirm",
        Style::default().fg(theme::AMBER),
    );
    let text = vec![
        Line::from(Span::styled(format!("  {confirm}"), theme::row())),
        Line::from(""),
        widgets::hints(&[("y", "confirm"), ("n", "cancel")]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height + 2),
        width,
        height.min(area.height),
    );

    let (color, icon) = match notif.level {
        NotificationLevel::Success => (theme::EMERALD, "✓"),
        NotificationLevel::Error => (theme::ROSE, "✗"),
        NotificationLevel::Info => (theme::SKY, "·"),
    };

    let inner = widgets::dialog(frame, toast_area, "", Style::default().fg(color));
    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notif.message.clone(), theme::row()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
