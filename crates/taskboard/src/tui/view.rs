use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
};
use taskboard_app::{Dashboard, DashboardError};
use taskboard_core::TaskId;
use taskboard_store::KeyValueStore;

use super::constants::UI_MESSAGE_TTL_SECS;
use super::theme::Palette;
use crate::config::{KeyBindingsConfig, ViewType};

/// Search prompt state; the text itself lives in the dashboard filter so the
/// list narrows while typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SearchPrompt {
    pub(super) previous: String,
}

pub(super) struct Ui<K> {
    pub(super) dashboard: Dashboard<K>,
    pub(super) keybindings: KeyBindingsConfig,
    /// Visible row under the cursor.
    pub(super) selected: usize,
    pub(super) search: Option<SearchPrompt>,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
}

impl<K: KeyValueStore> Ui<K> {
    pub(super) const MAIN_MIN_HEIGHT: u16 = 5;
    pub(super) const FILTER_HEIGHT: u16 = 3;
    pub(super) const INSTRUCTIONS_HEIGHT: u16 = 3;
    pub(super) const STATUS_MESSAGE_HEIGHT: u16 = 3;
    pub(super) const STATUS_FOOTER_HEIGHT: u16 =
        Self::INSTRUCTIONS_HEIGHT + Self::STATUS_MESSAGE_HEIGHT;

    pub(super) const fn new(dashboard: Dashboard<K>, keybindings: KeyBindingsConfig) -> Self {
        Self {
            dashboard,
            keybindings,
            selected: 0,
            search: None,
            message: None,
            should_quit: false,
        }
    }

    pub(super) const fn palette(&self) -> Palette {
        Palette::for_theme(self.dashboard.theme())
    }

    /// Which key table is active.
    pub(super) fn view_type(&self) -> ViewType {
        if self.dashboard.editor().is_open() {
            ViewType::Form
        } else if self.dashboard.dragging().is_some() {
            ViewType::Drag
        } else if self.search.is_some() {
            ViewType::Search
        } else {
            ViewType::TaskList
        }
    }

    pub(super) fn visible_len(&self) -> usize {
        self.dashboard.visible_tasks().len()
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.dashboard.visible_task(self.selected).map(|task| task.id)
    }

    pub(super) fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub(super) const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Put the cursor on `id` when it is visible, otherwise keep the row
    /// index inside the visible range.
    pub(super) fn reselect(&mut self, id: Option<TaskId>) {
        if let Some(index) = id.and_then(|id| self.dashboard.visible_index_of(id)) {
            self.selected = index;
        } else {
            self.clamp_selection();
        }
    }

    pub(super) fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible_len().saturating_sub(1));
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let size = f.area();
        f.render_widget(Block::default().style(self.palette().base()), size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Self::FILTER_HEIGHT),
                Constraint::Min(Self::MAIN_MIN_HEIGHT),
                Constraint::Length(Self::STATUS_FOOTER_HEIGHT),
            ])
            .split(size);

        self.draw_filter_bar(f, chunks[0]);
        self.draw_task_list(f, chunks[1]);
        self.draw_status(f, chunks[2]);

        if let Some(form) = self.dashboard.editor().form() {
            self.draw_form_popup(f, form);
        }
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    /// Report a dashboard failure in the status line.
    pub(super) fn report(&mut self, context: &str, err: &DashboardError) {
        self.error(format!("{context}: {err}"));
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self, palette: Palette) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(palette.success),
            MessageLevel::Error => Style::default().fg(palette.error),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
