use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use taskboard_store::KeyValueStore;

use super::super::view::Ui;

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn draw_filter_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.palette();
        let filter = self.dashboard.filter();
        let search_style = if self.search.is_some() {
            palette.highlight()
        } else {
            Style::default()
        };
        let search_text = if self.search.is_some() {
            format!("{}_", filter.text)
        } else if filter.text.is_empty() {
            "-".to_owned()
        } else {
            filter.text.clone()
        };

        let line = Line::from(vec![
            Span::styled("Priority: ", palette.muted()),
            Span::raw(filter.priority.label()),
            Span::styled("  Due: ", palette.muted()),
            Span::raw(filter.due.to_string()),
            Span::styled("  Search: ", palette.muted()),
            Span::styled(search_text, search_style),
        ]);

        let bar = Paragraph::new(line).block(
            Block::default()
                .title(format!("Filters [{}]", self.dashboard.theme()))
                .borders(Borders::ALL)
                .border_style(palette.border()),
        );
        f.render_widget(bar, area);
    }

    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.palette();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Self::INSTRUCTIONS_HEIGHT),
                Constraint::Min(Self::STATUS_MESSAGE_HEIGHT),
            ])
            .split(area);

        let instructions = Paragraph::new(self.instructions())
            .block(Block::default().title("Keys").borders(Borders::ALL))
            .style(palette.muted())
            .wrap(Wrap { trim: true });
        f.render_widget(instructions, rows[0]);

        let message = Paragraph::new(self.status_text())
            .block(Block::default().title("Status").borders(Borders::ALL))
            .style(
                self.message
                    .as_ref()
                    .map_or_else(Style::default, |msg| msg.style(palette)),
            );
        f.render_widget(message, rows[1]);
    }

    pub(in crate::tui) fn instructions(&self) -> String {
        self.keybindings.generate_help_text(self.view_type())
    }

    fn status_text(&self) -> Cow<'_, str> {
        self.message
            .as_ref()
            .map_or(Cow::Borrowed(""), |msg| Cow::Borrowed(msg.text.as_str()))
    }
}
