use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use taskboard_app::{FormField, FormMode, TaskForm};
use taskboard_store::KeyValueStore;

use super::super::constants::{FORM_POPUP_HEIGHT, FORM_POPUP_MIN_WIDTH, FORM_POPUP_WIDTH_PERCENT};
use super::super::view::Ui;
use super::util::centered_popup;

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn draw_form_popup(&self, f: &mut Frame<'_>, form: &TaskForm) {
        let palette = self.palette();
        let popup_area = centered_popup(
            f.area(),
            FORM_POPUP_WIDTH_PERCENT,
            FORM_POPUP_MIN_WIDTH,
            FORM_POPUP_HEIGHT,
        );

        let title = match form.mode() {
            FormMode::Create => "New task",
            FormMode::Edit { .. } => "Edit task",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(palette.border())
            .style(palette.base());
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let mut constraints = vec![Constraint::Length(3); FormField::ALL.len()];
        constraints.push(Constraint::Min(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (field, row) in FormField::ALL.into_iter().zip(rows.iter()) {
            let focused = form.focus() == field;
            let label = if field.is_required() {
                format!("{field} *")
            } else {
                field.to_string()
            };
            let value = match field {
                FormField::Priority => format!("< {} >", form.value(field)),
                FormField::DueDate if form.value(field).is_empty() && !focused => {
                    "YYYY-MM-DD".to_owned()
                }
                _ => form.value(field).to_owned(),
            };
            let cursor = if focused && field != FormField::Priority { "_" } else { "" };
            let border_style = if focused {
                palette.border().add_modifier(Modifier::BOLD)
            } else {
                palette.muted()
            };
            let input = Paragraph::new(Line::from(vec![
                Span::raw(value),
                Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]))
            .block(
                Block::default()
                    .title(label)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
            f.render_widget(input, *row);
        }

        if let Some(hint_row) = rows.last() {
            let hint = Paragraph::new(Span::styled(
                "* required; space or ←/→ changes the priority",
                palette.muted(),
            ));
            f.render_widget(hint, *hint_row);
        }
    }
}
