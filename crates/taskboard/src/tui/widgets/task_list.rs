use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use taskboard_core::Task;
use taskboard_store::KeyValueStore;

use super::super::constants::{
    DRAG_HIGHLIGHT_SYMBOL, TASK_LIST_HIGHLIGHT_SYMBOL, TASK_TITLE_MAX_GRAPHEMES,
};
use super::super::theme::Palette;
use super::super::view::Ui;
use super::util::{completion_marker, truncate_with_ellipsis};

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.palette();
        let visible = self.dashboard.visible_tasks();
        let items: Vec<ListItem<'_>> = if visible.is_empty() {
            let message = if self.dashboard.tasks().is_empty() {
                "No tasks yet"
            } else {
                "No tasks match the current filters"
            };
            vec![ListItem::new(Line::from(Span::styled(message, palette.muted())))]
        } else {
            visible
                .iter()
                .map(|task| task_item(task, palette))
                .collect()
        };

        let dragging = self.dashboard.dragging().is_some();
        let title = format!(
            "Tasks ({}/{})",
            visible.len(),
            self.dashboard.tasks().len()
        );
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(palette.border()),
            )
            .highlight_style(if dragging {
                palette.highlight().add_modifier(Modifier::ITALIC)
            } else {
                palette.highlight()
            })
            .highlight_symbol(if dragging {
                DRAG_HIGHLIGHT_SYMBOL
            } else {
                TASK_LIST_HIGHLIGHT_SYMBOL
            });

        let mut state = ListState::default();
        if !visible.is_empty() {
            state.select(Some(self.selected.min(visible.len() - 1)));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}

fn task_item(task: &Task, palette: Palette) -> ListItem<'_> {
    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if task.completed {
        title_style = title_style
            .add_modifier(Modifier::CROSSED_OUT)
            .fg(palette.muted);
    }

    let headline = Line::from(vec![
        Span::raw(format!("{} ", completion_marker(task.completed))),
        Span::styled(
            format!("{:<6} ", task.priority.as_str()),
            Style::default().fg(palette.priority(task.priority)),
        ),
        Span::styled(
            truncate_with_ellipsis(&task.title, TASK_TITLE_MAX_GRAPHEMES),
            title_style,
        ),
    ]);

    let due = task
        .due_date_label()
        .map_or_else(|| "no due date".to_owned(), |label| format!("due {label}"));
    let mut meta = format!("      {due}");
    if let Some(category) = &task.category {
        meta.push_str(&format!(" | {category}"));
    }
    if !task.description.is_empty() {
        meta.push_str(" | ");
        meta.push_str(&truncate_with_ellipsis(&task.description, TASK_TITLE_MAX_GRAPHEMES));
    }

    ListItem::new(vec![headline, Line::from(Span::styled(meta, palette.muted()))])
}
