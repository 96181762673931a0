use crossterm::event::KeyEvent;
use taskboard_core::{Priority, PriorityFilter};
use taskboard_store::KeyValueStore;

use super::super::view::{SearchPrompt, Ui};
use crate::config::{Action, ViewType};

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn handle_task_list_key(&mut self, key: KeyEvent) {
        let Some(action) = self.task_list_action(&key) else {
            return;
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::Down => self.select_next(),
            Action::Up => self.select_prev(),
            Action::CreateTask => self.dashboard.open_create(),
            Action::EditTask => self.open_edit_selected(),
            Action::DeleteTask => self.delete_selected(),
            Action::ToggleCompleted => self.toggle_selected(),
            Action::FilterAll => self.set_priority_filter(PriorityFilter::All),
            Action::FilterLow => self.set_priority_filter(PriorityFilter::Only(Priority::Low)),
            Action::FilterMedium => self.set_priority_filter(PriorityFilter::Only(Priority::Medium)),
            Action::FilterHigh => self.set_priority_filter(PriorityFilter::Only(Priority::High)),
            Action::CycleDueFilter => {
                let keep = self.selected_task_id();
                self.dashboard.cycle_due_filter();
                self.reselect(keep);
                self.info(format!("Due filter: {}", self.dashboard.filter().due));
            }
            Action::Search => {
                self.search = Some(SearchPrompt {
                    previous: self.dashboard.filter().text.clone(),
                });
            }
            Action::ClearFilters => {
                let keep = self.selected_task_id();
                self.dashboard.clear_filter();
                self.reselect(keep);
                self.info("Filters cleared");
            }
            Action::ToggleTheme => match self.dashboard.toggle_theme() {
                Ok(theme) => self.info(format!("Theme: {theme}")),
                Err(err) => self.report("Failed to save theme", &err),
            },
            Action::StartDrag => self.start_drag(),
            _ => {}
        }
    }

    fn task_list_action(&self, key: &KeyEvent) -> Option<Action> {
        const ACTIONS: [Action; 16] = [
            Action::Quit,
            Action::Down,
            Action::Up,
            Action::CreateTask,
            Action::EditTask,
            Action::DeleteTask,
            Action::ToggleCompleted,
            Action::FilterAll,
            Action::FilterLow,
            Action::FilterMedium,
            Action::FilterHigh,
            Action::CycleDueFilter,
            Action::Search,
            Action::ClearFilters,
            Action::ToggleTheme,
            Action::StartDrag,
        ];
        ACTIONS
            .into_iter()
            .find(|action| self.keybindings.matches(ViewType::TaskList, *action, key))
    }

    fn set_priority_filter(&mut self, priority: PriorityFilter) {
        let keep = self.selected_task_id();
        self.dashboard.set_priority_filter(priority);
        self.reselect(keep);
        self.info(format!("Priority filter: {}", priority.label()));
    }

    fn open_edit_selected(&mut self) {
        match self.selected_task_id() {
            Some(id) if self.dashboard.open_edit(id) => {}
            _ => self.error("No task selected to edit"),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            self.error("No task selected to delete");
            return;
        };
        match self.dashboard.delete(id) {
            Ok(true) => {
                self.clamp_selection();
                self.info("Task deleted");
            }
            Ok(false) => self.error("Task no longer exists"),
            Err(err) => self.report("Failed to delete task", &err),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            self.error("No task selected");
            return;
        };
        match self.dashboard.toggle_completed(id) {
            Ok(Some(true)) => self.info("Marked as completed"),
            Ok(Some(false)) => self.info("Marked as open"),
            Ok(None) => self.error("Task no longer exists"),
            Err(err) => self.report("Failed to update task", &err),
        }
        self.reselect(Some(id));
    }

    fn start_drag(&mut self) {
        if self.visible_len() == 0 {
            self.error("Nothing to reorder");
            return;
        }
        if let Err(err) = self.dashboard.begin_drag(self.selected) {
            self.report("Failed to start reordering", &err);
        }
    }
}
