use crossterm::event::KeyEvent;
use taskboard_store::KeyValueStore;

use super::super::view::Ui;
use crate::config::{Action, ViewType};

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn handle_drag_key(&mut self, key: KeyEvent) {
        if self.keybindings.matches(ViewType::Drag, Action::Down, &key) {
            self.drag_to(self.selected.saturating_add(1));
        } else if self.keybindings.matches(ViewType::Drag, Action::Up, &key) {
            if let Some(target) = self.selected.checked_sub(1) {
                self.drag_to(target);
            }
        } else if self.keybindings.matches(ViewType::Drag, Action::Drop, &key) {
            if let Some(id) = self.dashboard.end_drag() {
                self.reselect(Some(id));
                self.info("Task moved");
            }
        } else if self.keybindings.matches(ViewType::Drag, Action::Cancel, &key) {
            let id = self.dashboard.dragging();
            if let Err(err) = self.dashboard.cancel_drag() {
                self.report("Failed to restore order", &err);
            }
            self.reselect(id);
        }
    }

    /// Hover the dragged task over a visible row; the cursor follows it.
    fn drag_to(&mut self, target: usize) {
        if target >= self.visible_len() {
            return;
        }
        match self.dashboard.drag_over(target) {
            Ok(_) => self.reselect(self.dashboard.dragging()),
            Err(err) => self.report("Failed to move task", &err),
        }
    }
}
