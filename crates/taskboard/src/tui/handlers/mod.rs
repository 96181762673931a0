use crossterm::event::{KeyEvent, KeyEventKind};
use taskboard_store::KeyValueStore;

use super::view::Ui;
use crate::config::ViewType;

pub(super) mod drag;
pub(super) mod form;
pub(super) mod navigation;
pub(super) mod search;

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.view_type() {
            ViewType::TaskList => self.handle_task_list_key(key),
            ViewType::Form => self.handle_form_key(key),
            ViewType::Search => self.handle_search_key(key),
            ViewType::Drag => self.handle_drag_key(key),
        }
    }
}
