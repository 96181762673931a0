use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_store::KeyValueStore;
use unicode_segmentation::UnicodeSegmentation;

use super::super::view::Ui;
use crate::config::{Action, ViewType};

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn handle_search_key(&mut self, key: KeyEvent) {
        let keep = self.selected_task_id();

        if self.keybindings.matches(ViewType::Search, Action::Cancel, &key) {
            if let Some(prompt) = self.search.take() {
                self.dashboard.set_search_text(prompt.previous);
            }
        } else if self.keybindings.matches(ViewType::Search, Action::Apply, &key) {
            self.search = None;
        } else if self.keybindings.matches(ViewType::Search, Action::Clear, &key) {
            self.dashboard.set_search_text(String::new());
        } else {
            let mut text = self.dashboard.filter().text.clone();
            match key.code {
                KeyCode::Backspace => {
                    if let Some((offset, _)) = text.grapheme_indices(true).next_back() {
                        text.truncate(offset);
                    }
                }
                KeyCode::Char(ch)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    text.push(ch);
                }
                _ => return,
            }
            self.dashboard.set_search_text(text);
        }

        self.reselect(keep);
    }
}
