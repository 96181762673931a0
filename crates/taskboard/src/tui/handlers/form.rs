use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_app::{DashboardError, FormField, Submitted};
use taskboard_store::KeyValueStore;

use super::super::view::Ui;
use crate::config::{Action, ViewType};

impl<K: KeyValueStore> Ui<K> {
    pub(in crate::tui) fn handle_form_key(&mut self, key: KeyEvent) {
        if self.keybindings.matches(ViewType::Form, Action::Cancel, &key) {
            self.dashboard.cancel_editor();
            return;
        }
        if self.keybindings.matches(ViewType::Form, Action::Submit, &key) {
            self.submit_form();
            return;
        }

        let next = self.keybindings.matches(ViewType::Form, Action::NextField, &key);
        let prev = self.keybindings.matches(ViewType::Form, Action::PrevField, &key);
        let clear = self.keybindings.matches(ViewType::Form, Action::ClearField, &key);
        let Some(form) = self.dashboard.form_mut() else {
            return;
        };

        if next {
            form.focus_next();
        } else if prev {
            form.focus_prev();
        } else if clear {
            form.clear_field();
        } else {
            match key.code {
                KeyCode::Backspace => form.backspace(),
                KeyCode::Left | KeyCode::Right if form.focus() == FormField::Priority => {
                    form.cycle_priority();
                }
                KeyCode::Char(ch)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    form.insert_char(ch);
                }
                _ => {}
            }
        }
    }

    fn submit_form(&mut self) {
        match self.dashboard.submit_editor() {
            Ok(submitted) => {
                let id = submitted.id();
                match submitted {
                    Submitted::Created(_) => self.info("Task created"),
                    Submitted::Updated(_) => self.info("Task updated"),
                }
                self.reselect(Some(id));
            }
            Err(DashboardError::Form(err)) => {
                let field = err.field();
                if let Some(form) = self.dashboard.form_mut() {
                    form.set_focus(field);
                }
                self.error(err.to_string());
            }
            Err(err) => self.report("Failed to save task", &err),
        }
    }
}
