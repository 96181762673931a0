//! Composition root: task store, filter criteria, editor and drag state.

use taskboard_core::{Priority, PriorityFilter, Task, TaskFilter, TaskId, Theme, today_local};
use taskboard_store::{KeyValueStore, StorageAdapter, StorageError};
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

use crate::form::{FormError, TaskForm};
use crate::task_store::{TaskStore, TaskStoreError};

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Task store failure.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// Theme persistence failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Submit blocked by validation; the editor stays open.
    #[error(transparent)]
    Form(#[from] FormError),
    /// Submit or field access without an open editor.
    #[error("no editor is open")]
    EditorClosed,
    /// A visible row outside the current view was addressed.
    #[error("row {index} is outside the {len} visible tasks")]
    VisibleIndexOutOfRange {
        /// Requested visible row.
        index: usize,
        /// Number of visible rows.
        len: usize,
    },
}

/// Create/edit modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    /// No modal shown.
    #[default]
    Closed,
    /// Creating a new task.
    Create(TaskForm),
    /// Editing an existing task.
    Edit(TaskForm),
}

impl EditorState {
    /// Whether a modal is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The open form, if any.
    #[must_use]
    pub const fn form(&self) -> Option<&TaskForm> {
        match self {
            Self::Closed => None,
            Self::Create(form) | Self::Edit(form) => Some(form),
        }
    }

    const fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match self {
            Self::Closed => None,
            Self::Create(form) | Self::Edit(form) => Some(form),
        }
    }
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// A new task was appended.
    Created(TaskId),
    /// An existing task was updated in place.
    Updated(TaskId),
}

impl Submitted {
    /// Id of the affected task.
    #[must_use]
    pub const fn id(self) -> TaskId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    id: TaskId,
    origin: usize,
}

/// Dashboard state shared by every front end.
///
/// The visible subset is never cached: [`Dashboard::visible_tasks`] recomputes
/// it from the full list and the current criteria on every call.
#[derive(Debug)]
pub struct Dashboard<K> {
    store: TaskStore<K>,
    filter: TaskFilter,
    editor: EditorState,
    drag: Option<DragState>,
    theme: Theme,
    default_priority: Priority,
    clock: fn() -> Date,
}

impl<K: KeyValueStore> Dashboard<K> {
    /// Load tasks and theme through the adapter.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    pub fn open(adapter: StorageAdapter<K>, default_priority: Priority) -> Result<Self, DashboardError> {
        let theme = adapter.load_theme()?;
        let store = TaskStore::open(adapter)?;
        info!(tasks = store.len(), %theme, "Dashboard ready");
        Ok(Self {
            store,
            filter: TaskFilter::default(),
            editor: EditorState::Closed,
            drag: None,
            theme,
            default_priority,
            clock: today_local,
        })
    }

    /// Replace the source of "today" used by due-date buckets.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> Date) -> Self {
        self.clock = clock;
        self
    }

    /// Reference day for due-date buckets.
    #[must_use]
    pub fn today(&self) -> Date {
        (self.clock)()
    }

    /// Underlying task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore<K> {
        &self.store
    }

    /// Full task list in order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Active filter criteria.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Tasks passing the active criteria, in list order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.apply(self.store.tasks(), self.today())
    }

    /// Task shown at a visible row.
    #[must_use]
    pub fn visible_task(&self, index: usize) -> Option<&Task> {
        self.visible_tasks().get(index).copied()
    }

    /// Visible row of a task, if it passes the filter.
    #[must_use]
    pub fn visible_index_of(&self, id: TaskId) -> Option<usize> {
        self.visible_tasks().iter().position(|task| task.id == id)
    }

    /// Set the priority criterion.
    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.filter.priority = priority;
    }

    /// Advance the due-date criterion to the next bucket.
    pub fn cycle_due_filter(&mut self) {
        self.filter.due = self.filter.due.cycle();
    }

    /// Set the free-text search.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.filter.text = text.into();
    }

    /// Drop every criterion.
    pub fn clear_filter(&mut self) {
        self.filter = TaskFilter::default();
    }

    /// Current editor state.
    #[must_use]
    pub const fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Open a blank create form, replacing any open editor.
    pub fn open_create(&mut self) {
        self.editor = EditorState::Create(TaskForm::create(self.default_priority));
    }

    /// Open an edit form for a task. Returns `false` (and leaves the editor
    /// untouched) when the id is unknown.
    pub fn open_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.store.get(id) else {
            return false;
        };
        self.editor = EditorState::Edit(TaskForm::edit(task));
        true
    }

    /// Mutable access to the open form.
    pub const fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.editor.form_mut()
    }

    /// Close the editor without saving.
    pub fn cancel_editor(&mut self) {
        self.editor = EditorState::Closed;
    }

    /// Validate the open form and apply it. Success closes the editor; a
    /// validation failure keeps it open with its input intact.
    ///
    /// # Errors
    /// Returns [`DashboardError::EditorClosed`] without an open editor,
    /// [`DashboardError::Form`] on validation failure, or a store error.
    pub fn submit_editor(&mut self) -> Result<Submitted, DashboardError> {
        let submitted = match &self.editor {
            EditorState::Closed => return Err(DashboardError::EditorClosed),
            EditorState::Create(form) => {
                let task = form.submit()?;
                let id = task.id;
                self.store.insert(task)?;
                Submitted::Created(id)
            }
            EditorState::Edit(form) => {
                let task = form.submit()?;
                self.store.update(task.id, task.fields())?;
                Submitted::Updated(task.id)
            }
        };
        self.editor = EditorState::Closed;
        Ok(submitted)
    }

    /// Flip the completion flag of a task.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Option<bool>, DashboardError> {
        Ok(self.store.toggle_completed(id)?)
    }

    /// Delete a task. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn delete(&mut self, id: TaskId) -> Result<bool, DashboardError> {
        if self.drag.is_some_and(|drag| drag.id == id) {
            self.drag = None;
        }
        Ok(self.store.delete(id)?.is_some())
    }

    /// Active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme and persist the flag.
    ///
    /// # Errors
    /// Returns an error when the flag cannot be written.
    pub fn toggle_theme(&mut self) -> Result<Theme, DashboardError> {
        let theme = self.theme.toggled();
        self.store.adapter_mut().save_theme(theme)?;
        self.theme = theme;
        Ok(theme)
    }

    /// Task currently being dragged.
    #[must_use]
    pub fn dragging(&self) -> Option<TaskId> {
        self.drag.map(|drag| drag.id)
    }

    /// Start dragging the task at a visible row.
    ///
    /// # Errors
    /// Returns [`DashboardError::VisibleIndexOutOfRange`] for rows outside the view.
    pub fn begin_drag(&mut self, visible_index: usize) -> Result<TaskId, DashboardError> {
        let id = self.visible_id(visible_index)?;
        let origin = self.store.position(id).unwrap_or_default();
        self.drag = Some(DragState { id, origin });
        debug!(%id, origin, "Drag started");
        Ok(id)
    }

    /// Hover the dragged task over a visible row: it takes the full-list
    /// position of the task shown there. Repeating the same hover changes
    /// nothing. Returns whether the list changed.
    ///
    /// # Errors
    /// Returns [`DashboardError::VisibleIndexOutOfRange`] for rows outside the
    /// view, or a store error when the list cannot be saved.
    pub fn drag_over(&mut self, visible_index: usize) -> Result<bool, DashboardError> {
        let Some(drag) = self.drag else {
            return Ok(false);
        };
        let target = self.visible_id(visible_index)?;
        if target == drag.id {
            return Ok(false);
        }
        let Some(to) = self.store.position(target) else {
            return Ok(false);
        };
        let moved = self.store.move_task(drag.id, to)?;
        Ok(moved.is_some_and(|from| from != to))
    }

    /// Finish the gesture, keeping the current order.
    pub fn end_drag(&mut self) -> Option<TaskId> {
        self.drag.take().map(|drag| {
            debug!(id = %drag.id, "Drag finished");
            drag.id
        })
    }

    /// Abort the gesture and put the task back where it started.
    ///
    /// # Errors
    /// Returns a store error when the list cannot be saved.
    pub fn cancel_drag(&mut self) -> Result<(), DashboardError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        if self.store.is_empty() {
            return Ok(());
        }
        let origin = drag.origin.min(self.store.len() - 1);
        self.store.move_task(drag.id, origin)?;
        Ok(())
    }

    fn visible_id(&self, visible_index: usize) -> Result<TaskId, DashboardError> {
        let visible = self.visible_tasks();
        visible
            .get(visible_index)
            .map(|task| task.id)
            .ok_or(DashboardError::VisibleIndexOutOfRange {
                index: visible_index,
                len: visible.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use taskboard_core::{DueDateFilter, TaskFields};
    use taskboard_store::{MemoryStore, THEME_KEY};
    use time::macros::date;

    fn fixed_today() -> Date {
        date!(2025 - 03 - 10)
    }

    fn dashboard() -> Dashboard<MemoryStore> {
        Dashboard::open(StorageAdapter::new(MemoryStore::new()), Priority::Low)
            .unwrap_or_else(|err| panic!("open dashboard: {err}"))
            .with_clock(fixed_today)
    }

    fn create(dash: &mut Dashboard<MemoryStore>, title: &str, description: &str, priority: Priority) -> TaskId {
        dash.open_create();
        let Some(form) = dash.form_mut() else {
            panic!("create form must be open");
        };
        form.set_value(FormField::Title, title);
        form.set_value(FormField::Description, description);
        form.set_priority(priority);
        dash.submit_editor()
            .unwrap_or_else(|err| panic!("submit {title}: {err}"))
            .id()
    }

    fn visible_titles(dash: &Dashboard<MemoryStore>) -> Vec<String> {
        dash.visible_tasks().iter().map(|task| task.title.clone()).collect()
    }

    fn all_titles(dash: &Dashboard<MemoryStore>) -> Vec<String> {
        dash.tasks().iter().map(|task| task.title.clone()).collect()
    }

    #[test]
    fn editor_transitions() {
        let mut dash = dashboard();
        assert!(!dash.editor().is_open());

        dash.open_create();
        assert!(matches!(dash.editor(), EditorState::Create(_)));
        assert!(matches!(dash.submit_editor(), Err(DashboardError::Form(_))));
        assert!(matches!(dash.editor(), EditorState::Create(_)));

        dash.cancel_editor();
        assert_eq!(dash.editor(), &EditorState::Closed);
        assert!(matches!(dash.submit_editor(), Err(DashboardError::EditorClosed)));

        let id = create(&mut dash, "A", "d1", Priority::High);
        assert!(!dash.editor().is_open());
        assert!(dash.open_edit(id));
        assert!(matches!(dash.editor(), EditorState::Edit(_)));
        assert!(!dash.open_edit(TaskId::new()));
        assert!(matches!(dash.editor(), EditorState::Edit(_)));
    }

    #[test]
    fn edit_submit_updates_in_place() {
        let mut dash = dashboard();
        let a = create(&mut dash, "A", "d1", Priority::High);
        create(&mut dash, "B", "d2", Priority::Low);
        dash.toggle_completed(a).unwrap_or_else(|err| panic!("toggle: {err}"));

        assert!(dash.open_edit(a));
        if let Some(form) = dash.form_mut() {
            form.set_value(FormField::Title, "A2");
        }
        let submitted = dash.submit_editor().unwrap_or_else(|err| panic!("submit: {err}"));
        assert_eq!(submitted, Submitted::Updated(a));
        assert_eq!(all_titles(&dash), ["A2", "B"]);
        assert!(!dash.tasks()[0].completed, "an edit reopens the task");
    }

    #[test]
    fn priority_and_search_filters_compose() {
        let mut dash = dashboard();
        create(&mut dash, "A", "d1", Priority::High);
        create(&mut dash, "B", "d2", Priority::Low);

        dash.set_priority_filter(PriorityFilter::Only(Priority::High));
        assert_eq!(visible_titles(&dash), ["A"]);

        dash.set_priority_filter(PriorityFilter::All);
        dash.set_search_text("d2");
        assert_eq!(visible_titles(&dash), ["B"]);

        dash.set_search_text("d2 ");
        assert!(visible_titles(&dash).is_empty());

        dash.set_search_text("");
        assert_eq!(visible_titles(&dash), ["A", "B"]);
    }

    #[test]
    fn due_filter_uses_injected_clock() {
        let mut dash = dashboard();
        let a = create(&mut dash, "A", "today", Priority::Low);
        let b = create(&mut dash, "B", "tomorrow", Priority::Low);
        create(&mut dash, "C", "undated", Priority::Low);
        let store = &mut dash.store;
        store
            .update(a, TaskFields::new("A", "today").with_due_date(Some(date!(2025 - 03 - 10))))
            .unwrap_or_else(|err| panic!("update: {err}"));
        store
            .update(b, TaskFields::new("B", "tomorrow").with_due_date(Some(date!(2025 - 03 - 11))))
            .unwrap_or_else(|err| panic!("update: {err}"));

        dash.cycle_due_filter();
        assert_eq!(dash.filter().due, DueDateFilter::Today);
        assert_eq!(visible_titles(&dash), ["A"]);
        dash.cycle_due_filter();
        assert_eq!(visible_titles(&dash), ["B"]);
        dash.cycle_due_filter();
        assert_eq!(visible_titles(&dash), ["A", "B", "C"]);
    }

    #[test]
    fn drag_moves_by_visible_rows_and_is_idempotent() {
        let mut dash = dashboard();
        for title in ["A", "B", "C", "D"] {
            create(&mut dash, title, "body", if title == "B" { Priority::Low } else { Priority::High });
        }
        dash.set_priority_filter(PriorityFilter::Only(Priority::High));
        assert_eq!(visible_titles(&dash), ["A", "C", "D"]);

        let dragged = dash.begin_drag(0).unwrap_or_else(|err| panic!("begin: {err}"));
        assert_eq!(dash.dragging(), Some(dragged));
        let saves = dash.store().adapter().backend().writes();

        assert!(dash.drag_over(2).unwrap_or_else(|err| panic!("over: {err}")));
        assert_eq!(all_titles(&dash), ["B", "C", "D", "A"]);
        assert!(!dash.drag_over(2).unwrap_or_else(|err| panic!("over: {err}")));
        assert_eq!(all_titles(&dash), ["B", "C", "D", "A"]);
        assert_eq!(dash.store().adapter().backend().writes(), saves + 1);

        assert_eq!(dash.end_drag(), Some(dragged));
        assert_eq!(dash.dragging(), None);
        assert!(!dash.drag_over(0).unwrap_or_else(|err| panic!("over: {err}")));
    }

    #[test]
    fn cancel_drag_restores_origin() {
        let mut dash = dashboard();
        for title in ["A", "B", "C"] {
            create(&mut dash, title, "body", Priority::Low);
        }
        dash.begin_drag(0).unwrap_or_else(|err| panic!("begin: {err}"));
        dash.drag_over(2).unwrap_or_else(|err| panic!("over: {err}"));
        assert_eq!(all_titles(&dash), ["B", "C", "A"]);

        dash.cancel_drag().unwrap_or_else(|err| panic!("cancel: {err}"));
        assert_eq!(all_titles(&dash), ["A", "B", "C"]);
        assert_eq!(dash.dragging(), None);
    }

    #[test]
    fn drag_rejects_rows_outside_the_view() {
        let mut dash = dashboard();
        create(&mut dash, "A", "body", Priority::Low);
        assert!(matches!(
            dash.begin_drag(1),
            Err(DashboardError::VisibleIndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn theme_toggle_persists() {
        let mut dash = dashboard();
        assert_eq!(dash.theme(), Theme::Light);
        assert_eq!(dash.toggle_theme().unwrap_or_else(|err| panic!("toggle: {err}")), Theme::Dark);
        assert_eq!(dash.store().adapter().backend().raw(THEME_KEY), Some("dark"));

        let backend = dash.store.adapter().backend().clone();
        let reopened = Dashboard::open(StorageAdapter::new(backend), Priority::Low)
            .unwrap_or_else(|err| panic!("reopen: {err}"));
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn deleting_the_dragged_task_ends_the_drag() {
        let mut dash = dashboard();
        let a = create(&mut dash, "A", "body", Priority::Low);
        create(&mut dash, "B", "body", Priority::Low);
        dash.begin_drag(0).unwrap_or_else(|err| panic!("begin: {err}"));
        assert!(dash.delete(a).unwrap_or_else(|err| panic!("delete: {err}")));
        assert_eq!(dash.dragging(), None);
        assert!(!dash.delete(a).unwrap_or_else(|err| panic!("delete: {err}")));
    }
}
