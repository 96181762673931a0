use anyhow::{Context, Result, anyhow, bail};
use taskboard_app::{FormField, TaskForm, TaskStore};
use taskboard_core::{
    DueDateFilter, Priority, PriorityFilter, Task, TaskFields, TaskFilter, TaskId, Theme, today_local,
};
use taskboard_store::{KeyValueStore, StorageAdapter};

use crate::{Command, LsFormat, ThemeArg};

/// Shortest id prefix accepted on the command line.
const MIN_ID_PREFIX: usize = 4;

/// Service façade used by the non-interactive commands.
pub struct TaskService<K> {
    store: TaskStore<K>,
    default_priority: Priority,
}

impl<K: KeyValueStore> TaskService<K> {
    pub fn open(adapter: StorageAdapter<K>, default_priority: Priority) -> Result<Self> {
        let store = TaskStore::open(adapter).context("failed to load tasks")?;
        Ok(Self {
            store,
            default_priority,
        })
    }

    #[cfg(test)]
    pub(crate) const fn store(&self) -> &TaskStore<K> {
        &self.store
    }

    fn add(&mut self, input: AddTaskInput) -> Result<TaskId> {
        let AddTaskInput {
            title,
            description,
            due,
            priority,
            category,
        } = input;
        let mut form = TaskForm::create(self.default_priority);
        form.set_value(FormField::Title, title);
        form.set_value(FormField::Description, description);
        if let Some(due) = due {
            form.set_value(FormField::DueDate, due);
        }
        if let Some(priority) = priority {
            form.set_priority(parse_priority(&priority)?);
        }
        if let Some(category) = category {
            form.set_value(FormField::Category, category);
        }
        let fields = form.validate()?;
        Ok(self.store.add(fields)?)
    }

    fn edit(&mut self, id: TaskId, patch: EditTaskInput) -> Result<TaskFields> {
        let task = self
            .store
            .get(id)
            .ok_or_else(|| anyhow!("task {id} not found"))?;
        let mut form = TaskForm::edit(task);
        let EditTaskInput {
            title,
            description,
            due,
            priority,
            category,
        } = patch;
        for (field, value) in [
            (FormField::Title, title),
            (FormField::Description, description),
            (FormField::DueDate, due),
            (FormField::Category, category),
        ] {
            if let Some(value) = value {
                form.set_value(field, value);
            }
        }
        if let Some(priority) = priority {
            form.set_priority(parse_priority(&priority)?);
        }
        let fields = form.validate()?;
        self.store.update(id, fields.clone())?;
        Ok(fields)
    }

    fn resolve(&self, raw: &str) -> Result<TaskId> {
        resolve_task_id(self.store.tasks(), raw)
    }
}

/// Execute a non-interactive command.
pub fn run<K: KeyValueStore>(command: Command, service: &mut TaskService<K>) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            due,
            priority,
            category,
        } => {
            let id = service.add(AddTaskInput {
                title,
                description,
                due,
                priority,
                category,
            })?;
            println!("created task: {id}");
        }
        Command::Edit {
            task,
            title,
            description,
            due,
            priority,
            category,
        } => {
            let id = service.resolve(&task)?;
            let fields = service.edit(
                id,
                EditTaskInput {
                    title,
                    description,
                    due,
                    priority,
                    category,
                },
            )?;
            println!("updated task: {id} ({})", fields.title);
        }
        Command::Rm { task } => {
            let id = service.resolve(&task)?;
            if let Some(removed) = service.store.delete(id)? {
                println!("deleted task: {id} ({})", removed.title);
            }
        }
        Command::Done { task } => {
            let id = service.resolve(&task)?;
            if let Some(completed) = service.store.toggle_completed(id)? {
                let state = if completed { "completed" } else { "reopened" };
                println!("{state} task: {id}");
            }
        }
        Command::Ls {
            priority,
            due,
            search,
            format,
        } => {
            let filter = build_filter(&priority, &due, search)?;
            let today = today_local();
            let tasks = filter.apply(service.store.tasks(), today);

            if tasks.is_empty() && format == LsFormat::Table {
                if filter.is_empty() {
                    println!("No tasks found");
                } else {
                    println!("No tasks matched the provided filters ({})", filter.summary());
                }
                return Ok(());
            }

            match format {
                LsFormat::Table => render_task_table(service.store.tasks(), &tasks),
                LsFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
            }
        }
        Command::Mv { from, to } => {
            let from_index = position_to_index(from)?;
            let to_index = position_to_index(to)?;
            service.store.reorder(from_index, to_index)?;
            println!("moved task from position {from} to {to}");
        }
        Command::Theme { value } => {
            let adapter = service.store.adapter_mut();
            let current = adapter.load_theme()?;
            let next = match value {
                None => {
                    println!("{current}");
                    return Ok(());
                }
                Some(ThemeArg::Light) => Theme::Light,
                Some(ThemeArg::Dark) => Theme::Dark,
                Some(ThemeArg::Toggle) => current.toggled(),
            };
            adapter.save_theme(next)?;
            println!("theme: {next}");
        }
        Command::InitConfig { .. } | Command::Tui => {
            bail!("this command is not handled by the task service")
        }
    }

    Ok(())
}

fn build_filter(priority: &str, due: &str, search: Option<String>) -> Result<TaskFilter> {
    let priority: PriorityFilter = priority.parse()?;
    let due: DueDateFilter = due.parse()?;
    let mut filter = TaskFilter::new().with_priority(priority).with_due(due);
    if let Some(text) = search {
        filter = filter.with_text(text);
    }
    Ok(filter)
}

fn parse_priority(raw: &str) -> Result<Priority> {
    raw.parse::<Priority>().map_err(Into::into)
}

fn position_to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("positions start at 1"))
}

fn render_task_table(all: &[Task], visible: &[&Task]) {
    println!("# | Done | Priority | Due | Title | Category | ID");
    println!("- | ---- | -------- | --- | ----- | -------- | --");

    for task in visible {
        let position = all
            .iter()
            .position(|candidate| candidate.id == task.id)
            .map_or(0, |index| index + 1);
        let done = if task.completed { "x" } else { " " };
        let due = task.due_date_label().unwrap_or_else(|| "-".to_owned());
        let category = task.category.as_deref().unwrap_or("-");
        println!(
            "{position} | [{done}] | {} | {due} | {} | {category} | {}",
            task.priority, task.title, task.id
        );
    }
}

/// Resolve a full id or a unique id prefix against the list.
fn resolve_task_id(tasks: &[Task], raw: &str) -> Result<TaskId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<TaskId>() {
        return if tasks.iter().any(|task| task.id == id) {
            Ok(id)
        } else {
            Err(anyhow!("no task matches id {raw}"))
        };
    }
    if raw.len() < MIN_ID_PREFIX {
        bail!("Invalid task id: {raw} (use at least {MIN_ID_PREFIX} characters of the id)");
    }
    let needle = raw.to_ascii_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (None, _) => Err(anyhow!("no task matches id {raw}")),
        (Some(_), Some(_)) => Err(anyhow!("id prefix {raw} is ambiguous")),
    }
}

struct AddTaskInput {
    title: String,
    description: String,
    due: Option<String>,
    priority: Option<String>,
    category: Option<String>,
}

struct EditTaskInput {
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    category: Option<String>,
}
