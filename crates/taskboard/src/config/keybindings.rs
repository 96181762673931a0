//! Keybindings configuration for the TUI.

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use taskboard_app::{DefaultsConfig, StorageConfig};

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Declares the key table of one view: the struct, its defaults and the
/// `(action, keys)` listing used by validation.
macro_rules! view_bindings {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$field_meta:meta])* $field:ident => [$($key:expr),+ $(,)?] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: Vec<String>, )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: vec_of_strings![$($key),+], )+
                }
            }
        }

        impl $name {
            fn bindings(&self) -> Vec<(&'static str, &[String])> {
                vec![$( (stringify!($field), self.$field.as_slice()), )+]
            }
        }
    };
}

/// Full contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// `[storage]` table, read by the application layer.
    #[serde(default)]
    pub storage: StorageConfig,
    /// `[defaults]` table, read by the application layer.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// TUI configuration.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Keybindings configuration.
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
}

/// Keybindings for every TUI view. A view table that is present must list
/// all of its actions; absent tables keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Keybindings for the task list.
    #[serde(default)]
    pub task_list: TaskListKeyBindings,
    /// Keybindings for the create/edit form.
    #[serde(default)]
    pub form: FormKeyBindings,
    /// Keybindings for the search prompt.
    #[serde(default)]
    pub search: SearchKeyBindings,
    /// Keybindings while a task is being dragged.
    #[serde(default)]
    pub drag: DragKeyBindings,
}

view_bindings! {
    /// Keybindings for the task list.
    TaskListKeyBindings {
        /// Quit the application.
        quit => ["q", "Esc"],
        /// Move the cursor down.
        down => ["j", "Down"],
        /// Move the cursor up.
        up => ["k", "Up"],
        /// Open the create form.
        create_task => ["n", "a"],
        /// Open the edit form for the selected task.
        edit_task => ["e", "Enter"],
        /// Delete the selected task.
        delete_task => ["d", "Delete"],
        /// Toggle completion of the selected task.
        toggle_completed => ["x", "Space"],
        /// Show every priority.
        filter_all => ["0"],
        /// Show low priority tasks only.
        filter_low => ["1"],
        /// Show medium priority tasks only.
        filter_medium => ["2"],
        /// Show high priority tasks only.
        filter_high => ["3"],
        /// Cycle the due date filter.
        cycle_due_filter => ["t"],
        /// Edit the search text.
        search => ["/"],
        /// Reset every filter.
        clear_filters => ["c"],
        /// Switch between light and dark theme.
        toggle_theme => ["T"],
        /// Pick up the selected task for reordering.
        start_drag => ["m"],
    }
}

view_bindings! {
    /// Keybindings for the create/edit form. Printable keys type into the
    /// focused field, so these should use special keys.
    FormKeyBindings {
        /// Close the form without saving.
        cancel => ["Esc"],
        /// Validate and save.
        submit => ["Enter"],
        /// Focus the next field.
        next_field => ["Tab", "Down"],
        /// Focus the previous field.
        prev_field => ["BackTab", "Up"],
        /// Empty the focused field.
        clear_field => ["Ctrl+u"],
    }
}

view_bindings! {
    /// Keybindings for the search prompt.
    SearchKeyBindings {
        /// Restore the previous search text.
        cancel => ["Esc"],
        /// Keep the typed search text.
        apply => ["Enter"],
        /// Empty the search text.
        clear => ["Ctrl+u"],
    }
}

view_bindings! {
    /// Keybindings while a task is being dragged.
    DragKeyBindings {
        /// Move the dragged task down.
        down => ["j", "Down"],
        /// Move the dragged task up.
        up => ["k", "Up"],
        /// Drop the task at its current position.
        drop => ["Enter", "m", "Space"],
        /// Put the task back where it started.
        cancel => ["Esc"],
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/taskboard/config.toml`
/// On macOS: `~/Library/Application Support/taskboard/config.toml`
/// On Windows: `%APPDATA%\taskboard\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    taskboard_app::AppConfig::default_path()
}

/// Generate default configuration as TOML string.
pub fn generate_default_config_toml() -> Result<String> {
    let config = Config::default();

    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize the default configuration")?;

    let header = r#"# taskboard configuration
#
# [storage]
# dir = "/path/to/data"   # holds the `tasks` and `theme` files (defaults to the platform data dir)
#
# [defaults]
# priority = "low" | "medium" | "high"   # preselected in the create form
#
# [tui.keybindings.<view>]
# Each action can have multiple key bindings. A view table that is present
# must define every action of that view; omitted views keep their defaults.
#
# Supported key formats:
# - Single characters: "j", "k", "/", "1"
# - Special keys: "Enter", "Esc", "Tab", "BackTab", "Backspace", "Delete", "Space"
# - Arrow keys: "Up", "Down", "Left", "Right"
# - Navigation keys: "Home", "End", "PageUp", "PageDown"
# - Modified keys: "Ctrl+d", "Alt+k", "Shift+Up"

"#;

    Ok(format!("{header}{toml_str}"))
}

/// Load configuration from a TOML file.
///
/// # Returns
/// - `Ok(Some(config))` if the file exists and was successfully parsed
/// - `Ok(None)` if the file does not exist
/// - `Err(_)` if there was an error reading or parsing the file
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Load and validate the keybindings, falling back to the defaults when no
/// configuration file exists.
pub fn load_keybindings(path: Option<&Path>) -> Result<KeyBindingsConfig> {
    let keybindings = load_config(path)?
        .map(|config| config.tui.keybindings)
        .unwrap_or_default();
    validate_keybindings_config(&keybindings)?;
    Ok(keybindings)
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "j" -> `KeyCode::Char('j')`
/// - "Enter" -> `KeyCode::Enter`
/// - "Ctrl+d" -> `KeyCode::Char('d')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    let mut parts: Vec<&str> = s.split('+').collect();
    let Some(key_part) = parts.pop() else {
        bail!("Empty key string");
    };

    let mut modifiers = KeyModifiers::NONE;
    for modifier in parts {
        match modifier {
            "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
            "Alt" => modifiers |= KeyModifiers::ALT,
            "Shift" => modifiers |= KeyModifiers::SHIFT,
            other => bail!("Unknown modifier: {other}"),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Tab" => Ok(KeyCode::Tab),
        "BackTab" => Ok(KeyCode::BackTab),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        "Space" => Ok(KeyCode::Char(' ')),
        s if s.chars().count() == 1 => {
            let ch = s.chars().next().ok_or_else(|| anyhow!("Empty char"))?;
            Ok(KeyCode::Char(ch))
        }
        "" => bail!("Empty key string"),
        other => bail!("Unknown key: {other}"),
    }
}

/// Normalized form used for comparisons. Terminals report shifted
/// characters and `BackTab` with SHIFT set, so it is dropped for those.
fn key_signature(event: &KeyEvent) -> (KeyCode, KeyModifiers) {
    let mut modifiers = event.modifiers;
    if matches!(event.code, KeyCode::Char(_) | KeyCode::BackTab) {
        modifiers.remove(KeyModifiers::SHIFT);
    }
    (event.code, modifiers)
}

/// Validate the keybindings configuration.
///
/// Checks for:
/// - Empty key bindings
/// - Invalid key expressions
/// - Key conflicts within each view
pub fn validate_keybindings_config(config: &KeyBindingsConfig) -> Result<()> {
    for (view, bindings) in config.views() {
        validate_view(view, &bindings)?;
    }
    Ok(())
}

fn validate_view(view: ViewType, bindings: &[(&'static str, &[String])]) -> Result<()> {
    let mut key_to_actions: HashMap<(KeyCode, KeyModifiers), Vec<&str>> = HashMap::new();

    for &(action, keys) in bindings {
        if keys.is_empty() {
            bail!("{}.{action} must have at least one key binding", view.table_name());
        }
        for key in keys {
            let event = parse_key(key)
                .with_context(|| format!("Invalid key '{key}' in {}.{action}", view.table_name()))?;
            key_to_actions.entry(key_signature(&event)).or_default().push(action);
        }
    }

    let mut conflicts: Vec<_> = key_to_actions
        .into_iter()
        .filter(|(_, actions)| actions.len() > 1)
        .collect();
    conflicts.sort_by(|a, b| a.1.cmp(&b.1));
    if let Some(((code, _), actions)) = conflicts.first() {
        bail!(
            "Key {code:?} is bound to multiple actions in {}: {actions:?}",
            view.table_name()
        );
    }

    Ok(())
}

/// View type for keybinding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// Task list.
    TaskList,
    /// Create/edit form.
    Form,
    /// Search prompt.
    Search,
    /// Drag in progress.
    Drag,
}

impl ViewType {
    const fn table_name(self) -> &'static str {
        match self {
            Self::TaskList => "task_list",
            Self::Form => "form",
            Self::Search => "search",
            Self::Drag => "drag",
        }
    }
}

/// Action that can be performed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Shared
    /// Quit the application.
    Quit,
    /// Move down.
    Down,
    /// Move up.
    Up,
    /// Leave the current mode without applying it.
    Cancel,

    // TaskList
    /// Open the create form.
    CreateTask,
    /// Open the edit form.
    EditTask,
    /// Delete the selected task.
    DeleteTask,
    /// Toggle completion.
    ToggleCompleted,
    /// Show every priority.
    FilterAll,
    /// Low priority only.
    FilterLow,
    /// Medium priority only.
    FilterMedium,
    /// High priority only.
    FilterHigh,
    /// Cycle the due date filter.
    CycleDueFilter,
    /// Edit the search text.
    Search,
    /// Reset every filter.
    ClearFilters,
    /// Switch theme.
    ToggleTheme,
    /// Pick up the selected task.
    StartDrag,

    // Form
    /// Save the form.
    Submit,
    /// Next field.
    NextField,
    /// Previous field.
    PrevField,
    /// Empty the focused field.
    ClearField,

    // Search
    /// Keep the typed text.
    Apply,
    /// Empty the search text.
    Clear,

    // Drag
    /// Drop the dragged task.
    Drop,
}

impl KeyBindingsConfig {
    fn views(&self) -> [(ViewType, Vec<(&'static str, &[String])>); 4] {
        [
            (ViewType::TaskList, self.task_list.bindings()),
            (ViewType::Form, self.form.bindings()),
            (ViewType::Search, self.search.bindings()),
            (ViewType::Drag, self.drag.bindings()),
        ]
    }

    /// Generate the footer help line for a view.
    pub fn generate_help_text(&self, view: ViewType) -> String {
        match view {
            ViewType::TaskList => self.generate_task_list_help(),
            ViewType::Form => format!(
                "{}:next {}:prev {}:clear field {}:save {}:cancel",
                Self::format_first_key(&self.form.next_field),
                Self::format_first_key(&self.form.prev_field),
                Self::format_first_key(&self.form.clear_field),
                Self::format_first_key(&self.form.submit),
                Self::format_first_key(&self.form.cancel),
            ),
            ViewType::Search => format!(
                "type to search {}:apply {}:clear {}:cancel",
                Self::format_first_key(&self.search.apply),
                Self::format_first_key(&self.search.clear),
                Self::format_first_key(&self.search.cancel),
            ),
            ViewType::Drag => format!(
                "{}:move {}:drop {}:cancel",
                Self::format_key_pair(&self.drag.down, &self.drag.up),
                Self::format_first_key(&self.drag.drop),
                Self::format_first_key(&self.drag.cancel),
            ),
        }
    }

    fn generate_task_list_help(&self) -> String {
        let keys = &self.task_list;
        format!(
            "{}:move {}:new {}:edit {}:done {}:delete {}/{}/{}/{}:priority {}:due {}:search {}:clear {}:reorder {}:theme {}:quit",
            Self::format_key_pair(&keys.down, &keys.up),
            Self::format_first_key(&keys.create_task),
            Self::format_first_key(&keys.edit_task),
            Self::format_first_key(&keys.toggle_completed),
            Self::format_first_key(&keys.delete_task),
            Self::format_first_key(&keys.filter_all),
            Self::format_first_key(&keys.filter_low),
            Self::format_first_key(&keys.filter_medium),
            Self::format_first_key(&keys.filter_high),
            Self::format_first_key(&keys.cycle_due_filter),
            Self::format_first_key(&keys.search),
            Self::format_first_key(&keys.clear_filters),
            Self::format_first_key(&keys.start_drag),
            Self::format_first_key(&keys.toggle_theme),
            Self::format_first_key(&keys.quit),
        )
    }

    /// Format the first key of a key binding list for display.
    fn format_first_key(keys: &[String]) -> String {
        keys.first()
            .map_or_else(|| "?".to_string(), |k| Self::format_key_display(k))
    }

    /// Format two keys as a pair (e.g., "j/k" for down/up).
    fn format_key_pair(down: &[String], up: &[String]) -> String {
        format!("{}/{}", Self::format_first_key(down), Self::format_first_key(up))
    }

    /// Format a key for display, converting special keys to readable symbols.
    fn format_key_display(key: &str) -> String {
        match key {
            "Enter" => "↵".to_string(),
            "Backspace" => "BS".to_string(),
            "Delete" => "Del".to_string(),
            "BackTab" => "S-Tab".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => other.replace('+', "-"),
            other => other.to_string(),
        }
    }

    /// Check if a key event matches a configured action in a view.
    pub fn matches(&self, view: ViewType, action: Action, key: &KeyEvent) -> bool {
        let actual = key_signature(key);
        self.get_keys(view, action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| key_signature(&expected) == actual)
    }

    fn get_keys(&self, view: ViewType, action: Action) -> &[String] {
        use Action as A;
        use ViewType as V;

        match (view, action) {
            (V::TaskList, A::Quit) => &self.task_list.quit,
            (V::TaskList, A::Down) => &self.task_list.down,
            (V::TaskList, A::Up) => &self.task_list.up,
            (V::TaskList, A::CreateTask) => &self.task_list.create_task,
            (V::TaskList, A::EditTask) => &self.task_list.edit_task,
            (V::TaskList, A::DeleteTask) => &self.task_list.delete_task,
            (V::TaskList, A::ToggleCompleted) => &self.task_list.toggle_completed,
            (V::TaskList, A::FilterAll) => &self.task_list.filter_all,
            (V::TaskList, A::FilterLow) => &self.task_list.filter_low,
            (V::TaskList, A::FilterMedium) => &self.task_list.filter_medium,
            (V::TaskList, A::FilterHigh) => &self.task_list.filter_high,
            (V::TaskList, A::CycleDueFilter) => &self.task_list.cycle_due_filter,
            (V::TaskList, A::Search) => &self.task_list.search,
            (V::TaskList, A::ClearFilters) => &self.task_list.clear_filters,
            (V::TaskList, A::ToggleTheme) => &self.task_list.toggle_theme,
            (V::TaskList, A::StartDrag) => &self.task_list.start_drag,

            (V::Form, A::Cancel) => &self.form.cancel,
            (V::Form, A::Submit) => &self.form.submit,
            (V::Form, A::NextField) => &self.form.next_field,
            (V::Form, A::PrevField) => &self.form.prev_field,
            (V::Form, A::ClearField) => &self.form.clear_field,

            (V::Search, A::Cancel) => &self.search.cancel,
            (V::Search, A::Apply) => &self.search.apply,
            (V::Search, A::Clear) => &self.search.clear,

            (V::Drag, A::Down) => &self.drag.down,
            (V::Drag, A::Up) => &self.drag.up,
            (V::Drag, A::Drop) => &self.drag.drop,
            (V::Drag, A::Cancel) => &self.drag.cancel,

            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_are_valid() {
        let config = KeyBindingsConfig::default();
        if let Err(err) = validate_keybindings_config(&config) {
            panic!("default keybindings must validate: {err:#}");
        }
        assert_eq!(config.task_list.quit, vec!["q", "Esc"]);
        assert_eq!(config.form.prev_field, vec!["BackTab", "Up"]);
        assert_eq!(config.drag.cancel, vec!["Esc"]);
    }

    #[test]
    fn parse_simple_special_and_modified_keys() -> Result<()> {
        assert_eq!(parse_key("j")?.code, KeyCode::Char('j'));
        assert_eq!(parse_key("/")?.code, KeyCode::Char('/'));
        assert_eq!(parse_key("Space")?.code, KeyCode::Char(' '));
        assert_eq!(parse_key("BackTab")?.code, KeyCode::BackTab);
        let ctrl = parse_key("Ctrl+u")?;
        assert_eq!(ctrl.code, KeyCode::Char('u'));
        assert_eq!(ctrl.modifiers, KeyModifiers::CONTROL);
        let combo = parse_key("Ctrl+Alt+x")?;
        assert_eq!(combo.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        assert!(parse_key("InvalidKey").is_err());
        assert!(parse_key("").is_err());
        assert!(parse_key("Hyper+k").is_err());
    }

    #[test]
    fn matches_ignores_shift_on_characters() {
        let config = KeyBindingsConfig::default();
        let shifted = KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT);
        assert!(config.matches(ViewType::TaskList, Action::ToggleTheme, &shifted));
        assert!(!config.matches(ViewType::TaskList, Action::CycleDueFilter, &shifted));

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(config.matches(ViewType::Form, Action::PrevField, &back_tab));

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(config.matches(ViewType::Search, Action::Clear, &ctrl_u));
        assert!(!config.matches(ViewType::Search, Action::Clear, &key(KeyCode::Char('u'))));
    }

    #[test]
    fn actions_are_scoped_to_their_view() {
        let config = KeyBindingsConfig::default();
        let esc = key(KeyCode::Esc);
        assert!(config.matches(ViewType::TaskList, Action::Quit, &esc));
        assert!(config.matches(ViewType::Form, Action::Cancel, &esc));
        assert!(!config.matches(ViewType::Form, Action::Quit, &esc));
        assert!(!config.matches(ViewType::TaskList, Action::Submit, &key(KeyCode::Enter)));
    }

    #[test]
    fn conflicting_keys_are_rejected() {
        let mut config = KeyBindingsConfig::default();
        config.task_list.search = vec_of_strings!["d"];
        let Err(err) = validate_keybindings_config(&config) else {
            panic!("conflict should be reported");
        };
        let message = err.to_string();
        assert!(message.contains("task_list"), "{message}");
        assert!(message.contains("delete_task"), "{message}");
        assert!(message.contains("search"), "{message}");
    }

    #[test]
    fn empty_and_invalid_bindings_are_rejected() {
        let mut config = KeyBindingsConfig::default();
        config.drag.drop = Vec::new();
        let Err(err) = validate_keybindings_config(&config) else {
            panic!("empty binding should be reported");
        };
        assert!(err.to_string().contains("drag.drop"));

        let mut config = KeyBindingsConfig::default();
        config.form.submit = vec_of_strings!["Return"];
        let Err(err) = validate_keybindings_config(&config) else {
            panic!("invalid key should be reported");
        };
        assert!(err.to_string().contains("form.submit"));
    }

    #[test]
    fn help_text_reflects_custom_keys() {
        let mut config = KeyBindingsConfig::default();
        config.task_list.down = vec_of_strings!["Down"];
        config.task_list.up = vec_of_strings!["Up"];
        config.task_list.quit = vec_of_strings!["Ctrl+c"];

        let help = config.generate_help_text(ViewType::TaskList);
        assert!(help.contains("↓/↑:move"), "{help}");
        assert!(help.contains("Ctrl-c:quit"), "{help}");
        assert!(help.contains("0/1/2/3:priority"), "{help}");

        let form_help = config.generate_help_text(ViewType::Form);
        assert!(form_help.contains("↵:save"), "{form_help}");
        assert!(form_help.contains("S-Tab:prev"), "{form_help}");
    }

    #[test]
    fn partial_view_table_is_rejected_but_missing_views_default() {
        let partial = "[task_list]\nquit = [\"q\"]\n";
        assert!(toml::from_str::<KeyBindingsConfig>(partial).is_err());

        let only_search = "[search]\ncancel = [\"Esc\"]\napply = [\"Enter\"]\nclear = [\"Ctrl+k\"]\n";
        let config: KeyBindingsConfig =
            toml::from_str(only_search).unwrap_or_else(|err| panic!("parse search table: {err}"));
        assert_eq!(config.search.clear, vec!["Ctrl+k"]);
        assert_eq!(config.task_list, TaskListKeyBindings::default());
    }

    #[test]
    fn generated_config_round_trips() -> Result<()> {
        let text = generate_default_config_toml()?;
        assert!(text.starts_with("# taskboard configuration"));
        assert!(text.contains("task_list"));
        assert!(text.contains("priority = \"low\""));

        let parsed: Config = toml::from_str(&text)?;
        assert_eq!(parsed.tui.keybindings, KeyBindingsConfig::default());
        assert_eq!(parsed.defaults, DefaultsConfig::default());
        Ok(())
    }

    #[test]
    fn load_keybindings_reads_tui_tables_only() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        assert_eq!(load_keybindings(Some(&path))?, KeyBindingsConfig::default());

        std::fs::write(
            &path,
            "[storage]\ndir = \"/tmp/tb\"\n\n[tui.keybindings.drag]\ndown = [\"J\"]\nup = [\"K\"]\ndrop = [\"Enter\"]\ncancel = [\"Esc\"]\n",
        )?;
        let keybindings = load_keybindings(Some(&path))?;
        assert_eq!(keybindings.drag.down, vec!["J"]);
        assert_eq!(keybindings.form, FormKeyBindings::default());

        std::fs::write(&path, "[tui.keybindings.drag]\ndown = [\"j\"]\nup = [\"j\"]\ndrop = [\"Enter\"]\ncancel = [\"Esc\"]\n")?;
        assert!(load_keybindings(Some(&path)).is_err());
        Ok(())
    }
}
