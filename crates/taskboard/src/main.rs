//! CLI entry point for taskboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use taskboard_app::AppConfig;
use taskboard_store::{FileStore, KeyValueStore, MemoryStore, StorageAdapter};

mod commands;
mod config;
mod tui;

/// Personal task dashboard backed by a local key-value store.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "taskboard: create, filter, search and reorder personal tasks"
)]
struct Cli {
    /// Configuration file (defaults to `<config dir>/taskboard/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the task list and theme flag.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(short = 'd', long)]
        description: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        /// low, medium or high (defaults to the configured priority).
        #[arg(short = 'p', long)]
        priority: Option<String>,
        #[arg(short = 'c', long)]
        category: Option<String>,
    },

    /// Edit the fields of an existing task.
    Edit {
        /// Task id or unique id prefix.
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD; an empty value clears it.
        #[arg(long)]
        due: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// Category; an empty value clears it.
        #[arg(short = 'c', long)]
        category: Option<String>,
    },

    /// Delete a task.
    Rm {
        /// Task id or unique id prefix.
        task: String,
    },

    /// Toggle the completion flag of a task.
    Done {
        /// Task id or unique id prefix.
        task: String,
    },

    /// List tasks, optionally filtered.
    Ls {
        /// all, low, medium or high.
        #[arg(long, default_value = "all")]
        priority: String,
        /// all, today, tomorrow or YYYY-MM-DD.
        #[arg(long, default_value = "all")]
        due: String,
        /// Case-insensitive text matched against title and description.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Move a task from one list position to another (1-based).
    Mv { from: usize, to: usize },

    /// Show or change the stored theme.
    Theme {
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },

    /// Write a configuration file with every default spelled out.
    InitConfig {
        /// Output path (defaults to the configuration path).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite without asking.
        #[arg(short, long)]
        force: bool,
    },

    /// Launch the interactive terminal dashboard.
    Tui,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if should_install_tracing(&cli.cmd) {
        install_tracing();
    }

    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        data_dir,
        ephemeral,
        cmd,
    } = cli;

    match cmd {
        Command::InitConfig { output, force } => {
            config::init_config(output.as_deref().or(config_path.as_deref()), force)
        }
        Command::Tui => {
            let app_config = AppConfig::load(config_path.as_deref())?;
            let adapter = open_adapter(&app_config, data_dir.as_deref(), ephemeral)?;
            tui::run(adapter, &app_config, config_path.as_deref())
        }
        other => {
            let app_config = AppConfig::load(config_path.as_deref())?;
            let adapter = open_adapter(&app_config, data_dir.as_deref(), ephemeral)?;
            let mut service = commands::TaskService::open(adapter, app_config.default_priority())?;
            commands::run(other, &mut service)
        }
    }
}

fn open_adapter(
    config: &AppConfig,
    data_dir: Option<&std::path::Path>,
    ephemeral: bool,
) -> Result<StorageAdapter<Box<dyn KeyValueStore>>> {
    let backend: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let dir = config.data_dir(data_dir)?;
        Box::new(
            FileStore::open(&dir)
                .with_context(|| format!("failed to open data directory {}", dir.display()))?,
        )
    };
    Ok(StorageAdapter::new(backend))
}

/// JSON listings go to stdout, so log lines must not interleave with them.
const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(
        cmd,
        Command::Ls {
            format: LsFormat::Json,
            ..
        }
    )
}

fn install_tracing() {
    // RUST_LOG is honoured; the default level is INFO.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskboard",
            "--data-dir",
            "/tmp/tb",
            "add",
            "--title",
            "Write report",
            "-d",
            "quarterly numbers",
            "--due",
            "2025-03-31",
            "-p",
            "high",
            "-c",
            "work",
        ]);

        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/tb")));
        match cli.cmd {
            Command::Add {
                title,
                description,
                due,
                priority,
                category,
            } => {
                assert_eq!(title, "Write report");
                assert_eq!(description, "quarterly numbers");
                assert_eq!(due.as_deref(), Some("2025-03-31"));
                assert_eq!(priority.as_deref(), Some("high"));
                assert_eq!(category.as_deref(), Some("work"));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_ls_command_with_filters() {
        let cli = Cli::parse_from([
            "taskboard",
            "ls",
            "--priority",
            "low",
            "--due",
            "today",
            "--search",
            "milk",
            "--format",
            "json",
        ]);
        match cli.cmd {
            Command::Ls {
                priority,
                due,
                search,
                format,
            } => {
                assert_eq!(priority, "low");
                assert_eq!(due, "today");
                assert_eq!(search.as_deref(), Some("milk"));
                assert_eq!(format, LsFormat::Json);
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["taskboard", "tui", "--ephemeral"]);
        assert!(cli.ephemeral);
        assert!(matches!(cli.cmd, Command::Tui));
    }

    #[test]
    fn parse_mv_and_theme() {
        let cli = Cli::parse_from(["taskboard", "mv", "1", "3"]);
        assert!(matches!(cli.cmd, Command::Mv { from: 1, to: 3 }));

        let cli = Cli::parse_from(["taskboard", "theme", "toggle"]);
        assert!(matches!(
            cli.cmd,
            Command::Theme {
                value: Some(ThemeArg::Toggle)
            }
        ));
    }

    #[test]
    fn skips_tracing_for_json_listings() {
        let json = Command::Ls {
            priority: "all".into(),
            due: "all".into(),
            search: None,
            format: LsFormat::Json,
        };
        assert!(!should_install_tracing(&json));
        assert!(should_install_tracing(&Command::Tui));
    }
}
