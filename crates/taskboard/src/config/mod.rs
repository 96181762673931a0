//! Front-end configuration: keybindings and `init-config`.

use anyhow::{Context, Result, anyhow};
use std::io::{self, Write};
use std::path::Path;

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, ViewType};

/// Write a configuration file with every default spelled out.
pub fn init_config(output: Option<&Path>, force: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => keybindings::default_config_path()
            .ok_or_else(|| anyhow!("Could not determine the configuration directory"))?,
    };

    if output_path.exists() && !force && !confirm_overwrite(&output_path)? {
        println!("Aborted.");
        return Ok(());
    }

    write_default_config(&output_path)?;

    println!("✓ Wrote configuration file: {}", output_path.display());
    println!();
    println!("Edit this file to change the data directory, default priority or keybindings.");
    println!("Restart `taskboard tui` to apply keybinding changes.");

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = keybindings::generate_default_config_toml()?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
