use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tempfile::TempDir;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "t4b maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Update default_config.toml by running `t4b config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Fail if default_config.toml is out of date.
    CheckDefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        CommandName::UpdateDefaultConfig => update_default_config(),
        CommandName::CheckDefaultConfig => check_default_config(),
    }
}

fn update_default_config() -> Result<()> {
    let dest = default_config_path()?;
    let generated = generate_config()?;

    fs::write(&dest, generated).with_context(|| format!("write config to {}", dest.display()))?;

    println!("Updated {}", dest.display());
    Ok(())
}

fn check_default_config() -> Result<()> {
    let dest = default_config_path()?;
    let current =
        fs::read_to_string(&dest).with_context(|| format!("read {}", dest.display()))?;

    if current != generate_config()? {
        bail!(
            "{} is out of date; run `cargo run -p xtask -- update-default-config`",
            dest.display()
        );
    }

    println!("{} is up to date", dest.display());
    Ok(())
}

fn generate_config() -> Result<String> {
    let root = project_root()?;
    let scratch_home = scratch_home()?;

    let output = Command::new("cargo")
        .current_dir(&root)
        .env("T4B_HOME", scratch_home.path())
        .arg("run")
        .arg("-p")
        .arg("t4b")
        .arg("--")
        .arg("config")
        .arg("generate")
        .output()
        .context("run `cargo run -p t4b -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {}", stderr);
    }

    String::from_utf8(output.stdout).context("config generate produced invalid UTF-8")
}

/// Fresh, empty `T4B_HOME` for one generator run, removed on drop.
fn scratch_home() -> Result<TempDir> {
    tempfile::tempdir().context("create temp dir for T4B_HOME")
}

fn default_config_path() -> Result<PathBuf> {
    Ok(project_root()?
        .join("crates")
        .join("t4b-core")
        .join("default_config.toml"))
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_home_is_fresh_per_run() {
        let first = scratch_home().unwrap();
        let second = scratch_home().unwrap();
        assert_ne!(first.path(), second.path());
        assert_eq!(fs::read_dir(first.path()).unwrap().count(), 0);

        fs::write(first.path().join("config.toml"), "not = [valid").unwrap();
        let stale = first.path().to_path_buf();
        drop(first);
        assert!(!stale.exists());
        assert_eq!(fs::read_dir(second.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_config_path_points_at_core_crate() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with("crates/t4b-core/default_config.toml"));
        assert!(path.exists());
    }
}
