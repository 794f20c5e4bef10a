//! Config command handlers.

use anyhow::{Context, Result};
use t4b_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    let toml = config::Config::generate()?;
    print!("{toml}");
    Ok(())
}

pub fn set_city(city: &str) -> Result<()> {
    let city = city.trim();
    if city.is_empty() {
        anyhow::bail!("City cannot be empty");
    }
    config::Config::save_default_city(city)?;
    println!("Default city set to {city}");
    Ok(())
}
