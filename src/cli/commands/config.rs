//! `ecotag config` command - Configuration management
//!
//! Provides commands to view and modify ecotag configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., training_data, seed)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of the local .ecotag.yaml
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of the local .ecotag.yaml
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("training_data", "Training CSV for use locations, distances and encodings"),
    ("seed", "Seed for use-location sampling"),
    (
        "default_format",
        "Default output format (yaml, json, csv, tsv, md)",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, _global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key).as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--training-data, --seed, --format)");
    println!("  2. Environment variables (ECOTAG_TRAINING_DATA, ECOTAG_SEED, ECOTAG_FORMAT)");
    println!("  3. Local config ({})", Config::local_config_path().display());
    println!("  4. Global config (~/.config/ecotag/config.yaml)");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = config_path(args.global)?;

    let mut config_map = read_mapping(&config_path)?;

    let value = if args.key == "seed" {
        let seed: u64 = args
            .value
            .parse()
            .map_err(|_| miette::miette!("seed must be a non-negative integer, got '{}'", args.value))?;
        serde_yml::Value::Number(seed.into())
    } else {
        serde_yml::Value::String(args.value.clone())
    };
    config_map.insert(serde_yml::Value::String(args.key.clone()), value);

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Set {} {} {} in {}",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        config_path.display()
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = config_path(args.global)?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = config_map
        .remove(&serde_yml::Value::String(args.key.clone()))
        .is_some();
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Removed {} from {}",
        style("✓").green(),
        style(&args.key).cyan(),
        config_path.display()
    );

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = global_config_path()?;
    let local_path = Config::local_config_path();

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", global_path), ("Local: ", local_path)] {
        println!("  {} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("          {}", style("(exists)").green());
        } else {
            println!("          {}", style("(not created)").dim());
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'ecotag config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            "Unknown config key '{}'. Run 'ecotag config keys' for the list",
            key
        ))
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        global_config_path()
    } else {
        Ok(Config::local_config_path())
    }
}

/// Read a config file as a YAML mapping (empty when missing or blank)
fn read_mapping(path: &std::path::Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    if content.trim().is_empty() {
        return Ok(serde_yml::Mapping::new());
    }
    match serde_yml::from_str::<serde_yml::Value>(&content).into_diagnostic()? {
        serde_yml::Value::Mapping(map) => Ok(map),
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        _ => Err(miette::miette!(
            "Config file {} is not a mapping",
            path.display()
        )),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "training_data" => config
            .training_data
            .as_ref()
            .map(|p| p.display().to_string()),
        "seed" => config.seed.map(|s| s.to_string()),
        "default_format" => config.default_format.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("seed").is_ok());
        assert!(check_key("training_data").is_ok());
        assert!(check_key("editor").is_err());
    }

    #[test]
    fn test_get_config_value() {
        let config = Config {
            training_data: Some(PathBuf::from("data.csv")),
            seed: Some(9),
            default_format: None,
        };
        assert_eq!(get_config_value(&config, "training_data").as_deref(), Some("data.csv"));
        assert_eq!(get_config_value(&config, "seed").as_deref(), Some("9"));
        assert_eq!(get_config_value(&config, "default_format"), None);
    }

    #[test]
    fn test_read_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(read_mapping(&missing).unwrap().is_empty());

        let blank = dir.path().join("blank.yaml");
        fs::write(&blank, "").unwrap();
        assert!(read_mapping(&blank).unwrap().is_empty());

        let list = dir.path().join("list.yaml");
        fs::write(&list, "- a\n- b\n").unwrap();
        assert!(read_mapping(&list).is_err());
    }
}
